//! Correlated parameter sampling via Cholesky factorization
//!
//! Joint Monte Carlo draws must honor the correlation structure between
//! calibrated parameters (a high Eaton exponent tends to travel with a high
//! Poisson ratio in compacting shale). The transform is the standard one:
//! factor the correlation matrix R = L·Lᵀ, map independent standard normals
//! z to L·z, then rescale by each parameter's own mean and spread.
//!
//! Validation is strict and fails fast. An indefinite matrix means the
//! requested correlation structure is internally inconsistent; quietly
//! sampling independently instead would produce confident-looking envelopes
//! with the wrong joint tails. Independence is still available — pass
//! `CorrelationMatrix::identity`.

use nalgebra::{DMatrix, DVector};
use rand::Rng;
use rand_distr::StandardNormal;

use crate::types::{CorrelationMatrix, ParameterDistribution, ValidationError};

/// Reject a correlation matrix whose Cholesky factorization fails.
///
/// `CorrelationMatrix` construction already guarantees shape, symmetry,
/// range, and unit diagonal; this adds the positive-definiteness check
/// (every leading principal minor > 0, equivalently: no non-positive
/// Cholesky pivot).
pub fn validate_positive_definite(matrix: &CorrelationMatrix) -> Result<(), ValidationError> {
    cholesky_lower(matrix).map(|_| ())
}

fn cholesky_lower(matrix: &CorrelationMatrix) -> Result<DMatrix<f64>, ValidationError> {
    let n = matrix.dimension();
    let dense = DMatrix::from_fn(n, n, |i, j| matrix.coefficient(i, j));
    match dense.cholesky() {
        Some(factor) => Ok(factor.l()),
        None => Err(ValidationError::NotPositiveDefinite { dimension: n }),
    }
}

/// Draws joint samples of correlated physical parameters.
///
/// The factorization happens once at construction; each trial is a cheap
/// matrix-vector product. Randomness is injected by the caller, so a fixed
/// RNG stream makes the output bit-reproducible.
#[derive(Debug, Clone)]
pub struct CorrelatedSampler {
    lower: DMatrix<f64>,
    parameters: Vec<ParameterDistribution>,
}

impl CorrelatedSampler {
    /// Build a sampler for `parameters` with the given correlation structure.
    ///
    /// # Errors
    /// - `ParameterCountMismatch` if the matrix dimension differs from the
    ///   parameter count
    /// - `NotPositiveDefinite` if the Cholesky factorization fails
    pub fn new(
        matrix: &CorrelationMatrix,
        parameters: Vec<ParameterDistribution>,
    ) -> Result<Self, ValidationError> {
        if matrix.dimension() != parameters.len() {
            return Err(ValidationError::ParameterCountMismatch {
                matrix: matrix.dimension(),
                parameters: parameters.len(),
            });
        }
        let lower = cholesky_lower(matrix)?;
        Ok(Self { lower, parameters })
    }

    pub fn dimension(&self) -> usize {
        self.parameters.len()
    }

    /// Transform one vector of independent standard-normal draws into a
    /// correlated sample in physical units.
    ///
    /// `correlated_z = L · z`, then `x_k = mean_k + std_k × correlated_z_k`.
    ///
    /// # Errors
    /// `SampleDimensionMismatch` if `independent.len()` differs from the
    /// parameter count.
    pub fn transform(&self, independent: &[f64]) -> Result<Vec<f64>, ValidationError> {
        if independent.len() != self.dimension() {
            return Err(ValidationError::SampleDimensionMismatch {
                expected: self.dimension(),
                actual: independent.len(),
            });
        }
        let z = DVector::from_column_slice(independent);
        let correlated = &self.lower * z;

        Ok(self
            .parameters
            .iter()
            .zip(correlated.iter())
            .map(|(param, cz)| param.mean() + param.std_dev() * cz)
            .collect())
    }

    /// Draw one correlated sample using the injected RNG.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<f64> {
        let independent: Vec<f64> = (0..self.dimension())
            .map(|_| rng.sample(StandardNormal))
            .collect();
        // Dimension matches by construction
        self.transform(&independent).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn dist(mean: f64, std_dev: f64) -> ParameterDistribution {
        ParameterDistribution::new(mean, std_dev).unwrap()
    }

    #[test]
    fn test_rejects_indefinite_matrix() {
        // Symmetric, in-range, unit diagonal, but indefinite:
        // eigenvalues of this 3x3 include a negative one
        let matrix = CorrelationMatrix::new(vec![
            vec![1.0, 0.9, -0.9],
            vec![0.9, 1.0, 0.9],
            vec![-0.9, 0.9, 1.0],
        ])
        .unwrap();
        assert!(matches!(
            validate_positive_definite(&matrix),
            Err(ValidationError::NotPositiveDefinite { dimension: 3 })
        ));
        assert!(CorrelatedSampler::new(&matrix, vec![dist(0.0, 1.0); 3]).is_err());
    }

    #[test]
    fn test_accepts_valid_matrix() {
        let matrix =
            CorrelationMatrix::new(vec![vec![1.0, 0.5], vec![0.5, 1.0]]).unwrap();
        assert!(validate_positive_definite(&matrix).is_ok());
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let matrix = CorrelationMatrix::identity(2);
        let result = CorrelatedSampler::new(&matrix, vec![dist(0.0, 1.0); 3]);
        assert!(matches!(
            result,
            Err(ValidationError::ParameterCountMismatch {
                matrix: 2,
                parameters: 3
            })
        ));
    }

    #[test]
    fn test_transform_is_deterministic() {
        let matrix =
            CorrelationMatrix::new(vec![vec![1.0, 0.7], vec![0.7, 1.0]]).unwrap();
        let sampler =
            CorrelatedSampler::new(&matrix, vec![dist(3.0, 0.3), dist(0.4, 0.03)]).unwrap();

        let z = [0.5, -1.2];
        let first = sampler.transform(&z).unwrap();
        let second = sampler.transform(&z).unwrap();
        assert_eq!(first, second, "same independent stream must reproduce bits");
    }

    #[test]
    fn test_identity_matrix_passes_draws_through() {
        let sampler = CorrelatedSampler::new(
            &CorrelationMatrix::identity(2),
            vec![dist(10.0, 2.0), dist(-3.0, 0.5)],
        )
        .unwrap();

        let out = sampler.transform(&[1.0, -2.0]).unwrap();
        assert!((out[0] - 12.0).abs() < 1e-12);
        assert!((out[1] - (-4.0)).abs() < 1e-12);
    }

    #[test]
    fn test_perfect_correlation_collapses_to_one_driver() {
        // rho ~ 1: both outputs are driven by the first z only.
        // Exactly 1.0 is singular (semi-definite), so stay just inside.
        let matrix =
            CorrelationMatrix::new(vec![vec![1.0, 0.999_999], vec![0.999_999, 1.0]]).unwrap();
        let sampler =
            CorrelatedSampler::new(&matrix, vec![dist(0.0, 1.0), dist(0.0, 1.0)]).unwrap();

        let out = sampler.transform(&[1.5, 0.0]).unwrap();
        assert!(
            (out[0] - out[1]).abs() < 1e-2,
            "near-unit correlation should nearly duplicate the draw: {out:?}"
        );
    }

    #[test]
    fn test_zero_correlation_yields_independent_samples() {
        // Sample correlation of transformed pairs must vanish over large N
        let sampler = CorrelatedSampler::new(
            &CorrelationMatrix::identity(2),
            vec![dist(0.0, 1.0), dist(0.0, 1.0)],
        )
        .unwrap();

        let mut rng = StdRng::seed_from_u64(7);
        let n = 20_000;
        let pairs: Vec<Vec<f64>> = (0..n).map(|_| sampler.sample(&mut rng)).collect();

        let r = sample_correlation(&pairs);
        assert!(
            r.abs() < 0.03,
            "independent sampler should show near-zero correlation, got {r}"
        );
    }

    #[test]
    fn test_positive_correlation_is_reproduced() {
        let rho = 0.8;
        let matrix = CorrelationMatrix::new(vec![vec![1.0, rho], vec![rho, 1.0]]).unwrap();
        let sampler =
            CorrelatedSampler::new(&matrix, vec![dist(0.0, 1.0), dist(0.0, 1.0)]).unwrap();

        let mut rng = StdRng::seed_from_u64(11);
        let n = 20_000;
        let pairs: Vec<Vec<f64>> = (0..n).map(|_| sampler.sample(&mut rng)).collect();

        let r = sample_correlation(&pairs);
        assert!(
            (r - rho).abs() < 0.03,
            "sample correlation {r} should approach requested {rho}"
        );
    }

    fn sample_correlation(pairs: &[Vec<f64>]) -> f64 {
        let n = pairs.len() as f64;
        let mean_x: f64 = pairs.iter().map(|p| p[0]).sum::<f64>() / n;
        let mean_y: f64 = pairs.iter().map(|p| p[1]).sum::<f64>() / n;
        let cov: f64 = pairs
            .iter()
            .map(|p| (p[0] - mean_x) * (p[1] - mean_y))
            .sum::<f64>()
            / n;
        let var_x: f64 = pairs.iter().map(|p| (p[0] - mean_x).powi(2)).sum::<f64>() / n;
        let var_y: f64 = pairs.iter().map(|p| (p[1] - mean_y).powi(2)).sum::<f64>() / n;
        cov / (var_x.sqrt() * var_y.sqrt())
    }
}
