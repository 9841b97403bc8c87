//! Shared value types for the PPFG pressure-prediction pipeline
//!
//! Every entity here is an immutable value record: produced by one pipeline
//! stage, owned by the next, never mutated in place. That property is what
//! makes the per-trial Monte Carlo fan-out safe without locks.
//!
//! All structural validation happens once, at construction. Downstream code
//! can assume a `DepthSeries` is strictly increasing, a
//! `ParameterDistribution` has positive spread, and a `CorrelationMatrix` is
//! square and symmetric — it never re-checks.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Structural or parameter-domain error detected at an input boundary.
///
/// These abort the calling operation before any computation proceeds. They
/// are never downgraded to a per-point gap: a misconfigured model must not
/// produce complete-looking but physically invalid output.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("depth series is empty")]
    EmptyDepthSeries,

    #[error("depth series not strictly increasing at index {index}: {prev} -> {next}")]
    NonMonotonicDepth { index: usize, prev: f64, next: f64 },

    #[error("depth series contains non-finite value at index {index}")]
    NonFiniteDepth { index: usize },

    #[error("{context}: length {actual} does not match depth series length {expected}")]
    LengthMismatch {
        context: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Poisson ratio {0} outside physical range (0, 0.5)")]
    PoissonOutOfRange(f64),

    #[error("standard deviation must be positive, got {0}")]
    NonPositiveStdDev(f64),

    #[error("mean must be finite, got {0}")]
    NonFiniteMean(f64),

    #[error("correlation matrix row {row} has {len} entries, expected {expected}")]
    NonSquareMatrix {
        row: usize,
        len: usize,
        expected: usize,
    },

    #[error("correlation matrix asymmetric at ({i},{j}): {upper} vs {lower}")]
    AsymmetricCorrelation {
        i: usize,
        j: usize,
        upper: f64,
        lower: f64,
    },

    #[error("correlation coefficient at ({i},{j}) outside [-1, 1]: {value}")]
    CorrelationOutOfRange { i: usize, j: usize, value: f64 },

    #[error("correlation matrix diagonal at ({index},{index}) must be 1.0, got {value}")]
    NonUnitDiagonal { index: usize, value: f64 },

    #[error("correlation matrix of dimension {dimension} is not positive definite (Cholesky factorization failed)")]
    NotPositiveDefinite { dimension: usize },

    #[error("sampler built for {expected} parameters, got {actual} independent draws")]
    SampleDimensionMismatch { expected: usize, actual: usize },

    #[error("correlation matrix dimension {matrix} does not match parameter count {parameters}")]
    ParameterCountMismatch { matrix: usize, parameters: usize },

    #[error("risk thresholds misordered: high margin {high} ppg must not exceed medium margin {medium} ppg")]
    MisorderedRiskThresholds { high: f64, medium: f64 },

    #[error("{context} must be finite, got {value}")]
    NonFiniteParameter { context: &'static str, value: f64 },

    #[error("Monte Carlo trial count must be at least 1")]
    ZeroTrialCount,

    #[error("hydrostatic gradient must be positive, got {0} psi/ft")]
    NonPositiveHydrostaticGradient(f64),
}

// ============================================================================
// Depth Series
// ============================================================================

/// Unit of the depth axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DepthUnit {
    Meters,
    #[default]
    Feet,
}

impl DepthUnit {
    /// Conversion factor from this unit to feet.
    ///
    /// Pressure-gradient formulas (0.052 ppg conversion, 0.433 psi/ft water
    /// gradient) are defined in feet, so metric series convert internally.
    pub fn to_feet_factor(self) -> f64 {
        match self {
            DepthUnit::Meters => 3.280_84,
            DepthUnit::Feet => 1.0,
        }
    }
}

impl std::fmt::Display for DepthUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DepthUnit::Meters => write!(f, "m"),
            DepthUnit::Feet => write!(f, "ft"),
        }
    }
}

/// Ordered, strictly increasing sequence of depth values.
///
/// The depth axis every log curve and output profile aligns to. Zero-length
/// and non-monotonic series are rejected at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepthSeries {
    unit: DepthUnit,
    depths: Vec<f64>,
}

impl DepthSeries {
    /// Build a validated depth series.
    ///
    /// # Errors
    /// - `EmptyDepthSeries` for a zero-length input
    /// - `NonFiniteDepth` for NaN/infinite entries
    /// - `NonMonotonicDepth` if any step is not strictly increasing
    pub fn new(depths: Vec<f64>, unit: DepthUnit) -> Result<Self, ValidationError> {
        if depths.is_empty() {
            return Err(ValidationError::EmptyDepthSeries);
        }
        for (index, value) in depths.iter().enumerate() {
            if !value.is_finite() {
                return Err(ValidationError::NonFiniteDepth { index });
            }
        }
        for (index, pair) in depths.windows(2).enumerate() {
            if pair[1] <= pair[0] {
                return Err(ValidationError::NonMonotonicDepth {
                    index: index + 1,
                    prev: pair[0],
                    next: pair[1],
                });
            }
        }
        Ok(Self { unit, depths })
    }

    pub fn unit(&self) -> DepthUnit {
        self.unit
    }

    pub fn len(&self) -> usize {
        self.depths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.depths.is_empty()
    }

    /// Depth at `index` in the native unit of the series.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.depths.get(index).copied()
    }

    pub fn values(&self) -> &[f64] {
        &self.depths
    }

    /// Depth at `index` converted to feet.
    pub fn feet_at(&self, index: usize) -> Option<f64> {
        self.depths
            .get(index)
            .map(|d| d * self.unit.to_feet_factor())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, f64> {
        self.depths.iter()
    }
}

// ============================================================================
// Log Curve
// ============================================================================

/// Depth-indexed samples of one physical quantity, aligned to a `DepthSeries`.
///
/// `None` marks a missing or invalid sample. Gaps propagate as `None` through
/// every derived curve at the same index — they are never coerced to zero and
/// never abort the rest of the series.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LogCurve {
    values: Vec<Option<f64>>,
}

impl LogCurve {
    pub fn new(values: Vec<Option<f64>>) -> Self {
        Self { values }
    }

    /// Build a gap-free curve from plain samples.
    pub fn from_samples(samples: Vec<f64>) -> Self {
        Self {
            values: samples.into_iter().map(Some).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Sample at `index`, flattening out-of-range to `None`.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().flatten()
    }

    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    /// Number of missing samples.
    pub fn gap_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_none()).count()
    }

    /// Reject a curve that is not aligned index-for-index with `depths`.
    ///
    /// A mismatched length is a structural error, never a silent truncation.
    pub fn ensure_aligned(
        &self,
        depths: &DepthSeries,
        context: &'static str,
    ) -> Result<(), ValidationError> {
        if self.values.len() != depths.len() {
            return Err(ValidationError::LengthMismatch {
                context,
                expected: depths.len(),
                actual: self.values.len(),
            });
        }
        Ok(())
    }
}

// ============================================================================
// Parameter Distribution
// ============================================================================

/// Scalar normal distribution over a physical model parameter
/// (Eaton exponent, Poisson ratio, ...).
///
/// Spread is validated at construction; downstream precision arithmetic
/// (`1/std²`) can therefore never divide by zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterDistribution {
    mean: f64,
    std_dev: f64,
}

impl ParameterDistribution {
    /// # Errors
    /// `NonPositiveStdDev` if `std_dev <= 0`, `NonFiniteMean` on NaN/inf mean.
    pub fn new(mean: f64, std_dev: f64) -> Result<Self, ValidationError> {
        if !mean.is_finite() {
            return Err(ValidationError::NonFiniteMean(mean));
        }
        if !std_dev.is_finite() || std_dev <= 0.0 {
            return Err(ValidationError::NonPositiveStdDev(std_dev));
        }
        Ok(Self { mean, std_dev })
    }

    /// Internal constructor for values already proven positive
    /// (e.g. a posterior variance, which is a product of positive precisions).
    pub(crate) fn from_validated(mean: f64, std_dev: f64) -> Self {
        debug_assert!(std_dev > 0.0);
        Self { mean, std_dev }
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn std_dev(&self) -> f64 {
        self.std_dev
    }

    pub fn variance(&self) -> f64 {
        self.std_dev * self.std_dev
    }

    /// Precision (inverse variance), the natural unit of Bayesian updating.
    pub fn precision(&self) -> f64 {
        1.0 / self.variance()
    }
}

// ============================================================================
// Correlation Matrix
// ============================================================================

/// Symmetric parameter-pair correlation structure for joint sampling.
///
/// Construction enforces shape, symmetry, unit diagonal, and coefficient
/// range. Positive definiteness is checked by the sampler when it attempts
/// the Cholesky factorization — an indefinite matrix is rejected there with
/// `ValidationError::NotPositiveDefinite`, never silently repaired and never
/// silently replaced by independent sampling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    coefficients: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    /// Build a validated correlation matrix from row-major coefficients.
    pub fn new(coefficients: Vec<Vec<f64>>) -> Result<Self, ValidationError> {
        let n = coefficients.len();
        for (row, values) in coefficients.iter().enumerate() {
            if values.len() != n {
                return Err(ValidationError::NonSquareMatrix {
                    row,
                    len: values.len(),
                    expected: n,
                });
            }
        }
        for i in 0..n {
            let diag = coefficients[i][i];
            if (diag - 1.0).abs() > 1e-12 {
                return Err(ValidationError::NonUnitDiagonal {
                    index: i,
                    value: diag,
                });
            }
            for j in 0..n {
                let value = coefficients[i][j];
                if !value.is_finite() || value.abs() > 1.0 {
                    return Err(ValidationError::CorrelationOutOfRange { i, j, value });
                }
                if (coefficients[i][j] - coefficients[j][i]).abs() > 1e-12 {
                    return Err(ValidationError::AsymmetricCorrelation {
                        i,
                        j,
                        upper: coefficients[i][j],
                        lower: coefficients[j][i],
                    });
                }
            }
        }
        Ok(Self { coefficients })
    }

    /// Identity matrix — the explicit way to request independent sampling.
    pub fn identity(dimension: usize) -> Self {
        let coefficients = (0..dimension)
            .map(|i| {
                (0..dimension)
                    .map(|j| if i == j { 1.0 } else { 0.0 })
                    .collect()
            })
            .collect();
        Self { coefficients }
    }

    pub fn dimension(&self) -> usize {
        self.coefficients.len()
    }

    pub fn coefficient(&self, i: usize, j: usize) -> f64 {
        self.coefficients[i][j]
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.coefficients
    }
}

// ============================================================================
// Probabilistic Profile
// ============================================================================

/// Pressure unit tag for output profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PressureUnit {
    /// Absolute pressure (psi)
    Psi,
    /// Equivalent mud weight (ppg)
    Ppg,
}

impl std::fmt::Display for PressureUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PressureUnit::Psi => write!(f, "psi"),
            PressureUnit::Ppg => write!(f, "ppg"),
        }
    }
}

/// Per-depth P10/P50/P90 envelope for one physical quantity (PP or FG),
/// aligned index-for-index with the input `DepthSeries`.
///
/// A `None` at a depth means the distributional estimate is invalid there
/// (at least one Monte Carlo trial had a gap at that index).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbabilisticProfile {
    pub unit: PressureUnit,
    pub p10: Vec<Option<f64>>,
    pub p50: Vec<Option<f64>>,
    pub p90: Vec<Option<f64>>,
}

impl ProbabilisticProfile {
    pub fn len(&self) -> usize {
        self.p50.len()
    }

    pub fn is_empty(&self) -> bool {
        self.p50.is_empty()
    }

    /// Reject a profile that is not aligned with `depths`.
    pub fn ensure_aligned(
        &self,
        depths: &DepthSeries,
        context: &'static str,
    ) -> Result<(), ValidationError> {
        if self.len() != depths.len() {
            return Err(ValidationError::LengthMismatch {
                context,
                expected: depths.len(),
                actual: self.len(),
            });
        }
        Ok(())
    }
}

// ============================================================================
// Risk Classification
// ============================================================================

/// Drilling-margin risk classification for one depth.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum RiskLevel {
    Low = 0,
    Medium = 1,
    High = 2,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "LOW"),
            RiskLevel::Medium => write!(f, "MEDIUM"),
            RiskLevel::High => write!(f, "HIGH"),
        }
    }
}

/// Per-depth drilling-window assessment.
///
/// `risk_level == None` means unclassified: PP or FG was missing at this
/// depth. Absence of data must never read as "safe", so there is no default
/// level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskPoint {
    /// Depth in the native unit of the input series
    pub depth: f64,
    /// FG P10 minus PP P90 (ppg); `None` when either side is missing
    pub window_width: Option<f64>,
    /// Classified margin level; `None` when the window is unknowable
    pub risk_level: Option<RiskLevel>,
}
