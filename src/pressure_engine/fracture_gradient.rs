//! Fracture-gradient model: Poisson-ratio horizontal stress (Matthews & Kelly / Eaton)
//!
//! The minimum horizontal stress fraction of the effective overburden is
//! controlled by K0 = ν/(1-ν); the fracture pressure is pore pressure plus
//! that fraction of the effective stress.

use crate::types::{DepthSeries, LogCurve, ValidationError};

use super::{pore_pressure::to_equivalent_mud_weight, PressureProfile};

/// Horizontal-to-vertical effective stress ratio from Poisson's ratio.
///
/// Formula: `K0 = ν / (1 - ν)`
///
/// # Errors
/// `PoissonOutOfRange` for ν outside (0, 0.5) — K0 would be non-physical
/// (negative, zero, or unbounded).
pub fn stress_ratio_k0(poisson_ratio: f64) -> Result<f64, ValidationError> {
    if !poisson_ratio.is_finite() || poisson_ratio <= 0.0 || poisson_ratio >= 0.5 {
        return Err(ValidationError::PoissonOutOfRange(poisson_ratio));
    }
    Ok(poisson_ratio / (1.0 - poisson_ratio))
}

/// Fracture gradient from overburden and pore pressure, in psi and
/// equivalent mud weight.
///
/// Formula: `FG = PP + K0 × (OBG - PP)`, `K0 = ν/(1-ν)`
///
/// Same per-point policy as the pore-pressure calculation: a gap in OBG or
/// PP, or `depth <= 0` for the ppg conversion, yields `None` at that index.
/// ν is validated before any point is computed.
pub fn calculate_fracture_gradient(
    depths: &DepthSeries,
    obg_psi: &LogCurve,
    pore_pressure_psi: &LogCurve,
    poisson_ratio: f64,
) -> Result<PressureProfile, ValidationError> {
    let k0 = stress_ratio_k0(poisson_ratio)?;
    obg_psi.ensure_aligned(depths, "overburden curve")?;
    pore_pressure_psi.ensure_aligned(depths, "pore pressure curve")?;

    let psi_values: Vec<Option<f64>> = (0..depths.len())
        .map(|i| {
            let obg = obg_psi.get(i)?;
            let pp = pore_pressure_psi.get(i)?;
            Some(pp + k0 * (obg - pp))
        })
        .collect();
    let psi = LogCurve::new(psi_values);
    let ppg = to_equivalent_mud_weight(depths, &psi)?;

    Ok(PressureProfile { psi, ppg })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DepthUnit;

    fn depths_ft(values: Vec<f64>) -> DepthSeries {
        DepthSeries::new(values, DepthUnit::Feet).unwrap()
    }

    #[test]
    fn test_k0_at_default_poisson() {
        let k0 = stress_ratio_k0(0.4).unwrap();
        assert!(
            (k0 - 0.6667).abs() < 1e-4,
            "nu=0.4 should give K0=0.6667, got {k0}"
        );
    }

    #[test]
    fn test_k0_domain_rejection() {
        for nu in [0.0, 0.5, -0.1, 0.7, f64::NAN] {
            assert!(
                stress_ratio_k0(nu).is_err(),
                "nu={nu} should be rejected as non-physical"
            );
        }
    }

    #[test]
    fn test_fracture_gradient_formula() {
        let depths = depths_ft(vec![10000.0]);
        let obg = LogCurve::from_samples(vec![9500.0]);
        let pp = LogCurve::from_samples(vec![6300.0]);

        let fg = calculate_fracture_gradient(&depths, &obg, &pp, 0.4).unwrap();
        let k0: f64 = 0.4 / 0.6;
        let expected = 6300.0 + k0 * (9500.0 - 6300.0);
        let got = fg.psi.get(0).unwrap();
        assert!(
            (got - expected).abs() < 1e-9,
            "FG must equal PP + K0*(OBG-PP): {got} vs {expected}"
        );
    }

    #[test]
    fn test_fracture_gradient_between_pp_and_obg() {
        let depths = depths_ft(vec![8000.0, 9000.0, 10000.0]);
        let obg = LogCurve::from_samples(vec![7600.0, 8600.0, 9600.0]);
        let pp = LogCurve::from_samples(vec![3800.0, 4400.0, 5200.0]);

        let fg = calculate_fracture_gradient(&depths, &obg, &pp, 0.35).unwrap();
        for i in 0..3 {
            let fg_psi = fg.psi.get(i).unwrap();
            assert!(
                fg_psi > pp.get(i).unwrap() && fg_psi < obg.get(i).unwrap(),
                "FG must lie between PP and OBG at index {i}"
            );
        }
    }

    #[test]
    fn test_gap_propagation() {
        let depths = depths_ft(vec![5000.0, 6000.0]);
        let obg = LogCurve::from_samples(vec![4800.0, 5800.0]);
        let pp = LogCurve::new(vec![None, Some(2800.0)]);

        let fg = calculate_fracture_gradient(&depths, &obg, &pp, 0.4).unwrap();
        assert_eq!(fg.psi.get(0), None);
        assert!(fg.psi.get(1).is_some());
    }

    #[test]
    fn test_invalid_poisson_rejected_before_computation() {
        let depths = depths_ft(vec![5000.0]);
        let obg = LogCurve::from_samples(vec![4800.0]);
        let pp = LogCurve::from_samples(vec![2400.0]);

        let result = calculate_fracture_gradient(&depths, &obg, &pp, 0.55);
        assert!(matches!(result, Err(ValidationError::PoissonOutOfRange(_))));
    }
}
