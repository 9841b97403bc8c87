//! Pore-pressure calculations: Eaton effective stress and Terzaghi inversion
//!
//! The chain for one deterministic evaluation:
//! 1. Hydrostatic (normal) pressure from the configured gradient
//! 2. Eaton effective stress from the normalized log-response ratio
//! 3. Terzaghi: PP = OBG - σe
//! 4. Equivalent mud weight: PP_ppg = PP_psi / (0.052 × depth_ft)

use crate::types::{DepthSeries, LogCurve, ValidationError};

use super::{PressureProfile, PSI_PER_PPG_FT};

/// Hydrostatic (normal) pore pressure curve from a constant gradient.
///
/// Formula: `P_hydro = gradient × depth_ft`
///
/// Depths at or above datum (`depth <= 0`) have no defined column pressure
/// and yield `None`.
///
/// # Errors
/// `NonPositiveHydrostaticGradient` if the gradient is not a positive
/// finite psi/ft value.
pub fn hydrostatic_pressure_psi(
    depths: &DepthSeries,
    gradient_psi_ft: f64,
) -> Result<LogCurve, ValidationError> {
    if !gradient_psi_ft.is_finite() || gradient_psi_ft <= 0.0 {
        return Err(ValidationError::NonPositiveHydrostaticGradient(
            gradient_psi_ft,
        ));
    }

    let values = (0..depths.len())
        .map(|i| {
            let depth_ft = depths.feet_at(i)?;
            if depth_ft <= 0.0 {
                None
            } else {
                Some(gradient_psi_ft * depth_ft)
            }
        })
        .collect();
    Ok(LogCurve::new(values))
}

/// Eaton effective stress from a normalized log-response ratio.
///
/// Formula: `σe = (OBG - P_hydro) × ratio^n`
///
/// Where:
/// - OBG = overburden stress (psi)
/// - P_hydro = normal (hydrostatic) pore pressure (psi)
/// - ratio = observed/normal log response (sonic velocity or resistivity), dimensionless
/// - n = Eaton exponent
///
/// `ratio = 1` reproduces the normal-trend effective stress exactly;
/// `ratio < 1` (slower sonic / lower resistivity than the compaction trend)
/// reduces σe, i.e. overpressure.
///
/// Gaps in any input and non-positive ratio samples yield `None` at that
/// index (a non-positive ratio is a bad log sample, not a model state).
///
/// # Errors
/// Non-positive or non-finite exponent; curve length mismatch.
pub fn eaton_effective_stress(
    obg_psi: &LogCurve,
    hydrostatic_psi: &LogCurve,
    ratio: &LogCurve,
    exponent: f64,
) -> Result<LogCurve, ValidationError> {
    if !exponent.is_finite() || exponent <= 0.0 {
        return Err(ValidationError::NonFiniteParameter {
            context: "Eaton exponent (must be positive)",
            value: exponent,
        });
    }
    if hydrostatic_psi.len() != obg_psi.len() {
        return Err(ValidationError::LengthMismatch {
            context: "hydrostatic pressure curve",
            expected: obg_psi.len(),
            actual: hydrostatic_psi.len(),
        });
    }
    if ratio.len() != obg_psi.len() {
        return Err(ValidationError::LengthMismatch {
            context: "log-response ratio curve",
            expected: obg_psi.len(),
            actual: ratio.len(),
        });
    }

    let values = (0..obg_psi.len())
        .map(|i| {
            let obg = obg_psi.get(i)?;
            let hydro = hydrostatic_psi.get(i)?;
            let r = ratio.get(i)?;
            if r <= 0.0 {
                return None;
            }
            Some((obg - hydro) * r.powf(exponent))
        })
        .collect();
    Ok(LogCurve::new(values))
}

/// Terzaghi pore pressure from overburden and effective stress, in psi and
/// equivalent mud weight.
///
/// Formula: `PP = OBG - σe`; `PP_ppg = PP_psi / (0.052 × depth_ft)`
///
/// Per-point policy: a gap in OBG or σe, or `depth <= 0`, yields `None` at
/// that index rather than a computed value — depth-zero is physically
/// undefined for the gradient conversion. No exception is thrown for
/// per-point gaps; a mismatched input length is a structural error.
pub fn calculate_pore_pressure(
    depths: &DepthSeries,
    obg_psi: &LogCurve,
    effective_stress_psi: &LogCurve,
) -> Result<PressureProfile, ValidationError> {
    obg_psi.ensure_aligned(depths, "overburden curve")?;
    effective_stress_psi.ensure_aligned(depths, "effective stress curve")?;

    let psi_values: Vec<Option<f64>> = (0..depths.len())
        .map(|i| {
            let obg = obg_psi.get(i)?;
            let sigma_e = effective_stress_psi.get(i)?;
            Some(obg - sigma_e)
        })
        .collect();
    let psi = LogCurve::new(psi_values);
    let ppg = to_equivalent_mud_weight(depths, &psi)?;

    Ok(PressureProfile { psi, ppg })
}

/// Convert an absolute pressure curve (psi) to equivalent mud weight (ppg).
///
/// Formula: `ppg = psi / (0.052 × depth_ft)`
///
/// `depth <= 0` yields `None` — the conversion divides by depth.
pub fn to_equivalent_mud_weight(
    depths: &DepthSeries,
    pressure_psi: &LogCurve,
) -> Result<LogCurve, ValidationError> {
    pressure_psi.ensure_aligned(depths, "pressure curve")?;

    let values = (0..depths.len())
        .map(|i| {
            let psi = pressure_psi.get(i)?;
            let depth_ft = depths.feet_at(i)?;
            if depth_ft <= 0.0 {
                None
            } else {
                Some(psi / (PSI_PER_PPG_FT * depth_ft))
            }
        })
        .collect();
    Ok(LogCurve::new(values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DepthUnit;

    fn depths_ft(values: Vec<f64>) -> DepthSeries {
        DepthSeries::new(values, DepthUnit::Feet).unwrap()
    }

    #[test]
    fn test_terzaghi_exact() {
        let depths = depths_ft(vec![10000.0]);
        let obg = LogCurve::from_samples(vec![9500.0]);
        let sigma_e = LogCurve::from_samples(vec![3200.0]);

        let pp = calculate_pore_pressure(&depths, &obg, &sigma_e).unwrap();
        assert_eq!(pp.psi.get(0), Some(6300.0), "PP must equal OBG - sigma_e exactly");

        let expected_ppg = 6300.0 / (0.052 * 10000.0);
        let got = pp.ppg.get(0).unwrap();
        assert!(
            (got - expected_ppg).abs() < 1e-12,
            "ppg conversion mismatch: {got} vs {expected_ppg}"
        );
    }

    #[test]
    fn test_gap_propagates_not_zero() {
        let depths = depths_ft(vec![5000.0, 6000.0]);
        let obg = LogCurve::new(vec![Some(5000.0), None]);
        let sigma_e = LogCurve::from_samples(vec![2000.0, 2500.0]);

        let pp = calculate_pore_pressure(&depths, &obg, &sigma_e).unwrap();
        assert_eq!(pp.psi.get(0), Some(3000.0));
        assert_eq!(pp.psi.get(1), None, "gap must propagate, never coerce to zero");
        assert_eq!(pp.ppg.get(1), None);
    }

    #[test]
    fn test_depth_zero_yields_none() {
        // Depth 0 at the top of the series: psi is computable, ppg is not
        let depths = depths_ft(vec![0.0, 1000.0]);
        let obg = LogCurve::from_samples(vec![0.0, 1000.0]);
        let sigma_e = LogCurve::from_samples(vec![0.0, 400.0]);

        let pp = calculate_pore_pressure(&depths, &obg, &sigma_e).unwrap();
        assert_eq!(pp.ppg.get(0), None, "gradient conversion undefined at depth 0");
        assert!(pp.ppg.get(1).is_some());
    }

    #[test]
    fn test_length_mismatch_is_error_not_truncation() {
        let depths = depths_ft(vec![5000.0, 6000.0]);
        let obg = LogCurve::from_samples(vec![5000.0]);
        let sigma_e = LogCurve::from_samples(vec![2000.0, 2500.0]);

        let result = calculate_pore_pressure(&depths, &obg, &sigma_e);
        assert!(matches!(
            result,
            Err(ValidationError::LengthMismatch {
                context: "overburden curve",
                ..
            })
        ));
    }

    #[test]
    fn test_eaton_normal_trend_at_unit_ratio() {
        let obg = LogCurve::from_samples(vec![9000.0]);
        let hydro = LogCurve::from_samples(vec![4185.0]);
        let ratio = LogCurve::from_samples(vec![1.0]);

        let sigma_e = eaton_effective_stress(&obg, &hydro, &ratio, 3.0).unwrap();
        let got = sigma_e.get(0).unwrap();
        assert!(
            (got - (9000.0 - 4185.0)).abs() < 1e-9,
            "ratio 1.0 must reproduce the normal-trend effective stress, got {got}"
        );
    }

    #[test]
    fn test_eaton_overpressure_reduces_effective_stress() {
        let obg = LogCurve::from_samples(vec![9000.0]);
        let hydro = LogCurve::from_samples(vec![4185.0]);
        let normal = eaton_effective_stress(&obg, &hydro, &LogCurve::from_samples(vec![1.0]), 3.0)
            .unwrap()
            .get(0)
            .unwrap();
        let slow = eaton_effective_stress(&obg, &hydro, &LogCurve::from_samples(vec![0.8]), 3.0)
            .unwrap()
            .get(0)
            .unwrap();
        assert!(
            slow < normal,
            "ratio below trend must reduce effective stress: {slow} vs {normal}"
        );
        // 0.8^3 = 0.512
        assert!((slow - normal * 0.512).abs() < 1e-9);
    }

    #[test]
    fn test_eaton_rejects_bad_exponent() {
        let curve = LogCurve::from_samples(vec![1.0]);
        assert!(eaton_effective_stress(&curve, &curve, &curve, 0.0).is_err());
        assert!(eaton_effective_stress(&curve, &curve, &curve, f64::NAN).is_err());
    }

    #[test]
    fn test_eaton_non_positive_ratio_is_gap() {
        let obg = LogCurve::from_samples(vec![9000.0, 9100.0]);
        let hydro = LogCurve::from_samples(vec![4185.0, 4200.0]);
        let ratio = LogCurve::new(vec![Some(-0.5), Some(1.0)]);

        let sigma_e = eaton_effective_stress(&obg, &hydro, &ratio, 3.0).unwrap();
        assert_eq!(sigma_e.get(0), None, "negative ratio sample is a gap");
        assert!(sigma_e.get(1).is_some());
    }

    #[test]
    fn test_hydrostatic_gradient_validation() {
        let depths = depths_ft(vec![1000.0]);
        assert!(hydrostatic_pressure_psi(&depths, 0.0).is_err());
        assert!(hydrostatic_pressure_psi(&depths, -0.465).is_err());

        let curve = hydrostatic_pressure_psi(&depths, 0.465).unwrap();
        assert!((curve.get(0).unwrap() - 465.0).abs() < 1e-9);
    }

    #[test]
    fn test_metric_depths_convert_for_ppg() {
        let depths = DepthSeries::new(vec![1000.0], DepthUnit::Meters).unwrap();
        let pressure = LogCurve::from_samples(vec![5000.0]);
        let ppg = to_equivalent_mud_weight(&depths, &pressure).unwrap();
        let expected = 5000.0 / (0.052 * 3280.84);
        let got = ppg.get(0).unwrap();
        assert!(
            (got - expected).abs() < 1e-9,
            "metric depth must convert to feet first: {got} vs {expected}"
        );
    }
}
