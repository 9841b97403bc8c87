//! Risk Window Engine
//!
//! Classifies each depth by the width of the safe mud-weight window: the gap
//! between the pessimistic fracture gradient (FG P10) and the pessimistic
//! pore pressure (PP P90). A negative window means the envelopes overlap —
//! there is no mud weight that both holds back formation fluid and avoids
//! fracturing the rock.

use tracing::debug;

use crate::config::RiskThresholdConfig;
use crate::types::{DepthSeries, ProbabilisticProfile, RiskLevel, RiskPoint, ValidationError};

/// Classify one window width (ppg) against the configured thresholds.
///
/// - `width < high_margin_ppg`   → High (kick/loss overlap zone)
/// - `width < medium_margin_ppg` → Medium (narrow margin)
/// - otherwise                   → Low
pub fn classify_window_width(width: f64, thresholds: &RiskThresholdConfig) -> RiskLevel {
    if width < thresholds.high_margin_ppg {
        RiskLevel::High
    } else if width < thresholds.medium_margin_ppg {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

/// Compute the drilling-window risk series from aligned PP and FG envelopes
/// (both in ppg).
///
/// `window_width[i] = FG.p10[i] - PP.p90[i]`
///
/// A depth where either side is missing yields an unclassified point
/// (`risk_level = None`) — absence of data must never read as "safe".
///
/// # Errors
/// - `LengthMismatch` if either profile is not aligned with `depths`
/// - `MisorderedRiskThresholds` if `high > medium`
pub fn classify_drilling_window(
    depths: &DepthSeries,
    pore_pressure_ppg: &ProbabilisticProfile,
    fracture_gradient_ppg: &ProbabilisticProfile,
    thresholds: &RiskThresholdConfig,
) -> Result<Vec<RiskPoint>, ValidationError> {
    if thresholds.high_margin_ppg > thresholds.medium_margin_ppg {
        return Err(ValidationError::MisorderedRiskThresholds {
            high: thresholds.high_margin_ppg,
            medium: thresholds.medium_margin_ppg,
        });
    }
    pore_pressure_ppg.ensure_aligned(depths, "pore pressure envelope")?;
    fracture_gradient_ppg.ensure_aligned(depths, "fracture gradient envelope")?;

    let points: Vec<RiskPoint> = (0..depths.len())
        .map(|i| {
            let depth = depths.get(i).unwrap_or_default();
            match (fracture_gradient_ppg.p10[i], pore_pressure_ppg.p90[i]) {
                (Some(fg_p10), Some(pp_p90)) => {
                    let width = fg_p10 - pp_p90;
                    RiskPoint {
                        depth,
                        window_width: Some(width),
                        risk_level: Some(classify_window_width(width, thresholds)),
                    }
                }
                _ => RiskPoint {
                    depth,
                    window_width: None,
                    risk_level: None,
                },
            }
        })
        .collect();

    let high_count = points
        .iter()
        .filter(|p| p.risk_level == Some(RiskLevel::High))
        .count();
    if high_count > 0 {
        debug!(
            high_count,
            total = points.len(),
            "drilling window contains high-risk depths"
        );
    }

    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DepthUnit, PressureUnit};

    fn thresholds() -> RiskThresholdConfig {
        RiskThresholdConfig::default()
    }

    fn profile(p10: Vec<Option<f64>>, p90: Vec<Option<f64>>) -> ProbabilisticProfile {
        let p50 = p10.clone();
        ProbabilisticProfile {
            unit: PressureUnit::Ppg,
            p10,
            p50,
            p90,
        }
    }

    #[test]
    fn test_overlap_is_high_risk() {
        let depths = DepthSeries::new(vec![9000.0], DepthUnit::Feet).unwrap();
        let pp = profile(vec![Some(5.0)], vec![Some(5.6)]);
        let fg = profile(vec![Some(5.0)], vec![Some(6.0)]);

        let points = classify_drilling_window(&depths, &pp, &fg, &thresholds()).unwrap();
        let width = points[0].window_width.unwrap();
        assert!((width - (-0.6)).abs() < 1e-12, "window should be -0.6, got {width}");
        assert_eq!(points[0].risk_level, Some(RiskLevel::High));
    }

    #[test]
    fn test_narrow_margin_is_medium_risk() {
        let depths = DepthSeries::new(vec![9000.0], DepthUnit::Feet).unwrap();
        let pp = profile(vec![Some(5.0)], vec![Some(5.6)]);
        let fg = profile(vec![Some(6.0)], vec![Some(7.0)]);

        let points = classify_drilling_window(&depths, &pp, &fg, &thresholds()).unwrap();
        let width = points[0].window_width.unwrap();
        assert!((width - 0.4).abs() < 1e-12);
        assert_eq!(points[0].risk_level, Some(RiskLevel::Medium));
    }

    #[test]
    fn test_wide_margin_is_low_risk() {
        let depths = DepthSeries::new(vec![9000.0], DepthUnit::Feet).unwrap();
        let pp = profile(vec![Some(5.0)], vec![Some(5.6)]);
        let fg = profile(vec![Some(7.0)], vec![Some(8.0)]);

        let points = classify_drilling_window(&depths, &pp, &fg, &thresholds()).unwrap();
        let width = points[0].window_width.unwrap();
        assert!((width - 1.4).abs() < 1e-12);
        assert_eq!(points[0].risk_level, Some(RiskLevel::Low));
    }

    #[test]
    fn test_missing_data_is_unclassified_not_low() {
        let depths = DepthSeries::new(vec![9000.0, 9100.0], DepthUnit::Feet).unwrap();
        let pp = profile(vec![Some(5.0), Some(5.1)], vec![Some(5.6), None]);
        let fg = profile(vec![Some(7.0), Some(7.1)], vec![Some(8.0), Some(8.1)]);

        let points = classify_drilling_window(&depths, &pp, &fg, &thresholds()).unwrap();
        assert_eq!(points[1].risk_level, None, "missing PP must not read as safe");
        assert_eq!(points[1].window_width, None);
        assert_eq!(points[1].depth, 9100.0);
    }

    #[test]
    fn test_custom_thresholds_shift_classification() {
        let custom = RiskThresholdConfig {
            high_margin_ppg: 0.2,
            medium_margin_ppg: 1.0,
        };
        // A 0.4 ppg window is Medium under defaults, still Medium here;
        // a 1.2 ppg window is Low under defaults and here;
        // a 0.1 ppg window flips from Medium to High
        assert_eq!(classify_window_width(0.1, &custom), RiskLevel::High);
        assert_eq!(classify_window_width(0.4, &custom), RiskLevel::Medium);
        assert_eq!(classify_window_width(1.2, &custom), RiskLevel::Low);
    }

    #[test]
    fn test_boundary_values_use_half_open_intervals() {
        let t = thresholds();
        // Exactly 0 is not High (window does not overlap), exactly 0.5 is Low
        assert_eq!(classify_window_width(0.0, &t), RiskLevel::Medium);
        assert_eq!(classify_window_width(0.5, &t), RiskLevel::Low);
    }

    #[test]
    fn test_misaligned_profiles_rejected() {
        let depths = DepthSeries::new(vec![9000.0, 9100.0], DepthUnit::Feet).unwrap();
        let pp = profile(vec![Some(5.0)], vec![Some(5.6)]);
        let fg = profile(vec![Some(7.0), Some(7.1)], vec![Some(8.0), Some(8.1)]);

        let result = classify_drilling_window(&depths, &pp, &fg, &thresholds());
        assert!(matches!(result, Err(ValidationError::LengthMismatch { .. })));
    }
}
