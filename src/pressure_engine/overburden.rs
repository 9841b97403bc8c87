//! Overburden stress model
//!
//! The OBG profile is an upstream input to the pressure chain. Two sources:
//! a precomputed psi series from a collaborator, or trapezoidal integration
//! of a bulk-density log so a density curve can drive the pipeline directly.

use tracing::debug;

use crate::types::{DepthSeries, LogCurve, ValidationError};

use super::WATER_GRADIENT_PSI_FT;

/// Overburden stress profile (psi), aligned to a depth series.
#[derive(Debug, Clone, PartialEq)]
pub struct OverburdenModel {
    obg_psi: LogCurve,
}

impl OverburdenModel {
    /// Wrap a precomputed OBG series (psi).
    ///
    /// # Errors
    /// `LengthMismatch` if the curve is not aligned with `depths`.
    pub fn from_series(depths: &DepthSeries, obg_psi: LogCurve) -> Result<Self, ValidationError> {
        obg_psi.ensure_aligned(depths, "overburden curve")?;
        Ok(Self { obg_psi })
    }

    /// Integrate a bulk-density log (g/cc) into overburden stress.
    ///
    /// Formula (trapezoidal): `OBG[i] = OBG[i-1] + 0.433 × (ρ[i-1]+ρ[i])/2 × Δz_ft`
    ///
    /// The column above the first sample is assumed to carry the first
    /// sample's density. A missing or non-positive density sample poisons
    /// the profile from that depth down — integration cannot continue
    /// across a gap, and a deeper "recovered" value would understate the
    /// accumulated load.
    pub fn from_density_log(
        depths: &DepthSeries,
        density_gcc: &LogCurve,
    ) -> Result<Self, ValidationError> {
        density_gcc.ensure_aligned(depths, "density curve")?;

        let n = depths.len();
        let mut values: Vec<Option<f64>> = Vec::with_capacity(n);
        let mut running: Option<f64> = None;
        let mut poisoned = false;

        for i in 0..n {
            let depth_ft = match depths.feet_at(i) {
                Some(d) if d > 0.0 => d,
                // Above datum: undefined here, but integration may still
                // anchor at the first positive depth below
                _ => {
                    values.push(None);
                    continue;
                }
            };
            let density = match density_gcc.get(i) {
                Some(d) if d > 0.0 => d,
                _ => {
                    // Poison everything below the gap
                    poisoned = true;
                    running = None;
                    values.push(None);
                    continue;
                }
            };
            if poisoned {
                values.push(None);
                continue;
            }

            let next = match running {
                // First usable sample: constant density to surface
                None => WATER_GRADIENT_PSI_FT * density * depth_ft,
                Some(prev_obg) => {
                    // Depths are strictly increasing, so once usable the
                    // previous index i-1 was usable too
                    let prev_depth_ft = depths.feet_at(i - 1).unwrap_or(depth_ft);
                    let prev_density = density_gcc.get(i - 1).unwrap_or(density);
                    let avg = 0.5 * (prev_density + density);
                    prev_obg + WATER_GRADIENT_PSI_FT * avg * (depth_ft - prev_depth_ft)
                }
            };

            running = Some(next);
            values.push(Some(next));
        }

        let curve = LogCurve::new(values);
        if curve.gap_count() > 0 {
            debug!(
                gaps = curve.gap_count(),
                total = curve.len(),
                "density integration produced gapped overburden profile"
            );
        }
        Ok(Self { obg_psi: curve })
    }

    pub fn obg_psi(&self) -> &LogCurve {
        &self.obg_psi
    }

    pub fn into_curve(self) -> LogCurve {
        self.obg_psi
    }
}
