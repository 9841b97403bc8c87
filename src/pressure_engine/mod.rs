//! Pressure Engine Module
//!
//! Deterministic geomechanics for the PPFG pipeline. All math here is pure
//! physics over immutable depth series — no randomness, no shared state.
//!
//! ## Pipeline order (leaves first)
//! - `overburden` - OBG profile from a provided series or density-log integration
//! - `pore_pressure` - Eaton effective stress + Terzaghi inversion (PP = OBG - σe)
//! - `fracture_gradient` - Poisson-ratio horizontal-stress model (FG = PP + K0·(OBG - PP))
//!
//! Per-point gaps (`None`) propagate through every calculation; structural
//! errors (misaligned series, out-of-domain parameters) abort before any
//! computation.

pub mod fracture_gradient;
pub mod overburden;
pub mod pore_pressure;

pub use fracture_gradient::{calculate_fracture_gradient, stress_ratio_k0};
pub use overburden::OverburdenModel;
pub use pore_pressure::{
    calculate_pore_pressure, eaton_effective_stress, hydrostatic_pressure_psi,
    to_equivalent_mud_weight,
};

use serde::{Deserialize, Serialize};

use crate::types::{DepthSeries, LogCurve, ValidationError};

// ============================================================================
// Physical Constants
// ============================================================================

/// Mud-weight conversion factor: pressure (psi) = 0.052 × mud weight (ppg) × depth (ft).
pub const PSI_PER_PPG_FT: f64 = 0.052;

/// Freshwater pressure gradient (psi/ft per g/cc of density).
pub const WATER_GRADIENT_PSI_FT: f64 = 0.433;

// ============================================================================
// Pressure Profile
// ============================================================================

/// A single deterministic pressure curve in both output units.
///
/// `psi` and `ppg` are aligned to the same depth series; a gap in one is a
/// gap in the other (except `ppg` additionally gaps where `depth <= 0`,
/// where the gradient conversion is physically undefined).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PressureProfile {
    pub psi: LogCurve,
    pub ppg: LogCurve,
}

/// One deterministic evaluation of the full pressure chain:
/// Eaton σe → Terzaghi PP → Poisson-ratio FG.
///
/// This is the kernel the Monte Carlo layer runs once per trial with
/// perturbed `eaton_exponent` / `poisson_ratio`.
///
/// # Errors
/// Any misaligned input curve or out-of-domain parameter.
pub fn evaluate_pressure_chain(
    depths: &DepthSeries,
    obg_psi: &LogCurve,
    hydrostatic_psi: &LogCurve,
    ratio: &LogCurve,
    eaton_exponent: f64,
    poisson_ratio: f64,
) -> Result<(PressureProfile, PressureProfile), ValidationError> {
    let sigma_e = eaton_effective_stress(obg_psi, hydrostatic_psi, ratio, eaton_exponent)?;
    let pp = calculate_pore_pressure(depths, obg_psi, &sigma_e)?;
    let fg = calculate_fracture_gradient(depths, obg_psi, &pp.psi, poisson_ratio)?;
    Ok((pp, fg))
}
