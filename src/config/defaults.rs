//! Built-in default constants for the engine configuration.
//!
//! Centralises the tunable values so `Default` impls and documentation agree.
//! Grouped by subsystem.

// ============================================================================
// Formation Model
// ============================================================================

/// Default Poisson's ratio for the horizontal-stress model.
///
/// 0.4 is representative of shale; sandstone trends lower (~0.25).
pub const DEFAULT_POISSON_RATIO: f64 = 0.4;

/// Default Eaton exponent for the effective-stress relation.
///
/// 3.0 is Eaton's original sonic/velocity exponent; resistivity workflows
/// often use 1.2.
pub const DEFAULT_EATON_EXPONENT: f64 = 3.0;

/// Default hydrostatic (normal) pore-pressure gradient (psi/ft).
///
/// 0.465 psi/ft = 8.95 ppg saline formation water.
pub const DEFAULT_HYDROSTATIC_GRADIENT_PSI_FT: f64 = 0.465;

// ============================================================================
// Risk Window
// ============================================================================

/// Window width (ppg) below which a depth is classified High risk.
///
/// 0.0 = classify High only when FG P10 and PP P90 actually overlap.
pub const DEFAULT_HIGH_MARGIN_PPG: f64 = 0.0;

/// Window width (ppg) below which a depth is classified Medium risk.
pub const DEFAULT_MEDIUM_MARGIN_PPG: f64 = 0.5;

// ============================================================================
// Monte Carlo
// ============================================================================

/// Default number of Monte Carlo trials per assessment.
pub const DEFAULT_TRIAL_COUNT: usize = 500;

/// Default master seed for the per-trial RNG streams.
pub const DEFAULT_SEED: u64 = 42;

/// Maximum redraws per trial when a sampled parameter lands outside its
/// physical domain (truncated-normal rejection sampling).
pub const MAX_PARAMETER_REDRAWS: usize = 64;
