//! Engine Configuration Module
//!
//! Operator-tunable parameters loaded from TOML files: formation model
//! defaults, risk-window thresholds, and Monte Carlo sizing.
//!
//! ## Loading Order
//!
//! 1. `PPFG_CONFIG` environment variable (path to TOML file)
//! 2. `ppfg_config.toml` in the current working directory
//! 3. Built-in defaults
//!
//! The configuration is an ordinary value passed to the engine by the
//! caller — there is no process-global config state. Validation is strict
//! for physical-domain errors (a bad Poisson ratio aborts loading) and
//! warning-only for suspicious-but-legal values and unknown keys.

pub mod defaults;
pub mod validation;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::types::ValidationError;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("failed to parse config file {0}: {1}")]
    Parse(PathBuf, #[source] toml::de::Error),

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for a PPFG assessment.
///
/// Load with `EngineConfig::load()` which searches:
/// 1. `$PPFG_CONFIG` env var
/// 2. `./ppfg_config.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Well identification (export metadata only)
    #[serde(default)]
    pub well: WellInfo,

    /// Deterministic formation-model parameters
    #[serde(default)]
    pub formation: FormationConfig,

    /// Drilling-window risk thresholds
    #[serde(default)]
    pub risk: RiskThresholdConfig,

    /// Monte Carlo sizing and reproducibility
    #[serde(default)]
    pub monte_carlo: MonteCarloConfig,
}

/// Well identification for export metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WellInfo {
    #[serde(default = "WellInfo::default_name")]
    pub name: String,

    #[serde(default)]
    pub field: String,
}

impl WellInfo {
    fn default_name() -> String {
        "UNNAMED".to_string()
    }
}

impl Default for WellInfo {
    fn default() -> Self {
        Self {
            name: Self::default_name(),
            field: String::new(),
        }
    }
}

/// Deterministic formation-model parameters.
///
/// These are the *central* values; the Monte Carlo layer perturbs the Eaton
/// exponent and Poisson ratio around calibrated distributions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormationConfig {
    /// Poisson's ratio for the horizontal-stress model, must be in (0, 0.5)
    #[serde(default = "FormationConfig::default_poisson_ratio")]
    pub poisson_ratio: f64,

    /// Eaton exponent for the effective-stress relation, must be > 0
    #[serde(default = "FormationConfig::default_eaton_exponent")]
    pub eaton_exponent: f64,

    /// Normal (hydrostatic) pore-pressure gradient (psi/ft), must be > 0
    #[serde(default = "FormationConfig::default_hydrostatic_gradient")]
    pub hydrostatic_gradient_psi_ft: f64,
}

impl FormationConfig {
    fn default_poisson_ratio() -> f64 {
        defaults::DEFAULT_POISSON_RATIO
    }

    fn default_eaton_exponent() -> f64 {
        defaults::DEFAULT_EATON_EXPONENT
    }

    fn default_hydrostatic_gradient() -> f64 {
        defaults::DEFAULT_HYDROSTATIC_GRADIENT_PSI_FT
    }
}

impl Default for FormationConfig {
    fn default() -> Self {
        Self {
            poisson_ratio: Self::default_poisson_ratio(),
            eaton_exponent: Self::default_eaton_exponent(),
            hydrostatic_gradient_psi_ft: Self::default_hydrostatic_gradient(),
        }
    }
}

/// Drilling-window risk thresholds (ppg).
///
/// Classification of `window = FG_P10 - PP_P90`:
/// - `window <  high_margin_ppg`   → High
/// - `window <  medium_margin_ppg` → Medium
/// - otherwise                     → Low
///
/// Operator-tunable so different risk tolerances map to the same engine.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RiskThresholdConfig {
    #[serde(default = "RiskThresholdConfig::default_high_margin")]
    pub high_margin_ppg: f64,

    #[serde(default = "RiskThresholdConfig::default_medium_margin")]
    pub medium_margin_ppg: f64,
}

impl RiskThresholdConfig {
    fn default_high_margin() -> f64 {
        defaults::DEFAULT_HIGH_MARGIN_PPG
    }

    fn default_medium_margin() -> f64 {
        defaults::DEFAULT_MEDIUM_MARGIN_PPG
    }
}

impl Default for RiskThresholdConfig {
    fn default() -> Self {
        Self {
            high_margin_ppg: Self::default_high_margin(),
            medium_margin_ppg: Self::default_medium_margin(),
        }
    }
}

/// Monte Carlo sizing and reproducibility.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MonteCarloConfig {
    /// Number of trials per assessment, must be >= 1
    #[serde(default = "MonteCarloConfig::default_trials")]
    pub trials: usize,

    /// Master seed; per-trial streams are derived from it by trial index
    #[serde(default = "MonteCarloConfig::default_seed")]
    pub seed: u64,
}

impl MonteCarloConfig {
    fn default_trials() -> usize {
        defaults::DEFAULT_TRIAL_COUNT
    }

    fn default_seed() -> u64 {
        defaults::DEFAULT_SEED
    }
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            trials: Self::default_trials(),
            seed: Self::default_seed(),
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

impl EngineConfig {
    /// Load configuration using the standard search order:
    /// 1. `$PPFG_CONFIG` environment variable
    /// 2. `./ppfg_config.toml` in the current working directory
    /// 3. Built-in defaults
    pub fn load() -> Self {
        if let Ok(path) = std::env::var("PPFG_CONFIG") {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), well = %config.well.name, "Loaded engine config from PPFG_CONFIG");
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from PPFG_CONFIG, falling back");
                    }
                }
            } else {
                warn!(path = %path, "PPFG_CONFIG points to non-existent file, falling back");
            }
        }

        let local = PathBuf::from("ppfg_config.toml");
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!(well = %config.well.name, "Loaded engine config from ./ppfg_config.toml");
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./ppfg_config.toml, using defaults");
                }
            }
        }

        info!("No ppfg_config.toml found — using built-in defaults");
        Self::default()
    }

    /// Load from a specific TOML file path.
    ///
    /// Unknown keys and suspicious-but-legal values produce `tracing`
    /// warnings; physical-domain violations are hard errors.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        let config = Self::from_toml_str(&contents, path)?;
        Ok(config)
    }

    /// Parse and validate a TOML string. `path` is used for error context only.
    pub fn from_toml_str(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        // Two-pass: check for unknown keys first (warnings only)
        for w in validation::validate_unknown_keys(contents) {
            warn!("{}", w);
        }

        let config: Self =
            toml::from_str(contents).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
        config.validate()?;
        for w in validation::range_warnings(&config) {
            warn!("{}", w);
        }
        Ok(config)
    }

    /// Hard physical-domain validation.
    ///
    /// # Errors
    /// Any out-of-domain parameter: Poisson ratio outside (0, 0.5),
    /// non-positive Eaton exponent or hydrostatic gradient, misordered risk
    /// thresholds, zero trial count.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let f = &self.formation;
        if !f.poisson_ratio.is_finite() || f.poisson_ratio <= 0.0 || f.poisson_ratio >= 0.5 {
            return Err(ValidationError::PoissonOutOfRange(f.poisson_ratio));
        }
        if !f.eaton_exponent.is_finite() || f.eaton_exponent <= 0.0 {
            return Err(ValidationError::NonFiniteParameter {
                context: "formation.eaton_exponent (must be positive)",
                value: f.eaton_exponent,
            });
        }
        if !f.hydrostatic_gradient_psi_ft.is_finite() || f.hydrostatic_gradient_psi_ft <= 0.0 {
            return Err(ValidationError::NonPositiveHydrostaticGradient(
                f.hydrostatic_gradient_psi_ft,
            ));
        }

        let r = &self.risk;
        if !r.high_margin_ppg.is_finite() {
            return Err(ValidationError::NonFiniteParameter {
                context: "risk.high_margin_ppg",
                value: r.high_margin_ppg,
            });
        }
        if !r.medium_margin_ppg.is_finite() {
            return Err(ValidationError::NonFiniteParameter {
                context: "risk.medium_margin_ppg",
                value: r.medium_margin_ppg,
            });
        }
        if r.high_margin_ppg > r.medium_margin_ppg {
            return Err(ValidationError::MisorderedRiskThresholds {
                high: r.high_margin_ppg,
                medium: r.medium_margin_ppg,
            });
        }

        if self.monte_carlo.trials == 0 {
            return Err(ValidationError::ZeroTrialCount);
        }

        Ok(())
    }
}
