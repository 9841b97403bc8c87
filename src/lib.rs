//! PPFG Engine: Probabilistic Pore-Pressure / Fracture-Gradient Intelligence
//!
//! Converts depth-indexed well-log curves and calibrated parameters into
//! probabilistic PP and FG profiles, then classifies the drilling-margin
//! window at every depth.
//!
//! ## Architecture
//!
//! - **Pressure Engine**: deterministic geomechanics (overburden integration,
//!   Eaton effective stress, Terzaghi inversion, Poisson-ratio fracture model)
//! - **Uncertainty Module**: Bayesian parameter calibration, Cholesky-based
//!   correlated sampling, Monte Carlo fan-out, percentile aggregation
//! - **Risk Window Engine**: drilling-margin classification from the
//!   pessimistic envelope pair (FG P10 vs PP P90)
//! - **Export**: flattened per-depth tables for downstream dashboards
//!
//! Everything flows strictly downstream over immutable value records; the
//! only randomness is the injected, seeded Monte Carlo stream.

pub mod config;
pub mod export;
pub mod pressure_engine;
pub mod risk;
pub mod types;
pub mod uncertainty;

// Re-export engine configuration
pub use config::{EngineConfig, RiskThresholdConfig};

// Re-export commonly used types
pub use types::{
    CorrelationMatrix, DepthSeries, DepthUnit, LogCurve, ParameterDistribution, PressureUnit,
    ProbabilisticProfile, RiskLevel, RiskPoint, ValidationError,
};

// Re-export the deterministic chain
pub use pressure_engine::{
    calculate_fracture_gradient, calculate_pore_pressure, evaluate_pressure_chain,
    OverburdenModel, PressureProfile,
};

// Re-export the probabilistic layer
pub use uncertainty::{
    AggregationError, CalibratedParameters, CorrelatedSampler, EngineError, MonteCarloEngine,
    ProbabilisticAssessment, RunMetrics, WellModelInputs,
};

// Re-export risk classification
pub use risk::{classify_drilling_window, classify_window_width};
