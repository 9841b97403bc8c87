//! Uncertainty Module
//!
//! The probabilistic layer over the deterministic pressure engine:
//! - `bayesian`: conjugate normal-normal calibration of model parameters
//! - `sampler`: correlated joint draws via Cholesky factorization
//! - `percentiles`: nearest-rank P10/P50/P90 reduction of trial sets
//! - `MonteCarloEngine`: the per-trial fan-out that ties them together
//!
//! Trials are independent and run in parallel (rayon); the percentile
//! reduction is a join — a partial trial set is never aggregated. Per-trial
//! RNG streams are derived from the master seed by trial index, so results
//! are bit-identical regardless of how the scheduler interleaves trials.

pub mod bayesian;
pub mod percentiles;
pub mod sampler;

pub use bayesian::{calibrate_sequence, credible_interval, posterior_update, CredibleInterval};
pub use percentiles::{aggregate_trials, nearest_rank_index, AggregationError};
pub use sampler::{validate_positive_definite, CorrelatedSampler};

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::{defaults::MAX_PARAMETER_REDRAWS, EngineConfig};
use crate::pressure_engine::{evaluate_pressure_chain, hydrostatic_pressure_psi};
use crate::risk::classify_drilling_window;
use crate::types::{
    CorrelationMatrix, DepthSeries, LogCurve, ParameterDistribution, PressureUnit,
    ProbabilisticProfile, RiskPoint, ValidationError,
};

// ============================================================================
// Error Types
// ============================================================================

/// Any failure of a full probabilistic assessment.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Aggregation(#[from] AggregationError),

    #[error("trial {trial}: {parameter} stayed outside its physical domain after {attempts} redraws — prior too wide for the domain")]
    DomainExhausted {
        trial: usize,
        parameter: &'static str,
        attempts: usize,
    },
}

// ============================================================================
// Inputs
// ============================================================================

/// Depth-aligned well model inputs for one assessment.
#[derive(Debug, Clone)]
pub struct WellModelInputs {
    depths: DepthSeries,
    obg_psi: LogCurve,
    ratio: LogCurve,
}

impl WellModelInputs {
    /// # Errors
    /// `LengthMismatch` if either curve is not aligned with `depths`.
    pub fn new(
        depths: DepthSeries,
        obg_psi: LogCurve,
        ratio: LogCurve,
    ) -> Result<Self, ValidationError> {
        obg_psi.ensure_aligned(&depths, "overburden curve")?;
        ratio.ensure_aligned(&depths, "log-response ratio curve")?;
        Ok(Self {
            depths,
            obg_psi,
            ratio,
        })
    }

    pub fn depths(&self) -> &DepthSeries {
        &self.depths
    }

    pub fn obg_psi(&self) -> &LogCurve {
        &self.obg_psi
    }

    pub fn ratio(&self) -> &LogCurve {
        &self.ratio
    }
}

/// Calibrated uncertain parameters for the Monte Carlo fan-out.
///
/// Sample vector order is fixed: index 0 = Eaton exponent, index 1 =
/// Poisson ratio. The correlation matrix uses the same order.
#[derive(Debug, Clone)]
pub struct CalibratedParameters {
    eaton_exponent: ParameterDistribution,
    poisson_ratio: ParameterDistribution,
    correlation: CorrelationMatrix,
}

impl CalibratedParameters {
    /// # Errors
    /// `ParameterCountMismatch` unless the correlation matrix is 2×2.
    pub fn new(
        eaton_exponent: ParameterDistribution,
        poisson_ratio: ParameterDistribution,
        correlation: CorrelationMatrix,
    ) -> Result<Self, ValidationError> {
        if correlation.dimension() != 2 {
            return Err(ValidationError::ParameterCountMismatch {
                matrix: correlation.dimension(),
                parameters: 2,
            });
        }
        Ok(Self {
            eaton_exponent,
            poisson_ratio,
            correlation,
        })
    }

    /// Convenience constructor for uncorrelated parameters.
    pub fn independent(
        eaton_exponent: ParameterDistribution,
        poisson_ratio: ParameterDistribution,
    ) -> Self {
        Self {
            eaton_exponent,
            poisson_ratio,
            correlation: CorrelationMatrix::identity(2),
        }
    }

    pub fn eaton_exponent(&self) -> &ParameterDistribution {
        &self.eaton_exponent
    }

    pub fn poisson_ratio(&self) -> &ParameterDistribution {
        &self.poisson_ratio
    }

    pub fn correlation(&self) -> &CorrelationMatrix {
        &self.correlation
    }
}

// ============================================================================
// Metrics
// ============================================================================

/// Caller-owned accumulator for assessment telemetry.
///
/// Passed in explicitly so two concurrent assessments never share counters;
/// there is no process-wide metrics state.
#[derive(Debug, Clone, Default)]
pub struct RunMetrics {
    /// Trials completed across all runs recorded into this accumulator
    pub trials_run: usize,
    /// Parameter draws rejected for leaving the physical domain
    pub domain_redraws: u64,
    /// Output depths left unclassified because of input gaps
    pub unclassified_depths: usize,
    /// Wall-clock time spent inside `MonteCarloEngine::run`
    pub elapsed: Duration,
}

// ============================================================================
// Assessment Output
// ============================================================================

/// Full probabilistic output of one assessment, aligned to the input depths.
#[derive(Debug, Clone)]
pub struct ProbabilisticAssessment {
    pub pp_psi: ProbabilisticProfile,
    pub pp_ppg: ProbabilisticProfile,
    pub fg_psi: ProbabilisticProfile,
    pub fg_ppg: ProbabilisticProfile,
    pub risk: Vec<RiskPoint>,
}

// ============================================================================
// Monte Carlo Engine
// ============================================================================

/// Output of one trial: the four pressure curves it produced.
struct TrialOutput {
    pp_psi: Vec<Option<f64>>,
    pp_ppg: Vec<Option<f64>>,
    fg_psi: Vec<Option<f64>>,
    fg_ppg: Vec<Option<f64>>,
    redraws: u64,
}

/// Monte Carlo fan-out over the deterministic pressure chain.
#[derive(Debug, Clone)]
pub struct MonteCarloEngine {
    config: EngineConfig,
}

impl MonteCarloEngine {
    /// # Errors
    /// Any config-level domain violation (Poisson range, trial count, ...).
    pub fn new(config: EngineConfig) -> Result<Self, ValidationError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run the full probabilistic assessment.
    ///
    /// Fan-out: draw a correlated (Eaton exponent, Poisson ratio) pair per
    /// trial, evaluate the deterministic chain, then join all trials into
    /// P10/P50/P90 envelopes and classify the drilling window.
    ///
    /// Deterministic for a fixed seed: per-trial RNG streams are derived
    /// from the master seed by trial index, independent of thread
    /// scheduling.
    pub fn run(
        &self,
        inputs: &WellModelInputs,
        parameters: &CalibratedParameters,
        metrics: &mut RunMetrics,
    ) -> Result<ProbabilisticAssessment, EngineError> {
        let started = Instant::now();
        let depths = inputs.depths();
        let trials = self.config.monte_carlo.trials;
        let master_seed = self.config.monte_carlo.seed;

        let hydrostatic = hydrostatic_pressure_psi(
            depths,
            self.config.formation.hydrostatic_gradient_psi_ft,
        )?;
        let sampler = CorrelatedSampler::new(
            parameters.correlation(),
            vec![*parameters.eaton_exponent(), *parameters.poisson_ratio()],
        )?;

        let outputs: Vec<TrialOutput> = (0..trials)
            .into_par_iter()
            .map(|trial| {
                let mut rng = StdRng::seed_from_u64(derive_trial_seed(master_seed, trial));
                let (eaton_n, nu, redraws) = draw_physical_pair(&sampler, &mut rng, trial)?;
                let (pp, fg) = evaluate_pressure_chain(
                    depths,
                    inputs.obg_psi(),
                    &hydrostatic,
                    inputs.ratio(),
                    eaton_n,
                    nu,
                )?;
                Ok(TrialOutput {
                    pp_psi: pp.psi.values().to_vec(),
                    pp_ppg: pp.ppg.values().to_vec(),
                    fg_psi: fg.psi.values().to_vec(),
                    fg_ppg: fg.ppg.values().to_vec(),
                    redraws,
                })
            })
            .collect::<Result<Vec<_>, EngineError>>()?;

        // Join: all trials completed before any aggregation
        let pp_psi = Self::column(&outputs, |t| &t.pp_psi, PressureUnit::Psi)?;
        let pp_ppg = Self::column(&outputs, |t| &t.pp_ppg, PressureUnit::Ppg)?;
        let fg_psi = Self::column(&outputs, |t| &t.fg_psi, PressureUnit::Psi)?;
        let fg_ppg = Self::column(&outputs, |t| &t.fg_ppg, PressureUnit::Ppg)?;

        let risk = classify_drilling_window(depths, &pp_ppg, &fg_ppg, &self.config.risk)?;

        let unclassified = risk.iter().filter(|p| p.risk_level.is_none()).count();
        let redraws: u64 = outputs.iter().map(|t| t.redraws).sum();

        metrics.trials_run += trials;
        metrics.domain_redraws += redraws;
        metrics.unclassified_depths += unclassified;
        metrics.elapsed += started.elapsed();

        if unclassified > 0 {
            warn!(
                unclassified,
                total = risk.len(),
                "assessment left depths unclassified due to input gaps"
            );
        }
        info!(
            trials,
            depths = depths.len(),
            redraws,
            elapsed_ms = started.elapsed().as_millis(),
            "probabilistic assessment complete"
        );

        Ok(ProbabilisticAssessment {
            pp_psi,
            pp_ppg,
            fg_psi,
            fg_ppg,
            risk,
        })
    }

    fn column<F>(
        outputs: &[TrialOutput],
        select: F,
        unit: PressureUnit,
    ) -> Result<ProbabilisticProfile, AggregationError>
    where
        F: Fn(&TrialOutput) -> &Vec<Option<f64>>,
    {
        let trials: Vec<Vec<Option<f64>>> = outputs.iter().map(|t| select(t).clone()).collect();
        aggregate_trials(&trials, unit)
    }
}

/// Per-trial RNG stream: golden-ratio stride over the master seed so streams
/// are decorrelated and assignment is by trial index, not scheduling order.
fn derive_trial_seed(master_seed: u64, trial: usize) -> u64 {
    master_seed.wrapping_add((trial as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

/// Draw a correlated (Eaton exponent, Poisson ratio) pair inside the
/// physical domain, rejecting and redrawing tail samples.
///
/// Rejection keeps the joint structure intact (a truncated joint normal)
/// where clamping would pile probability mass on the domain boundary.
fn draw_physical_pair<R: rand::Rng + ?Sized>(
    sampler: &CorrelatedSampler,
    rng: &mut R,
    trial: usize,
) -> Result<(f64, f64, u64), EngineError> {
    let mut redraws = 0_u64;
    for _ in 0..MAX_PARAMETER_REDRAWS {
        if let [eaton_n, nu] = sampler.sample(rng)[..] {
            if eaton_n > 0.0 && nu > 0.0 && nu < 0.5 {
                return Ok((eaton_n, nu, redraws));
            }
        }
        redraws += 1;
    }
    Err(EngineError::DomainExhausted {
        trial,
        parameter: "Eaton exponent / Poisson ratio",
        attempts: MAX_PARAMETER_REDRAWS,
    })
}
