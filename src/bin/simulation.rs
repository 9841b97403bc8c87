//! Synthetic PPFG Well Simulation
//!
//! Generates a synthetic well (density log + normalized compaction-trend
//! ratio) and runs the full probabilistic assessment against it:
//! density integration → Eaton → Terzaghi → fracture gradient → Monte Carlo
//! envelopes → drilling-window risk.
//!
//! # Usage
//! ```bash
//! ./simulation --depth-to 12000 --trials 1000 --seed 7 --format table
//! ```

use clap::Parser;
use rand::prelude::*;
use rand_distr::{Distribution, Normal};
use std::io::{self, Write};

use ppfg_engine::config::EngineConfig;
use ppfg_engine::export::{self, ExportMetadata, ExportTable};
use ppfg_engine::pressure_engine::OverburdenModel;
use ppfg_engine::types::{
    CorrelationMatrix, DepthSeries, DepthUnit, LogCurve, ParameterDistribution,
};
use ppfg_engine::uncertainty::{
    calibrate_sequence, CalibratedParameters, MonteCarloEngine, RunMetrics, WellModelInputs,
};

// ============================================================================
// Synthetic Well Constants
// ============================================================================

/// Surface (unconsolidated) bulk density (g/cc)
const SURFACE_DENSITY: f64 = 1.9;
/// Density increase from surface to full compaction (g/cc)
const COMPACTION_DENSITY_GAIN: f64 = 0.75;
/// Compaction e-folding depth (ft)
const COMPACTION_DEPTH_FT: f64 = 6000.0;
/// Density log noise (g/cc, 1 sigma)
const DENSITY_NOISE: f64 = 0.015;
/// Ratio log noise (dimensionless, 1 sigma)
const RATIO_NOISE: f64 = 0.01;

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "ppfg-simulation")]
#[command(about = "Synthetic well PPFG assessment for engine testing")]
#[command(version = "1.0")]
struct Args {
    /// Top of the assessed interval (ft)
    #[arg(long, default_value = "4000")]
    depth_from: f64,

    /// Bottom of the assessed interval (ft)
    #[arg(long, default_value = "12000")]
    depth_to: f64,

    /// Depth step (ft)
    #[arg(long, default_value = "50")]
    step: f64,

    /// Monte Carlo trials (overrides config)
    #[arg(short, long)]
    trials: Option<usize>,

    /// Master seed for the well generator and the engine
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Output format: table, csv or json
    #[arg(short, long, default_value = "table")]
    format: String,

    /// Suppress log output (only print the result)
    #[arg(short, long)]
    quiet: bool,
}

// ============================================================================
// Pressure Regimes
// ============================================================================

/// Pressure regime along the synthetic wellbore.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Regime {
    /// Normally pressured section (0-55% of the interval)
    Normal,
    /// Transition ramp into overpressure (55-75%)
    Transition,
    /// Overpressured section (75-100%)
    Overpressured,
}

impl Regime {
    fn from_progress(progress: f64) -> Self {
        match progress {
            p if p < 0.55 => Regime::Normal,
            p if p < 0.75 => Regime::Transition,
            _ => Regime::Overpressured,
        }
    }

    /// Noise-free compaction-trend ratio for this regime.
    fn base_ratio(self, progress: f64) -> f64 {
        match self {
            Regime::Normal => 1.0,
            // Linear ramp from 1.0 down to 0.8 across the transition
            Regime::Transition => 1.0 - 0.2 * ((progress - 0.55) / 0.20),
            Regime::Overpressured => 0.8,
        }
    }
}

// ============================================================================
// Synthetic Well Generator
// ============================================================================

struct SyntheticWell {
    depths: DepthSeries,
    density: LogCurve,
    ratio: LogCurve,
}

fn generate_well(args: &Args) -> anyhow::Result<SyntheticWell> {
    let mut rng = StdRng::seed_from_u64(args.seed);
    let density_noise = Normal::new(0.0, DENSITY_NOISE)?;
    let ratio_noise = Normal::new(0.0, RATIO_NOISE)?;

    let mut depths = Vec::new();
    let mut depth = args.depth_from;
    while depth <= args.depth_to {
        depths.push(depth);
        depth += args.step;
    }
    let n = depths.len();

    let density: Vec<f64> = depths
        .iter()
        .map(|d| {
            let compaction = COMPACTION_DENSITY_GAIN * (1.0 - (-d / COMPACTION_DEPTH_FT).exp());
            SURFACE_DENSITY + compaction + density_noise.sample(&mut rng)
        })
        .collect();

    let ratio: Vec<f64> = (0..n)
        .map(|i| {
            let progress = i as f64 / n as f64;
            let regime = Regime::from_progress(progress);
            regime.base_ratio(progress) + ratio_noise.sample(&mut rng)
        })
        .collect();

    Ok(SyntheticWell {
        depths: DepthSeries::new(depths, DepthUnit::Feet)?,
        density: LogCurve::from_samples(density),
        ratio: LogCurve::from_samples(ratio),
    })
}

// ============================================================================
// Main
// ============================================================================

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if !args.quiet {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "info".into()),
            )
            .with_writer(io::stderr)
            .init();
    }

    let mut config = EngineConfig::load();
    if let Some(trials) = args.trials {
        config.monte_carlo.trials = trials;
    }
    config.monte_carlo.seed = args.seed;

    let well = generate_well(&args)?;
    let overburden = OverburdenModel::from_density_log(&well.depths, &well.density)?;
    let inputs = WellModelInputs::new(
        well.depths.clone(),
        overburden.obg_psi().clone(),
        well.ratio.clone(),
    )?;

    // Priors from config-level central values, tightened by two synthetic
    // calibration points (an LOT-derived Poisson ratio, a kick-derived
    // Eaton exponent from an offset well)
    let eaton_prior = ParameterDistribution::new(config.formation.eaton_exponent, 0.3)?;
    let eaton_posterior = calibrate_sequence(
        &eaton_prior,
        &[ParameterDistribution::new(
            config.formation.eaton_exponent - 0.1,
            0.2,
        )?],
    );
    let poisson_prior = ParameterDistribution::new(config.formation.poisson_ratio, 0.04)?;
    let poisson_posterior = calibrate_sequence(
        &poisson_prior,
        &[ParameterDistribution::new(
            config.formation.poisson_ratio + 0.01,
            0.03,
        )?],
    );
    let parameters = CalibratedParameters::new(
        eaton_posterior,
        poisson_posterior,
        CorrelationMatrix::new(vec![vec![1.0, 0.5], vec![0.5, 1.0]])?,
    )?;

    let engine = MonteCarloEngine::new(config.clone())?;
    let mut metrics = RunMetrics::default();
    let assessment = engine.run(&inputs, &parameters, &mut metrics)?;

    let rows = export::build_rows(&well.depths, &assessment, overburden.obg_psi())?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match args.format.as_str() {
        "csv" => {
            export::write_csv(&rows, &mut out)?;
        }
        "json" => {
            let table = ExportTable {
                metadata: ExportMetadata {
                    well_name: config.well.name.clone(),
                    generated_at: chrono::Utc::now(),
                    trials: config.monte_carlo.trials,
                },
                rows,
            };
            writeln!(out, "{}", export::to_json(&table)?)?;
        }
        _ => {
            print_table(&mut out, &well.depths, &assessment)?;
        }
    }

    if !args.quiet {
        eprintln!(
            "# {} trials over {} depths in {:?} ({} redraws, {} unclassified)",
            metrics.trials_run,
            well.depths.len(),
            metrics.elapsed,
            metrics.domain_redraws,
            metrics.unclassified_depths,
        );
    }

    Ok(())
}

fn print_table(
    out: &mut impl Write,
    depths: &DepthSeries,
    assessment: &ppfg_engine::ProbabilisticAssessment,
) -> anyhow::Result<()> {
    writeln!(
        out,
        "{:>9}  {:>8} {:>8} {:>8}  {:>8} {:>8} {:>8}  {:>8}  {:>6}",
        "Depth", "PP-P10", "PP-P50", "PP-P90", "FG-P10", "FG-P50", "FG-P90", "Window", "Risk"
    )?;

    for (i, point) in assessment.risk.iter().enumerate() {
        let fmt = |v: Option<f64>| v.map_or_else(|| "-".to_string(), |x| format!("{x:8.2}"));
        writeln!(
            out,
            "{:>9.1}  {:>8} {:>8} {:>8}  {:>8} {:>8} {:>8}  {:>8}  {:>6}",
            depths.get(i).unwrap_or_default(),
            fmt(assessment.pp_ppg.p10[i]),
            fmt(assessment.pp_ppg.p50[i]),
            fmt(assessment.pp_ppg.p90[i]),
            fmt(assessment.fg_ppg.p10[i]),
            fmt(assessment.fg_ppg.p50[i]),
            fmt(assessment.fg_ppg.p90[i]),
            fmt(point.window_width),
            point
                .risk_level
                .map_or_else(|| "-".to_string(), |r| r.to_string()),
        )?;
    }
    Ok(())
}
