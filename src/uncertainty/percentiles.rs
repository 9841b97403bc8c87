//! Percentile aggregation: N Monte Carlo trials → P10/P50/P90 per depth
//!
//! Nearest-rank percentiles over the sorted trial values at each depth. No
//! interpolation: the envelope reports values that actually occurred in some
//! trial, which keeps the P50 of a 5-trial run honest about its granularity.

use thiserror::Error;

use crate::types::{PressureUnit, ProbabilisticProfile};

// ============================================================================
// Error Types
// ============================================================================

/// Structural failure of one aggregation call. Fatal for that call: a
/// partial or ragged trial set cannot produce a meaningful envelope.
#[derive(Debug, Error)]
pub enum AggregationError {
    #[error("no trials to aggregate")]
    EmptyTrialSet,

    #[error("trial {index} has {actual} depths, expected {expected}")]
    TrialLengthMismatch {
        index: usize,
        expected: usize,
        actual: usize,
    },
}

// ============================================================================
// Nearest-Rank Percentiles
// ============================================================================

/// Index of the nearest-rank percentile `p` in a sorted slice of length `n`.
///
/// Formula: `index = ceil(p/100 × n) - 1`, clamped to `[0, n-1]`.
pub fn nearest_rank_index(percentile: f64, n: usize) -> usize {
    let rank = (percentile / 100.0 * n as f64).ceil() as isize - 1;
    rank.clamp(0, n as isize - 1) as usize
}

/// Reduce N trial curves into a P10/P50/P90 profile.
///
/// Null policy: a depth where *any* trial is `None` yields `None` for all
/// three percentiles — one missing trial invalidates the distributional
/// estimate at that depth; interpolating around it would understate the
/// spread.
///
/// # Errors
/// `EmptyTrialSet` for zero trials; `TrialLengthMismatch` if any trial is
/// not aligned with the first.
pub fn aggregate_trials(
    trials: &[Vec<Option<f64>>],
    unit: PressureUnit,
) -> Result<ProbabilisticProfile, AggregationError> {
    let Some(first) = trials.first() else {
        return Err(AggregationError::EmptyTrialSet);
    };
    let depth_count = first.len();
    for (index, trial) in trials.iter().enumerate() {
        if trial.len() != depth_count {
            return Err(AggregationError::TrialLengthMismatch {
                index,
                expected: depth_count,
                actual: trial.len(),
            });
        }
    }

    let n = trials.len();
    let i10 = nearest_rank_index(10.0, n);
    let i50 = nearest_rank_index(50.0, n);
    let i90 = nearest_rank_index(90.0, n);

    let mut p10 = Vec::with_capacity(depth_count);
    let mut p50 = Vec::with_capacity(depth_count);
    let mut p90 = Vec::with_capacity(depth_count);
    let mut column = Vec::with_capacity(n);

    for depth_index in 0..depth_count {
        column.clear();
        let mut gap = false;
        for trial in trials {
            match trial[depth_index] {
                Some(value) => column.push(value),
                None => {
                    gap = true;
                    break;
                }
            }
        }

        if gap {
            p10.push(None);
            p50.push(None);
            p90.push(None);
        } else {
            column.sort_by(f64::total_cmp);
            p10.push(Some(column[i10]));
            p50.push(Some(column[i50]));
            p90.push(Some(column[i90]));
        }
    }

    Ok(ProbabilisticProfile { unit, p10, p50, p90 })
}
