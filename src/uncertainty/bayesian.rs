//! Bayesian parameter calibration: conjugate normal-normal updating
//!
//! Calibration observations (an Eaton exponent back-calculated from a kick,
//! a Poisson ratio from a leak-off test) shrink the prior on a model
//! parameter. The normal-normal conjugate pair keeps the posterior in closed
//! form — precision addition, no MCMC.

use statrs::distribution::{ContinuousCDF, Normal};
use tracing::debug;

use crate::types::ParameterDistribution;

/// Posterior p10/p90 band of a calibrated parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CredibleInterval {
    pub p10: f64,
    pub p90: f64,
}

/// Conjugate normal-normal posterior update.
///
/// Formula (precision addition):
/// - `prec_post = 1/std_prior² + 1/std_like²`
/// - `var_post  = 1/prec_post`
/// - `mean_post = var_post × (mean_prior/var_prior + mean_like/var_like)`
///
/// Two properties hold for every valid input and are load-bearing for the
/// Monte Carlo layer:
/// - posterior variance ≤ min(prior variance, likelihood variance) — more
///   information never increases uncertainty
/// - posterior mean lies between the prior and likelihood means
///
/// Inputs are `ParameterDistribution`s, whose construction already rejected
/// `std_dev <= 0`, so the precisions are always finite and positive.
pub fn posterior_update(
    prior: &ParameterDistribution,
    likelihood: &ParameterDistribution,
) -> ParameterDistribution {
    let prec_prior = prior.precision();
    let prec_like = likelihood.precision();
    let prec_post = prec_prior + prec_like;

    let var_post = 1.0 / prec_post;
    let mean_post = var_post * (prior.mean() * prec_prior + likelihood.mean() * prec_like);

    debug!(
        prior_mean = prior.mean(),
        obs_mean = likelihood.mean(),
        post_mean = mean_post,
        post_std = var_post.sqrt(),
        "posterior update"
    );

    // var_post is a product of positive terms; the constructor invariant holds
    ParameterDistribution::from_validated(mean_post, var_post.sqrt())
}

/// Fold a sequence of calibration observations into the prior, one
/// conjugate update per observation.
///
/// Order does not change the result (precision addition is commutative);
/// the sequence form exists so callers can log or stop between wells.
pub fn calibrate_sequence(
    prior: &ParameterDistribution,
    observations: &[ParameterDistribution],
) -> ParameterDistribution {
    observations
        .iter()
        .fold(*prior, |current, obs| posterior_update(&current, obs))
}

/// P10/P90 credible interval of a calibrated parameter.
///
/// Uses the normal inverse CDF; for the degenerate numerical case where the
/// distribution cannot be built (spread has collapsed below statrs's
/// tolerance), the band collapses to the mean.
pub fn credible_interval(dist: &ParameterDistribution) -> CredibleInterval {
    match Normal::new(dist.mean(), dist.std_dev()) {
        Ok(normal) => CredibleInterval {
            p10: normal.inverse_cdf(0.10),
            p90: normal.inverse_cdf(0.90),
        },
        Err(_) => CredibleInterval {
            p10: dist.mean(),
            p90: dist.mean(),
        },
    }
}
