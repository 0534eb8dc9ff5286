//! Discounted Monte Carlo estimates with normal-approximation confidence intervals
//!
//! # Variance Convention
//!
//! All variances use the unbiased (n - 1) sample estimator. The reported
//! `variance` is always *per effective sample*, so the standard error is
//! ```text
//! SE = √(variance / samples)
//! ```
//! For an antithetic sample `[X(Z); X(-Z)]` of 2n values the two halves are
//! not independent. The variance is then taken over the n pair means and
//! scaled by 2, which keeps the 2n denominator while giving the true
//! estimator variance. The plain per-path variance of all 2n values, which
//! ignores the pairing, is kept alongside as `sample_variance`.

use crate::error::{McError, McResult};
use serde::Serialize;
use statrs::statistics::Statistics;

/// Two-sided 95% normal quantile
pub const Z_95: f64 = 1.96;

/// How the values of a sample relate to each other
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pairing {
    /// Every value comes from an independent path
    Independent,
    /// Value `i` and value `i + n` come from mirrored normal draws
    Antithetic,
}

/// Discounted price estimate of one estimator variant
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Estimate {
    pub price: f64,
    /// Per effective sample; drives the standard error
    pub variance: f64,
    /// disc² · s² over every value, pairing ignored
    pub sample_variance: f64,
    pub std_error: f64,
    pub confidence_interval: (f64, f64),
    pub samples: usize,
}

impl Estimate {
    pub fn ci_width(&self) -> f64 {
        self.confidence_interval.1 - self.confidence_interval.0
    }

    pub fn contains(&self, value: f64) -> bool {
        self.confidence_interval.0 <= value && value <= self.confidence_interval.1
    }
}

/// Discount a payoff sample and compute price, variance and 95% interval.
///
/// ```text
/// price    = disc * mean(sample)
/// variance = disc² * s²
/// CI       = price ± 1.96 * √(variance / samples)
/// ```
pub fn aggregate(values: &[f64], discount: f64, pairing: Pairing) -> McResult<Estimate> {
    if !(discount.is_finite() && discount > 0.0) {
        return Err(McError::NumericalInstability {
            method: "estimator".to_string(),
            reason: format!("discount factor {} is not finite and positive", discount),
        });
    }

    let samples = values.len();
    let per_sample_variance = match pairing {
        Pairing::Independent => {
            if samples < 2 {
                return Err(McError::InsufficientSamples { needed: 2, got: samples });
            }
            values.iter().variance()
        }
        Pairing::Antithetic => {
            if samples % 2 != 0 {
                return Err(McError::InvalidConfiguration {
                    field: "sample".to_string(),
                    reason: format!("antithetic sample has odd length {}", samples),
                });
            }
            if samples < 4 {
                return Err(McError::InsufficientSamples { needed: 4, got: samples });
            }
            let (original, mirrored) = values.split_at(samples / 2);
            let pair_means: Vec<f64> = original
                .iter()
                .zip(mirrored)
                .map(|(a, b)| 0.5 * (a + b))
                .collect();
            2.0 * pair_means.iter().variance()
        }
    };

    let price = discount * values.iter().mean();
    let variance = discount * discount * per_sample_variance;
    let sample_variance = match pairing {
        Pairing::Independent => variance,
        Pairing::Antithetic => discount * discount * values.iter().variance(),
    };
    let std_error = (variance / samples as f64).sqrt();

    if !price.is_finite() || !variance.is_finite() || !sample_variance.is_finite() {
        return Err(McError::NumericalInstability {
            method: "estimator".to_string(),
            reason: format!("non-finite estimate: price {}, variance {}", price, variance),
        });
    }

    Ok(Estimate {
        price,
        variance,
        sample_variance,
        std_error,
        confidence_interval: (price - Z_95 * std_error, price + Z_95 * std_error),
        samples,
    })
}
