//! Variance Reduction Techniques
//!
//! 1. **Antithetic Variates**: the normal matrix Z is stacked on top of its
//!    mirror image, `[Z; -Z]`, and 2n paths are simulated. Row `i` and row
//!    `i + n` form an antithetic pair. The Asian payoff is monotone in every
//!    draw, so the pair is negatively correlated and first-order sampling
//!    noise cancels.
//!
//! 2. **Control Variates**: the European payoff Y of the same path has a
//!    known expectation Y*. The Asian sample X is corrected to
//!    ```text
//!    X_cv = X - β (Y - Y*),    β = Cov(X, Y) / Var(Y)
//!    ```
//!    Y* must be in the same undiscounted units as the sampled payoffs;
//!    the shared discount factor is applied later by the estimator.
//!    On an antithetic sample β is regressed on the pair means, the units in
//!    which the estimator measures variance.

use crate::error::{McError, McResult};
use crate::mc::estimator::Pairing;
use crate::mc::payoffs::PayoffSample;
use ndarray::{Array2, ArrayView2};
use serde::Serialize;
use statrs::statistics::Statistics;
use tracing::{debug, warn};

/// Variance of the control, relative to its mean square, at or below which
/// the control counts as constant
pub const CONTROL_VARIANCE_RTOL: f64 = f64::EPSILON;

/// True when `values` carry no variance beyond rounding at their own scale.
///
/// Both sides scale with the square of the price level, so the verdict does
/// not depend on the units of S0 and K.
fn is_numerically_constant(values: &[f64], variance: f64) -> bool {
    let mean_square = values.iter().map(|v| v * v).mean();
    variance <= CONTROL_VARIANCE_RTOL * mean_square
}

/// Stack `z` over `-z`, doubling the number of rows.
pub fn antithetic_double(z: ArrayView2<'_, f64>) -> Array2<f64> {
    let (n, m) = z.dim();
    Array2::from_shape_fn((2 * n, m), |(i, j)| {
        if i < n {
            z[[i, j]]
        } else {
            -z[[i - n, j]]
        }
    })
}

/// Fitted control-variate regression
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ControlVariateFit {
    /// Cov(X, Y) / Var(Y) over the sample
    pub beta: f64,
    /// Undiscounted exact expectation of the control payoff
    pub target: f64,
}

impl ControlVariateFit {
    /// Regress Asian payoffs on the European payoffs of the same paths.
    ///
    /// Fails with [`McError::DegenerateControlVariate`] when the European
    /// payoffs show no spread (σ→0, T→0, or every path out of the money).
    pub fn fit(sample: &PayoffSample, target: f64, pairing: Pairing) -> McResult<Self> {
        if !target.is_finite() {
            return Err(McError::NumericalInstability {
                method: "control variate".to_string(),
                reason: format!("control target {} is not finite", target),
            });
        }

        let regression_sample = match pairing {
            Pairing::Independent => None,
            Pairing::Antithetic => Some(sample.antithetic_pair_means()),
        };
        let regression_sample = regression_sample.as_ref().unwrap_or(sample);
        if regression_sample.len() < 2 {
            return Err(McError::InsufficientSamples {
                needed: 2,
                got: regression_sample.len(),
            });
        }

        let path_y = sample.european();
        let path_var_y = path_y.iter().variance();
        if !path_var_y.is_finite() {
            return Err(McError::NumericalInstability {
                method: "control variate".to_string(),
                reason: format!("control payoff variance {} is not finite", path_var_y),
            });
        }
        if is_numerically_constant(&path_y, path_var_y) {
            warn!(var_y = path_var_y, "control payoff has no variance, beta is undefined");
            return Err(McError::DegenerateControlVariate {
                variance: path_var_y,
            });
        }

        let x = regression_sample.asian();
        let y = regression_sample.european();
        let var_y = y.iter().variance();

        // The pairing already cancels all the control's variation
        if is_numerically_constant(&y, var_y) {
            debug!(var_y, "antithetic pairs leave no control variance, beta = 0");
            return Ok(Self { beta: 0.0, target });
        }

        let beta = x.iter().covariance(y.iter()) / var_y;
        if !beta.is_finite() {
            return Err(McError::NumericalInstability {
                method: "control variate".to_string(),
                reason: format!("regression coefficient {} is not finite", beta),
            });
        }

        debug!(beta, var_y, target, "fitted control variate");
        Ok(Self { beta, target })
    }

    /// Corrected Asian payoffs, in path order
    pub fn apply(&self, sample: &PayoffSample) -> Vec<f64> {
        sample
            .as_slice()
            .iter()
            .map(|p| p.asian - self.beta * (p.european - self.target))
            .collect()
    }
}
