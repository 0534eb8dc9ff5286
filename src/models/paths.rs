// src/models/paths.rs
//! Simulated price trajectories
//!
//! # Memory Layout
//!
//! One row per path, one column per observation time. Column 0 holds the
//! initial spot, column `m_steps` the terminal price:
//! ```text
//! prices[[path, step]]   with shape (path_count, m_steps + 1)
//! ```

use crate::error::{McError, McResult};
use ndarray::{Array1, Array2, ArrayView1, Axis};

/// Matrix of simulated price trajectories.
///
/// Every entry is finite and strictly positive; the constructor refuses
/// anything else, so downstream payoff code never sees a broken path.
#[derive(Debug, Clone, PartialEq)]
pub struct PathEnsemble {
    prices: Array2<f64>,
}

impl PathEnsemble {
    /// Wrap a price matrix, checking the log-normal invariant.
    pub fn new(prices: Array2<f64>) -> McResult<Self> {
        if prices.ncols() < 2 {
            return Err(McError::InvalidConfiguration {
                field: "prices".to_string(),
                reason: format!(
                    "need at least an initial and a terminal column, got {}",
                    prices.ncols()
                ),
            });
        }
        if let Some(bad) = prices.iter().find(|p| !(p.is_finite() && **p > 0.0)) {
            return Err(McError::NumericalInstability {
                method: "GBM path simulation".to_string(),
                reason: format!(
                    "simulated price {} is not finite and positive; reduce sigma²·T",
                    bad
                ),
            });
        }
        Ok(Self { prices })
    }

    pub fn path_count(&self) -> usize {
        self.prices.nrows()
    }

    /// Number of time steps (observation count excluding time 0)
    pub fn steps(&self) -> usize {
        self.prices.ncols() - 1
    }

    pub fn prices(&self) -> &Array2<f64> {
        &self.prices
    }

    pub fn path(&self, index: usize) -> ArrayView1<'_, f64> {
        self.prices.row(index)
    }

    /// Iterate over trajectories in path order
    pub fn paths(&self) -> impl Iterator<Item = ArrayView1<'_, f64>> + '_ {
        self.prices.axis_iter(Axis(0))
    }

    /// Terminal price S_T of every path
    pub fn terminal_prices(&self) -> Array1<f64> {
        self.prices.column(self.steps()).to_owned()
    }
}
