// src/models/gbm.rs
//! Geometric Brownian motion with a continuous dividend yield
//!
//! Under the risk-neutral measure
//! ```text
//! dS_t = (r - q) S_t dt + σ S_t dW_t
//! ```
//! with exact solution over a step of length dt
//! ```text
//! S_{t+dt} = S_t * exp((r - q - σ²/2)dt + σ√dt * Z),   Z ~ N(0,1)
//! ```
//! Sampling the exact solution leaves no discretisation bias at the
//! observation dates themselves.

use super::paths::PathEnsemble;
use crate::error::{validation::*, McError, McResult};
use ndarray::{Array2, ArrayView2, Axis};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gbm {
    pub s0: f64,
    pub r: f64,
    pub q: f64,
    pub sigma: f64,
}

impl Gbm {
    pub fn new(s0: f64, r: f64, q: f64, sigma: f64) -> Self {
        Gbm { s0, r, q, sigma }
    }

    pub fn validate(&self) -> McResult<()> {
        validate_positive("s0", self.s0)?;
        validate_finite("r", self.r)?;
        validate_finite("q", self.q)?;
        validate_positive("sigma", self.sigma)
    }

    /// Log-drift per unit time, r - q - σ²/2
    pub fn log_drift(&self) -> f64 {
        self.r - self.q - 0.5 * self.sigma * self.sigma
    }

    pub fn exact_step(&self, s_t: f64, dt: f64, normal_draw: f64) -> f64 {
        s_t * (self.log_drift() * dt + self.sigma * dt.sqrt() * normal_draw).exp()
    }

    /// Simulate one trajectory per row of `z` over `[0, t]`.
    ///
    /// `z` has shape `(path_count, m_steps)`; the result has shape
    /// `(path_count, m_steps + 1)` with column 0 fixed at `s0`. Prices are
    /// built from the cumulative log-increment rather than by chaining
    /// [`Gbm::exact_step`], so rounding does not compound along the path.
    pub fn simulate_paths(&self, t: f64, z: ArrayView2<'_, f64>) -> McResult<PathEnsemble> {
        self.validate()?;
        validate_positive("t", t)?;
        let (path_count, m_steps) = z.dim();
        if m_steps == 0 {
            return Err(McError::InvalidConfiguration {
                field: "z".to_string(),
                reason: "normal-variate matrix has no time steps".to_string(),
            });
        }

        let dt = t / m_steps as f64;
        let drift = self.log_drift() * dt;
        let vol = self.sigma * dt.sqrt();

        let mut prices = Array2::<f64>::zeros((path_count, m_steps + 1));
        for (mut row, draws) in prices.axis_iter_mut(Axis(0)).zip(z.axis_iter(Axis(0))) {
            row[0] = self.s0;
            let mut log_s = 0.0;
            for (j, &draw) in draws.iter().enumerate() {
                log_s += drift + vol * draw;
                row[j + 1] = self.s0 * log_s.exp();
            }
        }

        debug!(path_count, m_steps, dt, "simulated GBM paths");
        PathEnsemble::new(prices)
    }
}
