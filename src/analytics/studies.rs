// src/analytics/studies.rs
//! Batch studies built on the pricer
//!
//! Each study re-prices a base configuration over a grid of inputs. Every
//! grid point draws from its own stream of an [`RngFactory`], so a single
//! point can be reproduced without replaying the whole batch.

use crate::error::{McError, McResult};
use crate::mc::estimator::Estimate;
use crate::mc::mc_engine::{price_asian_option, SimulationConfig, VarianceReduction};
use crate::mc::payoffs::PayoffSample;
use crate::mc::variance_reduction::antithetic_double;
use crate::rng::{self, RngFactory};
use rand::Rng;
use serde::Serialize;
use statrs::statistics::Statistics;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConvergencePoint {
    pub n_sim: usize,
    pub estimate: Estimate,
}

/// Price `cfg` once per simulation count and keep the most reduced estimate.
pub fn convergence_study(
    cfg: &SimulationConfig,
    n_sims: &[usize],
    seed: u64,
) -> McResult<Vec<ConvergencePoint>> {
    let factory = RngFactory::new(seed);
    n_sims
        .iter()
        .enumerate()
        .map(|(i, &n_sim)| {
            let point_cfg = SimulationConfig {
                n_sim,
                ..cfg.clone()
            };
            let result = price_asian_option(&point_cfg, &mut factory.create_std_rng(i as u64))?;
            debug!(n_sim, price = result.best().price, "convergence point");
            Ok(ConvergencePoint {
                n_sim,
                estimate: *result.best(),
            })
        })
        .collect()
}

/// Asian Monte Carlo price next to the closed-form European price
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridPoint {
    pub k: f64,
    pub t: f64,
    pub asian_price: f64,
    pub european_price: f64,
}

impl GridPoint {
    /// European minus Asian price
    pub fn difference(&self) -> f64 {
        self.european_price - self.asian_price
    }
}

/// Price the Asian option over every (strike, maturity) pair, row-major in
/// strikes.
pub fn asian_european_grid(
    cfg: &SimulationConfig,
    strikes: &[f64],
    maturities: &[f64],
    seed: u64,
) -> McResult<Vec<GridPoint>> {
    let factory = RngFactory::new(seed);
    let mut grid = Vec::with_capacity(strikes.len() * maturities.len());

    for (i, &k) in strikes.iter().enumerate() {
        for (j, &t) in maturities.iter().enumerate() {
            let point_cfg = SimulationConfig {
                k,
                t,
                ..cfg.clone()
            };
            let stream = (i * maturities.len() + j) as u64;
            let result = price_asian_option(&point_cfg, &mut factory.create_std_rng(stream))?;
            grid.push(GridPoint {
                k,
                t,
                asian_price: result.best().price,
                european_price: point_cfg.european_benchmark(),
            });
        }
    }

    Ok(grid)
}

/// Pearson correlation between per-path Asian and European payoffs on an
/// antithetic ensemble of `2·n_sim` paths.
///
/// The closer to 1, the more variance the control variate removes.
pub fn payoff_correlation<R: Rng + ?Sized>(cfg: &SimulationConfig, rng: &mut R) -> McResult<f64> {
    cfg.validate()?;
    let z = rng::normal_matrix(rng, cfg.n_sim, cfg.m_steps());
    let z = if cfg.variance_reduction.contains(VarianceReduction::ANTITHETIC) {
        antithetic_double(z.view())
    } else {
        z
    };
    let ensemble = cfg.model().simulate_paths(cfg.t, z.view())?;
    let sample = PayoffSample::evaluate(&ensemble, cfg.k, cfg.option_type, cfg.averaging);

    let x = sample.asian();
    let y = sample.european();
    let denominator = x.iter().std_dev() * y.iter().std_dev();
    if !(denominator > 0.0) {
        return Err(McError::DegenerateControlVariate {
            variance: y.iter().variance(),
        });
    }

    let correlation = x.iter().covariance(y.iter()) / denominator;
    if !correlation.is_finite() {
        return Err(McError::NumericalInstability {
            method: "payoff correlation".to_string(),
            reason: format!("correlation {} is not finite", correlation),
        });
    }
    Ok(correlation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mc::mc_engine::ObservationFrequency;

    fn base() -> SimulationConfig {
        SimulationConfig {
            n_sim: 2_000,
            obs_freq: ObservationFrequency::Monthly,
            ..Default::default()
        }
    }

    #[test]
    fn test_convergence_study_shapes() {
        let points = convergence_study(&base(), &[500, 2_000, 8_000], 42).unwrap();
        assert_eq!(points.len(), 3);
        assert_eq!(points[2].n_sim, 8_000);
        assert!(points[2].estimate.ci_width() < points[0].estimate.ci_width());
    }

    #[test]
    fn test_grid_orders_strikes_then_maturities() {
        let grid = asian_european_grid(&base(), &[90.0, 110.0], &[0.5, 1.0], 1).unwrap();
        assert_eq!(grid.len(), 4);
        assert_eq!((grid[0].k, grid[0].t), (90.0, 0.5));
        assert_eq!((grid[1].k, grid[1].t), (90.0, 1.0));
        assert_eq!((grid[3].k, grid[3].t), (110.0, 1.0));
        for point in &grid {
            // Averaging dampens volatility, so the Asian call is cheaper
            assert!(point.difference() > 0.0, "{:?}", point);
        }
    }

    #[test]
    fn test_payoff_correlation_is_strong() {
        let corr = payoff_correlation(&base(), &mut rng::seed_rng_from_u64(8)).unwrap();
        assert!(corr > 0.7 && corr <= 1.0, "correlation {}", corr);
    }

    #[test]
    fn test_empty_study_inputs() {
        assert!(convergence_study(&base(), &[], 1).unwrap().is_empty());
        assert!(asian_european_grid(&base(), &[], &[1.0], 1).unwrap().is_empty());
    }
}
