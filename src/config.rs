// src/config.rs
//! String-labelled pricing requests
//!
//! [`PricingRequest`] mirrors the loosely typed input handed over by
//! market-data and reporting layers:
//! ```json
//! {"s0": 100.0, "k": 100.0, "r": 0.05, "q": 0.02, "sigma": 0.2, "t": 0.5,
//!  "n_sim": 20000, "obs_freq": "weekly", "option_type": "put",
//!  "variance_reduction": true}
//! ```
//! Converting it into a [`SimulationConfig`] parses every label and
//! validates every number, so a bad request fails before any simulation.

use crate::error::{McError, McResult};
use crate::mc::mc_engine::{
    price_asian_option_seeded, PricingResult, SimulationConfig, VarianceReduction,
};
use crate::mc::payoffs::Averaging;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SEED: u64 = 42;

fn default_n_sim() -> usize {
    50_000
}

fn default_obs_freq() -> String {
    "daily".to_string()
}

fn default_option_type() -> String {
    "call".to_string()
}

fn default_true() -> bool {
    true
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingRequest {
    pub s0: f64,
    pub k: f64,
    pub r: f64,
    #[serde(default)]
    pub q: f64,
    pub sigma: f64,
    pub t: f64,
    #[serde(default = "default_n_sim")]
    pub n_sim: usize,
    #[serde(default = "default_obs_freq")]
    pub obs_freq: String,
    #[serde(default = "default_option_type")]
    pub option_type: String,
    #[serde(default = "default_true")]
    pub variance_reduction: bool,
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl PricingRequest {
    pub fn from_json(json: &str) -> McResult<Self> {
        serde_json::from_str(json).map_err(|e| McError::InvalidConfiguration {
            field: "request".to_string(),
            reason: e.to_string(),
        })
    }

    /// Validate the request and price it on a generator seeded with `seed`.
    pub fn price(&self) -> McResult<PricingResult> {
        let cfg = SimulationConfig::try_from(self)?;
        price_asian_option_seeded(&cfg, self.seed)
    }
}

impl TryFrom<&PricingRequest> for SimulationConfig {
    type Error = McError;

    fn try_from(request: &PricingRequest) -> Result<Self, Self::Error> {
        let cfg = SimulationConfig {
            s0: request.s0,
            k: request.k,
            r: request.r,
            q: request.q,
            sigma: request.sigma,
            t: request.t,
            n_sim: request.n_sim,
            obs_freq: request.obs_freq.parse()?,
            option_type: request.option_type.parse()?,
            variance_reduction: VarianceReduction::from_enabled(request.variance_reduction),
            averaging: Averaging::IncludeSpot,
        };
        cfg.validate()?;
        Ok(cfg)
    }
}
