//! Option Payoff Functions
//!
//! # Mathematical Definitions
//!
//! ## European Options
//! - **Call**: max(S_T - K, 0)
//! - **Put**: max(K - S_T, 0)
//!
//! ## Arithmetic Asian Options
//! - **Call**: max(A - K, 0)
//! - **Put**: max(K - A, 0)
//!
//! where A is the arithmetic mean of the observed prices on one path.
//!
//! # Pairing
//!
//! Both payoffs are evaluated on the same [`PathEnsemble`] and stored
//! together per path in a [`PathPayoff`], so the control-variate regression
//! can never match an Asian payoff with another path's European payoff.

use crate::error::McError;
use crate::models::paths::PathEnsemble;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Call or put
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    /// Intrinsic value of the option against `underlying`
    #[inline]
    pub fn intrinsic(&self, underlying: f64, k: f64) -> f64 {
        match self {
            OptionType::Call => (underlying - k).max(0.0),
            OptionType::Put => (k - underlying).max(0.0),
        }
    }
}

impl FromStr for OptionType {
    type Err = McError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "call" => Ok(OptionType::Call),
            "put" => Ok(OptionType::Put),
            other => Err(McError::InvalidConfiguration {
                field: "option_type".to_string(),
                reason: format!("unknown option type '{}', expected 'call' or 'put'", other),
            }),
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionType::Call => write!(f, "call"),
            OptionType::Put => write!(f, "put"),
        }
    }
}

/// Which columns enter the arithmetic average
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Averaging {
    /// Average over all `m_steps + 1` columns, time 0 included
    #[default]
    IncludeSpot,
    /// Average over the `m_steps` observation dates after time 0
    ExcludeSpot,
}

/// Average price of one trajectory under the given convention
pub fn average_price(path: &[f64], averaging: Averaging) -> f64 {
    let observed = match averaging {
        Averaging::IncludeSpot => path,
        Averaging::ExcludeSpot => &path[1..],
    };
    observed.iter().sum::<f64>() / observed.len() as f64
}

/// Asian and European payoffs of the same simulated path
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PathPayoff {
    pub asian: f64,
    pub european: f64,
}

/// Per-path payoffs in simulation order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PayoffSample {
    payoffs: Vec<PathPayoff>,
}

impl PayoffSample {
    pub fn new(payoffs: Vec<PathPayoff>) -> Self {
        Self { payoffs }
    }

    /// Evaluate both payoffs on every path of `ensemble`.
    pub fn evaluate(
        ensemble: &PathEnsemble,
        k: f64,
        option_type: OptionType,
        averaging: Averaging,
    ) -> Self {
        let payoffs = ensemble
            .paths()
            .map(|path| {
                let owned;
                let prices = match path.as_slice() {
                    Some(slice) => slice,
                    None => {
                        owned = path.to_vec();
                        owned.as_slice()
                    }
                };
                PathPayoff {
                    asian: asian_payoff(prices, k, option_type, averaging),
                    european: european_payoff(prices, k, option_type),
                }
            })
            .collect();
        Self { payoffs }
    }

    pub fn len(&self) -> usize {
        self.payoffs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payoffs.is_empty()
    }

    pub fn as_slice(&self) -> &[PathPayoff] {
        &self.payoffs
    }

    pub fn asian(&self) -> Vec<f64> {
        self.payoffs.iter().map(|p| p.asian).collect()
    }

    pub fn european(&self) -> Vec<f64> {
        self.payoffs.iter().map(|p| p.european).collect()
    }

    /// Average of path `i` and path `i + n` for an antithetic sample of 2n paths
    pub fn antithetic_pair_means(&self) -> PayoffSample {
        let half = self.payoffs.len() / 2;
        let (original, mirrored) = self.payoffs.split_at(half);
        let payoffs = original
            .iter()
            .zip(mirrored)
            .map(|(a, b)| PathPayoff {
                asian: 0.5 * (a.asian + b.asian),
                european: 0.5 * (a.european + b.european),
            })
            .collect();
        Self { payoffs }
    }

    /// The first `n` paths, pairing intact
    pub fn head(&self, n: usize) -> PayoffSample {
        let n = n.min(self.payoffs.len());
        Self {
            payoffs: self.payoffs[..n].to_vec(),
        }
    }
}

/// Asian payoff of one trajectory: intrinsic value of its arithmetic average
pub fn asian_payoff(path: &[f64], k: f64, option_type: OptionType, averaging: Averaging) -> f64 {
    option_type.intrinsic(average_price(path, averaging), k)
}

/// European payoff of one trajectory: intrinsic value of its last price
pub fn european_payoff(path: &[f64], k: f64, option_type: OptionType) -> f64 {
    match path.last() {
        Some(&terminal) => option_type.intrinsic(terminal, k),
        None => 0.0,
    }
}
