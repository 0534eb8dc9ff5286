//! # asian-mc: Monte Carlo Pricing of Arithmetic Asian Options
//!
//! Prices arithmetic-average Asian options under Black-Scholes dynamics
//! with antithetic sampling and a European control variate.
//!
//! ## Key Features
//!
//! - **Exact GBM paths**: log-normal sampling at every observation date
//! - **Variance Reduction**: antithetic variates and a closed-form European control
//! - **Three estimators per run**: basic, antithetic-only and antithetic + control variate
//! - **Reproducible**: every call takes its random source explicitly
//!
//! ## Quick Start
//!
//! ```rust
//! use asian_mc::mc::mc_engine::{price_asian_option_seeded, ObservationFrequency, SimulationConfig};
//! use asian_mc::mc::payoffs::OptionType;
//!
//! let config = SimulationConfig {
//!     s0: 100.0,
//!     k: 100.0,
//!     r: 0.05,
//!     q: 0.02,
//!     sigma: 0.2,
//!     t: 0.5,
//!     n_sim: 5_000,
//!     obs_freq: ObservationFrequency::Weekly,
//!     option_type: OptionType::Put,
//!     ..Default::default()
//! };
//!
//! let result = price_asian_option_seeded(&config, 42).expect("Valid configuration");
//! let cv = result.control_variate.expect("control variate enabled");
//! println!("Asian put: {:.4} (beta {:.3})", cv.estimate.price, cv.beta);
//! ```

pub mod analytics;
pub mod config;
pub mod error;
pub mod math_utils;
pub mod mc;
pub mod models;
pub mod rng;

pub use config::PricingRequest;
pub use error::{McError, McResult};
pub use mc::mc_engine::{price_asian_option, PricingResult, SimulationConfig};
