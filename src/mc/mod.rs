pub mod estimator;
pub mod mc_engine;
pub mod payoffs;
pub mod variance_reduction;
