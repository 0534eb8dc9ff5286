// src/analytics/bs_analytic.rs
//! Analytical Black-Scholes prices for European options
//!
//! # Mathematical Foundation
//!
//! Under the Black-Scholes model with continuous dividend yield q:
//! ```text
//! dS_t = (r - q) S_t dt + σ S_t dW_t
//! ```
//!
//! These prices are the exact expectation of the discounted European payoff
//! and serve as the control-variate target for the Asian Monte Carlo.

use crate::mc::payoffs::OptionType;
use crate::math_utils::norm_cdf;

fn d1_d2(s: f64, k: f64, r: f64, q: f64, sigma: f64, t: f64) -> (f64, f64) {
    let vol_sqrt_t = sigma * t.sqrt();
    let d1 = ((s / k).ln() + (r - q + 0.5 * sigma * sigma) * t) / vol_sqrt_t;
    (d1, d1 - vol_sqrt_t)
}

/// Black-Scholes European call option price
///
/// # Formula
/// ```text
/// C = S*e^(-qT)*Φ(d₁) - K*e^(-rT)*Φ(d₂)
/// d₁ = [ln(S/K) + (r - q + σ²/2)T] / (σ√T)
/// d₂ = d₁ - σ√T
/// ```
pub fn bs_call_price(s: f64, k: f64, r: f64, q: f64, sigma: f64, t: f64) -> f64 {
    let (d1, d2) = d1_d2(s, k, r, q, sigma, t);
    s * (-q * t).exp() * norm_cdf(d1) - k * (-r * t).exp() * norm_cdf(d2)
}

/// Black-Scholes European put option price
///
/// # Formula
/// ```text
/// P = K*e^(-rT)*Φ(-d₂) - S*e^(-qT)*Φ(-d₁)
/// ```
pub fn bs_put_price(s: f64, k: f64, r: f64, q: f64, sigma: f64, t: f64) -> f64 {
    let (d1, d2) = d1_d2(s, k, r, q, sigma, t);
    k * (-r * t).exp() * norm_cdf(-d2) - s * (-q * t).exp() * norm_cdf(-d1)
}

pub fn bs_price(option_type: OptionType, s: f64, k: f64, r: f64, q: f64, sigma: f64, t: f64) -> f64 {
    match option_type {
        OptionType::Call => bs_call_price(s, k, r, q, sigma, t),
        OptionType::Put => bs_put_price(s, k, r, q, sigma, t),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_call() {
        let price = bs_call_price(100.0, 100.0, 0.05, 0.0, 0.2, 1.0);
        assert!((price - 10.450_583_572_185_565).abs() < 1e-6, "got {}", price);
    }

    #[test]
    fn test_reference_put() {
        let price = bs_put_price(100.0, 100.0, 0.05, 0.0, 0.2, 1.0);
        assert!((price - 5.573_526_022_256_971).abs() < 1e-6, "got {}", price);
    }

    #[test]
    fn test_put_call_parity_with_dividends() {
        let (s, k, r, q, sigma, t) = (100.0, 95.0, 0.04, 0.02, 0.3, 0.75);
        let call = bs_price(OptionType::Call, s, k, r, q, sigma, t);
        let put = bs_price(OptionType::Put, s, k, r, q, sigma, t);
        let parity = s * (-q * t).exp() - k * (-r * t).exp();
        assert!((call - put - parity).abs() < 1e-10);
    }

    #[test]
    fn test_small_volatility_tends_to_discounted_forward_intrinsic() {
        let (s, k, r, q, t) = (100.0, 90.0, 0.05, 0.01, 1.0);
        let call = bs_call_price(s, k, r, q, 1e-6, t);
        let expected = s * (-q * t).exp() - k * (-r * t).exp();
        assert!((call - expected).abs() < 1e-6);
    }
}
