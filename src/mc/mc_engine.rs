// src/mc/mc_engine.rs
use crate::analytics::bs_analytic;
use crate::error::{validation::*, McError, McResult};
use crate::mc::estimator::{aggregate, Estimate, Pairing};
use crate::mc::payoffs::{Averaging, OptionType, PayoffSample};
use crate::mc::variance_reduction::{antithetic_double, ControlVariateFit};
use crate::models::gbm::Gbm;
use crate::rng::{self, RngFactory};
use bitflags::bitflags;
use rand::Rng;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct VarianceReduction: u8 {
        const ANTITHETIC      = 1 << 0;
        const CONTROL_VARIATE = 1 << 1;
    }
}

impl VarianceReduction {
    /// Map an on/off switch to "every technique" or "none"
    pub fn from_enabled(enabled: bool) -> Self {
        if enabled {
            Self::all()
        } else {
            Self::empty()
        }
    }
}

/// Averaging schedule of the Asian option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObservationFrequency {
    /// 252 observations per maturity
    Daily,
    /// 52 observations per maturity
    Weekly,
    /// 12 observations per maturity
    Monthly,
    /// An explicit observation count
    Steps(usize),
}

impl ObservationFrequency {
    pub fn m_steps(&self) -> usize {
        match self {
            ObservationFrequency::Daily => 252,
            ObservationFrequency::Weekly => 52,
            ObservationFrequency::Monthly => 12,
            ObservationFrequency::Steps(n) => *n,
        }
    }
}

impl FromStr for ObservationFrequency {
    type Err = McError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(ObservationFrequency::Daily),
            "weekly" => Ok(ObservationFrequency::Weekly),
            "monthly" => Ok(ObservationFrequency::Monthly),
            other => Err(McError::InvalidConfiguration {
                field: "obs_freq".to_string(),
                reason: format!(
                    "unknown observation frequency '{}', expected 'daily', 'weekly' or 'monthly'",
                    other
                ),
            }),
        }
    }
}

impl fmt::Display for ObservationFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObservationFrequency::Daily => write!(f, "daily"),
            ObservationFrequency::Weekly => write!(f, "weekly"),
            ObservationFrequency::Monthly => write!(f, "monthly"),
            ObservationFrequency::Steps(n) => write!(f, "{} steps", n),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub s0: f64,
    pub k: f64,
    pub r: f64,
    pub q: f64,
    pub sigma: f64,
    pub t: f64,
    pub n_sim: usize,
    pub obs_freq: ObservationFrequency,
    pub option_type: OptionType,
    pub variance_reduction: VarianceReduction,
    pub averaging: Averaging,
}

impl SimulationConfig {
    /// Validate the Monte Carlo configuration
    pub fn validate(&self) -> McResult<()> {
        validate_positive("s0", self.s0)?;
        validate_positive("k", self.k)?;
        validate_finite("r", self.r)?;
        validate_finite("q", self.q)?;
        validate_positive("sigma", self.sigma)?;
        validate_positive("t", self.t)?;
        validate_paths(self.n_sim)?;
        validate_steps(self.m_steps())?;
        Ok(())
    }

    pub fn m_steps(&self) -> usize {
        self.obs_freq.m_steps()
    }

    pub fn discount_factor(&self) -> f64 {
        (-self.r * self.t).exp()
    }

    pub fn model(&self) -> Gbm {
        Gbm::new(self.s0, self.r, self.q, self.sigma)
    }

    /// Closed-form European price for the same contract terms
    pub fn european_benchmark(&self) -> f64 {
        bs_analytic::bs_price(self.option_type, self.s0, self.k, self.r, self.q, self.sigma, self.t)
    }

    pub fn with_variance_reduction(&self, variance_reduction: VarianceReduction) -> Self {
        Self {
            variance_reduction,
            ..self.clone()
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            s0: 100.0,
            k: 100.0,
            r: 0.05,
            q: 0.0,
            sigma: 0.2,
            t: 1.0,
            n_sim: 50_000,
            obs_freq: ObservationFrequency::Daily,
            option_type: OptionType::Call,
            variance_reduction: VarianceReduction::all(),
            averaging: Averaging::IncludeSpot,
        }
    }
}

/// Control-variate estimate together with its regression inputs
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ControlVariateEstimate {
    pub estimate: Estimate,
    pub beta: f64,
    /// Discounted closed-form European price
    pub european_benchmark: f64,
    /// Undiscounted control expectation Y* = benchmark · e^{rT}
    pub control_target: f64,
}

/// Estimates produced by one pricing call
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PricingResult {
    /// Plain Monte Carlo over the first `n_sim` paths
    pub basic: Estimate,
    /// All `2·n_sim` antithetic paths, when enabled
    pub antithetic: Option<Estimate>,
    /// Control-variate correction, on the antithetic sample when enabled
    pub control_variate: Option<ControlVariateEstimate>,
}

impl PricingResult {
    /// The most variance-reduced estimate available
    pub fn best(&self) -> &Estimate {
        match (&self.control_variate, &self.antithetic) {
            (Some(cv), _) => &cv.estimate,
            (None, Some(anti)) => anti,
            (None, None) => &self.basic,
        }
    }
}

struct SimulatedSample {
    payoffs: PayoffSample,
    pairing: Pairing,
}

/// Draw normals, optionally mirror them, simulate and evaluate both payoffs.
fn simulate_sample<R: Rng + ?Sized>(
    cfg: &SimulationConfig,
    antithetic: bool,
    rng: &mut R,
) -> McResult<SimulatedSample> {
    let z = rng::normal_matrix(rng, cfg.n_sim, cfg.m_steps());
    let (z, pairing) = if antithetic {
        (antithetic_double(z.view()), Pairing::Antithetic)
    } else {
        (z, Pairing::Independent)
    };

    let ensemble = cfg.model().simulate_paths(cfg.t, z.view())?;
    let payoffs = PayoffSample::evaluate(&ensemble, cfg.k, cfg.option_type, cfg.averaging);
    Ok(SimulatedSample { payoffs, pairing })
}

fn control_variate_estimate(
    cfg: &SimulationConfig,
    payoffs: &PayoffSample,
    pairing: Pairing,
) -> McResult<ControlVariateEstimate> {
    let discount = cfg.discount_factor();
    let european_benchmark = cfg.european_benchmark();
    // The sampled payoffs are undiscounted, so the target must be too
    let control_target = european_benchmark / discount;

    let fit = ControlVariateFit::fit(payoffs, control_target, pairing)?;
    let estimate = aggregate(&fit.apply(payoffs), discount, pairing)?;

    Ok(ControlVariateEstimate {
        estimate,
        beta: fit.beta,
        european_benchmark,
        control_target,
    })
}

/// Monte Carlo pricing of an arithmetic-average Asian option under GBM
///
/// # Pipeline
///
/// ```text
/// Z (n_sim × m_steps) → [Z; -Z] → paths (2·n_sim × m_steps+1)
///   → (Asian, European) per path → X_cv = X - β(Y - Y*) → discounted estimates
/// ```
///
/// One simulation serves every variant: the first `n_sim` rows of `[Z; -Z]`
/// are an ordinary independent sample, so the basic estimate reads those
/// rows only. With antithetic sampling disabled just `Z` is simulated and
/// the control variate, if enabled, is applied to the basic sample.
///
/// # Errors
///
/// - Configuration errors before any random draw
/// - [`McError::DegenerateControlVariate`] when the European payoff has no
///   variance; price without `CONTROL_VARIATE` to fall back
/// - [`McError::NumericalInstability`] for non-finite paths or estimates
pub fn price_asian_option<R: Rng + ?Sized>(
    cfg: &SimulationConfig,
    rng: &mut R,
) -> McResult<PricingResult> {
    cfg.validate()?;
    let flags = cfg.variance_reduction;
    let use_antithetic = flags.contains(VarianceReduction::ANTITHETIC);
    let discount = cfg.discount_factor();

    let SimulatedSample { payoffs, pairing } = simulate_sample(cfg, use_antithetic, rng)?;

    let basic_payoffs = payoffs.head(cfg.n_sim);
    let basic = aggregate(&basic_payoffs.asian(), discount, Pairing::Independent)?;

    let antithetic = if use_antithetic {
        Some(aggregate(&payoffs.asian(), discount, pairing)?)
    } else {
        None
    };

    let control_variate = if flags.contains(VarianceReduction::CONTROL_VARIATE) {
        Some(control_variate_estimate(cfg, &payoffs, pairing)?)
    } else {
        None
    };

    debug!(
        n_sim = cfg.n_sim,
        m_steps = cfg.m_steps(),
        basic = basic.price,
        antithetic = antithetic.map(|e| e.price),
        control_variate = control_variate.map(|e| e.estimate.price),
        "priced Asian option"
    );

    Ok(PricingResult {
        basic,
        antithetic,
        control_variate,
    })
}

/// [`price_asian_option`] on a fresh generator seeded with `seed`
pub fn price_asian_option_seeded(cfg: &SimulationConfig, seed: u64) -> McResult<PricingResult> {
    price_asian_option(cfg, &mut rng::seed_rng_from_u64(seed))
}

/// Price a single estimator variant in isolation.
///
/// `flags` picks the variant: empty for basic, `ANTITHETIC` for
/// antithetic-only, both for the full estimator. `CONTROL_VARIATE` alone
/// corrects an independent sample.
pub fn price_variant<R: Rng + ?Sized>(
    cfg: &SimulationConfig,
    flags: VarianceReduction,
    rng: &mut R,
) -> McResult<Estimate> {
    cfg.validate()?;
    let SimulatedSample { payoffs, pairing } =
        simulate_sample(cfg, flags.contains(VarianceReduction::ANTITHETIC), rng)?;

    if flags.contains(VarianceReduction::CONTROL_VARIATE) {
        Ok(control_variate_estimate(cfg, &payoffs, pairing)?.estimate)
    } else {
        aggregate(&payoffs.asian(), cfg.discount_factor(), pairing)
    }
}

/// Side-by-side estimates of the three variants
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MethodComparison {
    pub basic: Estimate,
    pub antithetic: Estimate,
    pub antithetic_control_variate: Estimate,
}

impl MethodComparison {
    /// Percentage variance reduction of antithetic-only over basic
    pub fn antithetic_reduction_pct(&self) -> f64 {
        reduction_pct(self.antithetic.variance, self.basic.variance)
    }

    /// Percentage variance reduction of the full estimator over antithetic-only
    pub fn control_variate_reduction_pct(&self) -> f64 {
        reduction_pct(self.antithetic_control_variate.variance, self.antithetic.variance)
    }
}

fn reduction_pct(reduced: f64, reference: f64) -> f64 {
    if reference > 0.0 {
        100.0 * (1.0 - reduced / reference)
    } else {
        0.0
    }
}

/// Price basic, antithetic-only and antithetic + control variate as three
/// independent simulations on streams 0, 1 and 2 of `seed`.
pub fn compare_methods(cfg: &SimulationConfig, seed: u64) -> McResult<MethodComparison> {
    let factory = RngFactory::new(seed);
    let basic = price_variant(cfg, VarianceReduction::empty(), &mut factory.create_std_rng(0))?;
    let antithetic = price_variant(
        cfg,
        VarianceReduction::ANTITHETIC,
        &mut factory.create_std_rng(1),
    )?;
    let antithetic_control_variate =
        price_variant(cfg, VarianceReduction::all(), &mut factory.create_std_rng(2))?;

    Ok(MethodComparison {
        basic,
        antithetic,
        antithetic_control_variate,
    })
}
