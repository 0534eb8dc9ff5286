// tests/convergence_test.rs
use approx::assert_relative_eq;
use asian_mc::mc::mc_engine::{
    price_asian_option_seeded, ObservationFrequency, SimulationConfig, VarianceReduction,
};
use asian_mc::mc::payoffs::{Averaging, OptionType, PayoffSample};
use asian_mc::rng;

fn monthly_call(n_sim: usize) -> SimulationConfig {
    SimulationConfig {
        s0: 100.0,
        k: 100.0,
        r: 0.05,
        q: 0.0,
        sigma: 0.25,
        t: 1.0,
        n_sim,
        obs_freq: ObservationFrequency::Monthly,
        option_type: OptionType::Call,
        ..Default::default()
    }
}

#[test]
fn test_ci_shrinks_with_square_root_of_paths() {
    let small = price_asian_option_seeded(&monthly_call(5_000), 1).unwrap();
    let large = price_asian_option_seeded(&monthly_call(20_000), 2).unwrap();

    let ratio = small.basic.ci_width() / large.basic.ci_width();
    println!("\nCI width ratio (4x paths): {}", ratio);
    assert!((1.8..2.2).contains(&ratio), "CI width ratio {} should be close to 2", ratio);

    // More paths do not move the expected price
    let combined = (small.basic.std_error.powi(2) + large.basic.std_error.powi(2)).sqrt();
    assert!(
        (small.basic.price - large.basic.price).abs() < 4.0 * combined,
        "prices {} and {} differ by more than sampling noise",
        small.basic.price,
        large.basic.price
    );
}

#[test]
fn test_variance_ordering_across_estimators() {
    for option_type in [OptionType::Call, OptionType::Put] {
        let cfg = SimulationConfig {
            option_type,
            ..monthly_call(10_000)
        };
        let result = price_asian_option_seeded(&cfg, 99).unwrap();
        let anti = result.antithetic.unwrap();
        let cv = result.control_variate.unwrap();

        println!(
            "\n{}: basic {:.4} anti {:.4} cv {:.4}",
            option_type, result.basic.variance, anti.variance, cv.estimate.variance
        );
        assert!(anti.variance <= result.basic.variance);
        assert!(cv.estimate.variance <= anti.variance);
    }
}

#[test]
fn test_low_volatility_converges_to_intrinsic_value() {
    for (option_type, k) in [(OptionType::Call, 90.0), (OptionType::Put, 110.0)] {
        let cfg = SimulationConfig {
            r: 0.0,
            q: 0.0,
            sigma: 1e-4,
            k,
            option_type,
            ..monthly_call(2_000)
        };
        let result = price_asian_option_seeded(&cfg, 5).unwrap();
        let cv = result.control_variate.unwrap();

        assert_relative_eq!(result.basic.price, 10.0, epsilon = 1e-2);
        assert_relative_eq!(cv.estimate.price, 10.0, epsilon = 1e-2);
    }
}

#[test]
fn test_single_observation_asian_equals_european() {
    let cfg = SimulationConfig {
        obs_freq: ObservationFrequency::Steps(1),
        averaging: Averaging::ExcludeSpot,
        ..monthly_call(5_000)
    };

    // Path by path the two payoffs coincide
    let z = rng::normal_matrix(&mut rng::seed_rng_from_u64(3), cfg.n_sim, cfg.m_steps());
    let ensemble = cfg.model().simulate_paths(cfg.t, z.view()).unwrap();
    let sample = PayoffSample::evaluate(&ensemble, cfg.k, cfg.option_type, cfg.averaging);
    assert_eq!(sample.asian(), sample.european());

    // So the control variate removes all noise and returns the benchmark
    let result = price_asian_option_seeded(&cfg, 3).unwrap();
    let cv = result.control_variate.unwrap();
    assert_relative_eq!(cv.beta, 1.0, epsilon = 1e-9);
    assert_relative_eq!(cv.estimate.price, cv.european_benchmark, epsilon = 1e-8);
    assert!(cv.estimate.variance < 1e-12);

    // And the plain Asian estimate is a Monte Carlo estimate of the European price
    let basic = result.basic;
    assert!(
        (basic.price - cv.european_benchmark).abs() < 4.0 * basic.std_error,
        "basic {} vs benchmark {}",
        basic.price,
        cv.european_benchmark
    );
}

#[test]
fn test_control_variate_alone_reduces_variance() {
    let cfg = monthly_call(10_000).with_variance_reduction(VarianceReduction::CONTROL_VARIATE);
    let result = price_asian_option_seeded(&cfg, 12).unwrap();
    let cv = result.control_variate.unwrap();

    assert_eq!(cv.estimate.samples, result.basic.samples);
    assert!(cv.estimate.variance < 0.2 * result.basic.variance);
}

#[test]
fn test_averaging_lowers_call_price_below_european() {
    let cfg = monthly_call(20_000);
    let result = price_asian_option_seeded(&cfg, 8).unwrap();
    let cv = result.control_variate.unwrap();
    assert!(cv.estimate.price < cv.european_benchmark);
}

#[test]
fn test_price_scales_with_spot_and_strike() {
    let reference = price_asian_option_seeded(&monthly_call(5_000), 7).unwrap();
    let reference_cv = reference.control_variate.unwrap();
    assert!(reference_cv.beta > 0.0);

    for scale in [1e-4, 1e-6, 1e-7, 1e3] {
        let cfg = SimulationConfig {
            s0: 100.0 * scale,
            k: 100.0 * scale,
            ..monthly_call(5_000)
        };
        let result = price_asian_option_seeded(&cfg, 7)
            .unwrap_or_else(|e| panic!("scale {} failed: {}", scale, e));
        let cv = result.control_variate.unwrap();

        assert_relative_eq!(cv.beta, reference_cv.beta, max_relative = 1e-8);
        assert_relative_eq!(
            cv.estimate.price / scale,
            reference_cv.estimate.price,
            max_relative = 1e-8
        );
        assert_relative_eq!(
            result.basic.price / scale,
            reference.basic.price,
            max_relative = 1e-8
        );
    }
}
