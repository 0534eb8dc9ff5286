// scripts/benchmark.rs
use asian_mc::mc::mc_engine::{
    compare_methods, price_asian_option_seeded, ObservationFrequency, SimulationConfig,
    VarianceReduction,
};
use asian_mc::math_utils::Timer;
use asian_mc::mc::payoffs::OptionType;
use asian_mc::McResult;
use std::env;
use std::process::{Command, ExitCode};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
struct SystemInfo {
    os: String,
    cpu_model: String,
    rust_version: String,
}

impl SystemInfo {
    fn gather() -> Self {
        Self {
            os: env::consts::OS.to_string(),
            cpu_model: Self::get_cpu_model(),
            rust_version: Self::get_rust_version(),
        }
    }

    fn get_cpu_model() -> String {
        #[cfg(target_os = "linux")]
        {
            std::fs::read_to_string("/proc/cpuinfo")
                .ok()
                .and_then(|content| {
                    content
                        .lines()
                        .find(|line| line.starts_with("model name"))
                        .and_then(|line| line.split(':').nth(1))
                        .map(|s| s.trim().to_string())
                })
                .unwrap_or_else(|| "Unknown CPU".to_string())
        }

        #[cfg(target_os = "macos")]
        {
            Command::new("sysctl")
                .args(["-n", "machdep.cpu.brand_string"])
                .output()
                .map(|output| String::from_utf8_lossy(&output.stdout).trim().to_string())
                .unwrap_or_else(|_| "Unknown CPU".to_string())
        }

        #[cfg(not(any(target_os = "linux", target_os = "macos")))]
        {
            "Unknown CPU".to_string()
        }
    }

    fn get_rust_version() -> String {
        Command::new("rustc")
            .arg("--version")
            .output()
            .map(|output| String::from_utf8_lossy(&output.stdout).trim().to_string())
            .unwrap_or_else(|_| "Unknown Rust version".to_string())
    }
}

#[derive(Debug)]
struct TimingResult {
    name: String,
    n_sim: usize,
    time_ms: f64,
    price: f64,
    ci_width: f64,
}

fn base_config(n_sim: usize) -> SimulationConfig {
    SimulationConfig {
        s0: 100.0,
        k: 100.0,
        r: 0.05,
        q: 0.02,
        sigma: 0.2,
        t: 1.0,
        n_sim,
        obs_freq: ObservationFrequency::Daily,
        option_type: OptionType::Call,
        ..Default::default()
    }
}

/// Time the pricer with every variance reduction switched off, then on.
fn run_timing_benchmarks(seed: u64) -> McResult<Vec<TimingResult>> {
    let mut results = Vec::new();

    for &n_sim in &[10_000, 50_000] {
        for (label, flags) in [
            ("Basic", VarianceReduction::empty()),
            ("Antithetic + CV", VarianceReduction::all()),
        ] {
            info!(n_sim, label, "running timing benchmark");
            let cfg = base_config(n_sim).with_variance_reduction(flags);

            let mut timer = Timer::new();
            timer.start();
            let result = price_asian_option_seeded(&cfg, seed)?;
            let time_ms = timer.elapsed_ms();

            let best = result.best();
            results.push(TimingResult {
                name: format!("{} ({}k paths)", label, n_sim / 1000),
                n_sim,
                time_ms,
                price: best.price,
                ci_width: best.ci_width(),
            });
        }
    }

    Ok(results)
}

fn run(seed: u64, json: bool) -> McResult<()> {
    let system_info = SystemInfo::gather();
    println!("System Information:");
    println!("  OS: {}", system_info.os);
    println!("  CPU: {}", system_info.cpu_model);
    println!("  Rust Version: {}", system_info.rust_version);
    println!();

    let timings = run_timing_benchmarks(seed)?;

    println!("{:=<80}", "");
    println!("TIMING: VARIANCE REDUCTION OFF vs ON");
    println!("{:=<80}", "");
    println!(
        "{:<32} {:>8} {:>12} {:>12} {:>12}",
        "Benchmark", "Paths", "Time (ms)", "Price", "CI width"
    );
    println!("{:-<80}", "");
    for result in &timings {
        println!(
            "{:<32} {:>8} {:>12.2} {:>12.4} {:>12.4}",
            result.name, result.n_sim, result.time_ms, result.price, result.ci_width
        );
    }

    let comparison = compare_methods(&base_config(50_000), seed)?;
    println!("\n{:=<80}", "");
    println!("COMPARISON OF THE THREE ESTIMATORS");
    println!("{:=<80}", "");
    for (name, estimate) in [
        ("Basic", &comparison.basic),
        ("Antithetic", &comparison.antithetic),
        ("Antithetic + CV", &comparison.antithetic_control_variate),
    ] {
        println!(
            "{:<20} price {:>10.4}  variance {:>12.6}  CI [{:.4}, {:.4}]",
            name,
            estimate.price,
            estimate.variance,
            estimate.confidence_interval.0,
            estimate.confidence_interval.1
        );
    }
    println!(
        "Variance reduction: antithetic vs basic {:.1}%, CV vs antithetic {:.1}%",
        comparison.antithetic_reduction_pct(),
        comparison.control_variate_reduction_pct()
    );

    if json {
        let result = price_asian_option_seeded(&base_config(50_000), seed)?;
        match serde_json::to_string_pretty(&result) {
            Ok(text) => println!("\n{}", text),
            Err(e) => error!("could not serialise result: {}", e),
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = env::args().collect();
    let json = args.iter().any(|a| a == "--json");
    let seed = args
        .iter()
        .position(|a| a == "--seed")
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);

    println!("asian-mc Benchmark");
    println!("==================\n");

    match run(seed, json) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("benchmark failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
