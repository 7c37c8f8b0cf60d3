use std::env;
use std::time::Duration;

use criterion::Criterion;

mod rng;

pub use rng::SplitMix64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BenchTier {
    Quick,
    Full,
}

impl BenchTier {
    pub fn from_env() -> Self {
        match env::var("GLYPHGRID_BENCH_TIER").as_deref() {
            Ok("full") => Self::Full,
            _ => Self::Quick,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BenchConfig {
    pub tier: BenchTier,
    pub seed: u64,
}

pub fn bench_config() -> BenchConfig {
    let seed = env::var("GLYPHGRID_BENCH_SEED")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0x5eed_1234);
    BenchConfig {
        tier: BenchTier::from_env(),
        seed,
    }
}

pub fn bench_criterion() -> Criterion {
    let measurement = match BenchTier::from_env() {
        BenchTier::Quick => Duration::from_secs(2),
        BenchTier::Full => Duration::from_secs(8),
    };
    Criterion::default()
        .sample_size(20)
        .measurement_time(measurement)
}
