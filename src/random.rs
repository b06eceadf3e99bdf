//! Seeded random number generation.
//!
//! Every run owns exactly one generator. All draws that shape a genotype
//! go through it sequentially, so a fixed seed reproduces a run.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Creates a reproducible generator from a 64-bit seed.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Creates a generator from an optional seed.
///
/// `None` draws a fresh seed from the thread-local generator.
pub fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => create_rng(seed),
        None => create_rng(rand::random()),
    }
}
