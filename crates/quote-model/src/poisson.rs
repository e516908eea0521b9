//! Poisson sampling by repeated multiplication of uniforms
//!
//! Draws `u1 * u2 * ... * uk` until the product falls to `e^-λ`; the number
//! of factors before that is Poisson(λ). Rates above [`MAX_CHUNK`] are split
//! into chunks and the chunk draws summed, so `e^-λ` never underflows.

use rand::Rng;

/// Largest rate sampled in one multiplication run
pub const MAX_CHUNK: f64 = 30.0;

/// Draw from Poisson(`lambda`)
///
/// Returns 0 for a zero, negative or non-finite rate without touching `rng`.
pub fn sample<R: Rng + ?Sized>(lambda: f64, rng: &mut R) -> u64 {
    if !lambda.is_finite() || lambda <= 0.0 {
        return 0;
    }

    let mut remaining = lambda;
    let mut count = 0;
    while remaining > 0.0 {
        let chunk = remaining.min(MAX_CHUNK);
        count += sample_chunk(chunk, rng);
        remaining -= chunk;
    }
    count
}

fn sample_chunk<R: Rng + ?Sized>(lambda: f64, rng: &mut R) -> u64 {
    let threshold = (-lambda).exp();
    let mut product = 1.0;
    let mut count = 0;
    loop {
        product *= rng.r#gen::<f64>();
        if product <= threshold {
            return count;
        }
        count += 1;
    }
}
