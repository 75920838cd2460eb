//! Shuffle index selection
//!
//! Shuffle never reorders the catalog. Each shuffled step picks a fresh
//! uniformly random catalog index, so repeats of the current track are possible.

use rand::Rng;

/// Pick a uniformly random index in `[0, len)` using the thread RNG
///
/// Returns `None` for an empty range.
pub fn random_index(len: usize) -> Option<usize> {
    random_index_with(&mut rand::thread_rng(), len)
}

/// Pick a uniformly random index in `[0, len)` using `rng`
pub fn random_index_with<R: Rng + ?Sized>(rng: &mut R, len: usize) -> Option<usize> {
    if len == 0 {
        None
    } else {
        Some(rng.gen_range(0..len))
    }
}
