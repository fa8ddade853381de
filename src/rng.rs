//! Seeded random number generation.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Generator used by instances and runners.
pub type SolverRng = ChaCha8Rng;

/// Creates a generator from `seed`, or from a fresh random seed when absent.
pub fn create_rng(seed: Option<u64>) -> SolverRng {
    ChaCha8Rng::seed_from_u64(seed.unwrap_or_else(rand::random))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_same_seed_same_stream() {
        let mut a = create_rng(Some(7));
        let mut b = create_rng(Some(7));
        let xs: Vec<u64> = (0..16).map(|_| a.random()).collect();
        let ys: Vec<u64> = (0..16).map(|_| b.random()).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn test_different_seed_different_stream() {
        let mut a = create_rng(Some(1));
        let mut b = create_rng(Some(2));
        let xs: Vec<u64> = (0..4).map(|_| a.random()).collect();
        let ys: Vec<u64> = (0..4).map(|_| b.random()).collect();
        assert_ne!(xs, ys);
    }
}
