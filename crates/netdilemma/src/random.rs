//! Seeded pseudo-random number generator
//!
//! Deterministic PRNG for reproducible strategy assignment and match
//! execution. Uses a simple but effective xorshift algorithm.

/// Seeded random number generator
///
/// Deterministic: same seed + stream = same sequence
#[derive(Clone, Debug)]
pub struct SeededRng {
    state: u64,
}

impl SeededRng {
    /// Create a new RNG from a run seed and a stream id.
    ///
    /// Streams keep the assignment draw and every edge's match on
    /// independent sequences derived from the same run seed.
    pub fn new(seed: u64, stream: u64) -> Self {
        let mut state = seed ^ 0x9e3779b97f4a7c15;
        state ^= stream.wrapping_mul(0x517cc1b727220a95);

        // Warm up the generator
        let mut rng = Self { state };
        for _ in 0..8 {
            rng.next_u64();
        }

        rng
    }

    /// RNG stream for the match on edge `(a, b)`.
    ///
    /// Endpoints are packed in canonical order, so both orientations
    /// of an undirected edge replay the same match.
    pub fn for_edge(seed: u64, a: u32, b: u32) -> Self {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        Self::new(seed, (u64::from(hi) << 32) | u64::from(lo))
    }

    /// Derive an RNG for a specific round within a match
    pub fn for_round(&self, round: u32) -> Self {
        let mut new_state = self.state;
        new_state ^= u64::from(round).wrapping_mul(0x9e3779b97f4a7c15);

        let mut rng = Self { state: new_state };
        rng.next_u64(); // Mix
        rng
    }

    /// Generate next u64
    pub fn next_u64(&mut self) -> u64 {
        // xorshift64*
        self.state ^= self.state >> 12;
        self.state ^= self.state << 25;
        self.state ^= self.state >> 27;
        self.state.wrapping_mul(0x2545f4914f6cdd1d)
    }

    /// Generate next u32
    pub fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    /// Uniform f64 in [0, 1)
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Bernoulli draw: true with probability `p`
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Generate a value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        self.next_u32() % max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let mut r1 = SeededRng::new(42, 0);
        let mut r2 = SeededRng::new(42, 0);

        for _ in 0..100 {
            assert_eq!(r1.next_u64(), r2.next_u64());
        }
    }

    #[test]
    fn test_different_seeds() {
        let mut rng1 = SeededRng::new(1, 0);
        let mut rng2 = SeededRng::new(2, 0);

        // Should produce different sequences
        let vals1: Vec<_> = (0..10).map(|_| rng1.next_u64()).collect();
        let vals2: Vec<_> = (0..10).map(|_| rng2.next_u64()).collect();

        assert_ne!(vals1, vals2);
    }

    #[test]
    fn test_different_streams() {
        let mut rng1 = SeededRng::new(42, 0);
        let mut rng2 = SeededRng::new(42, 1);

        assert_ne!(rng1.next_u64(), rng2.next_u64());
    }

    #[test]
    fn test_for_edge_ignores_orientation() {
        let mut ab = SeededRng::for_edge(42, 3, 7);
        let mut ba = SeededRng::for_edge(42, 7, 3);

        for _ in 0..20 {
            assert_eq!(ab.next_u64(), ba.next_u64());
        }
    }

    #[test]
    fn test_different_edges_differ() {
        let mut e1 = SeededRng::for_edge(42, 1, 2);
        let mut e2 = SeededRng::for_edge(42, 1, 3);

        assert_ne!(e1.next_u64(), e2.next_u64());
    }

    #[test]
    fn test_for_round_does_not_advance_parent() {
        let parent = SeededRng::new(42, 0);
        let mut d1 = parent.for_round(5);
        let mut d2 = parent.for_round(5);

        assert_eq!(d1.next_u64(), d2.next_u64());
    }

    #[test]
    fn test_f64_range() {
        let mut rng = SeededRng::new(42, 0);

        for _ in 0..1000 {
            let x = rng.next_f64();
            assert!((0.0..1.0).contains(&x));
        }
    }

    #[test]
    fn test_chance_extremes() {
        let mut rng = SeededRng::new(42, 0);

        for _ in 0..100 {
            assert!(rng.chance(1.0));
            assert!(!rng.chance(0.0));
        }
    }

    #[test]
    fn test_next_range() {
        let mut rng = SeededRng::new(42, 0);

        // Test various ranges
        for max in [1, 10, 100, 1000].iter() {
            for _ in 0..100 {
                let val = rng.next_range(*max);
                assert!(val < *max, "next_range({}) returned {}", max, val);
            }
        }

        // Test edge case: max = 0
        assert_eq!(rng.next_range(0), 0);
    }
}
