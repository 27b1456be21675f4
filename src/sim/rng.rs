// rng.rs - xorshift32
//
// Small, seedable and the same on every target, so tests can pin a seed.

const FALLBACK_SEED: u32 = 0xDEADBEEF;

#[derive(Clone, Debug)]
pub struct Rng(u32);

impl Rng {
    /// xorshift has a fixed point at zero, so a zero seed is replaced.
    pub fn new(seed: u32) -> Self {
        Self(if seed == 0 { FALLBACK_SEED } else { seed })
    }

    /// Uniform in [0, 1), 24 bits of precision
    #[inline(always)]
    pub fn next(&mut self) -> f64 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 17;
        self.0 ^= self.0 << 5;
        (self.0 >> 8) as f64 * (1.0 / 16777216.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_in_unit_range() {
        let mut rng = Rng::new(42);
        for _ in 0..10_000 {
            let v = rng.next();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn test_zero_seed_still_varies() {
        let mut rng = Rng::new(0);
        let a = rng.next();
        let b = rng.next();
        assert_ne!(a, b);
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = Rng::new(7);
        let mut b = Rng::new(7);
        for _ in 0..100 {
            assert_eq!(a.next(), b.next());
        }
    }
}
