//! Injectable randomness for light flicker.
//! The default generator is a seedable xorshift64, deterministic under test.

/// Source of the per-tick jitter added to every light's target power.
pub trait FlickerSource {
    /// A value uniformly distributed in `[-amplitude, amplitude)`.
    fn jitter(&mut self, amplitude: f32) -> f32;
}

/// Seedable pseudo-random number generator (xorshift64).
#[derive(Debug, Clone)]
pub struct Rng {
    state: u64,
}

impl Rng {
    pub fn new(seed: u64) -> Self {
        Rng {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Generate a random number in [0, 1).
    pub fn next_f32(&mut self) -> f32 {
        // Top 24 bits fill the f32 mantissa exactly.
        (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32
    }
}

impl FlickerSource for Rng {
    fn jitter(&mut self, amplitude: f32) -> f32 {
        (self.next_f32() * 2.0 - 1.0) * amplitude
    }
}

/// Flicker disabled: lights ease toward their target exactly.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFlicker;

impl FlickerSource for NoFlicker {
    fn jitter(&mut self, _amplitude: f32) -> f32 {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_flicker() {
        let mut a = Rng::new(42);
        let mut b = Rng::new(42);
        let first: Vec<f32> = (0..32).map(|_| a.jitter(0.05)).collect();
        let second: Vec<f32> = (0..32).map(|_| b.jitter(0.05)).collect();
        assert_eq!(first, second);

        let mut c = Rng::new(43);
        let other: Vec<f32> = (0..32).map(|_| c.jitter(0.05)).collect();
        assert_ne!(first, other);
    }

    #[test]
    fn zero_seed_still_varies() {
        let mut rng = Rng::new(0);
        let a = rng.next_u64();
        let b = rng.next_u64();
        assert!(a != 0 && b != 0 && a != b);
    }

    #[test]
    fn next_f32_in_unit_range() {
        let mut rng = Rng::new(99);
        for _ in 0..1000 {
            let v = rng.next_f32();
            assert!((0.0..1.0).contains(&v), "{}", v);
        }
    }

    #[test]
    fn jitter_within_amplitude() {
        let mut rng = Rng::new(5);
        let mut saw_negative = false;
        let mut saw_positive = false;
        for _ in 0..1000 {
            let j = rng.jitter(0.05);
            assert!((-0.05..0.05).contains(&j), "{}", j);
            saw_negative |= j < 0.0;
            saw_positive |= j > 0.0;
        }
        assert!(saw_negative && saw_positive);
    }

    #[test]
    fn no_flicker_is_zero() {
        assert_eq!(NoFlicker.jitter(0.05), 0.0);
    }
}
