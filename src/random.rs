//! Uniform random sampling.

/// Source of uniform samples. Only [`next_f64`](Self::next_f64) is required.
pub trait RandomSource {
    /// A sample in `[0, 1)`.
    fn next_f64(&mut self) -> f64;

    /// A sample in `[min, max)`; returns `min` when the range is empty.
    fn uniform(&mut self, min: f64, max: f64) -> f64 {
        self.next_f64() * (max - min) + min
    }

    /// An integer in `min..=max`.
    fn uniform_int(&mut self, min: usize, max: usize) -> usize {
        assert!(min <= max, "uniform_int: min {min} > max {max}");
        let span = (max - min + 1) as f64;
        // next_f64 < 1 keeps the product below span, min() guards rounding.
        min + ((self.next_f64() * span) as usize).min(max - min)
    }
}

/// [`RandomSource`] backed by `fastrand`.
#[derive(Debug, Clone)]
pub struct FastRandom(fastrand::Rng);

impl FastRandom {
    /// Seeded from the host's entropy.
    pub fn from_entropy() -> Self {
        #[cfg(target_arch = "wasm32")]
        {
            // fastrand cannot reach an entropy source on wasm32-unknown-unknown.
            let seed = (js_sys::Math::random() * u64::MAX as f64) as u64;
            Self(fastrand::Rng::with_seed(seed))
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            Self(fastrand::Rng::new())
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self(fastrand::Rng::with_seed(seed))
    }
}

impl RandomSource for FastRandom {
    fn next_f64(&mut self) -> f64 {
        self.0.f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(f64);

    impl RandomSource for Fixed {
        fn next_f64(&mut self) -> f64 {
            self.0
        }
    }

    #[test]
    fn uniform_stays_in_range() {
        let mut rng = FastRandom::with_seed(7);
        for _ in 0..1000 {
            let v = rng.uniform(0.5, 1.0);
            assert!((0.5..1.0).contains(&v), "{v}");
        }
    }

    #[test]
    fn uniform_empty_range_is_min() {
        let mut rng = FastRandom::with_seed(1);
        assert_eq!(rng.uniform(3.0, 3.0), 3.0);
    }

    #[test]
    fn uniform_int_is_inclusive() {
        assert_eq!(Fixed(0.0).uniform_int(0, 3), 0);
        assert_eq!(Fixed(0.999_999).uniform_int(0, 3), 3);
        assert_eq!(Fixed(0.5).uniform_int(2, 2), 2);
    }

    #[test]
    fn uniform_int_hits_every_value() {
        let mut rng = FastRandom::with_seed(42);
        let mut seen = [false; 4];
        for _ in 0..500 {
            seen[rng.uniform_int(0, 3)] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }
}
