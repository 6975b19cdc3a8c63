//! Injectable randomness for the synthesizer and frame classifier.
//!
//! Every random draw goes through [`RandomSource::next_unit`], so a
//! seeded [`SeededRandom`] reproduces a run exactly and a
//! [`FixedSequence`] lets tests script each draw.

use rand::rngs::StdRng;
use rand::{Rng as _, SeedableRng as _};

/// A source of uniformly distributed values in `[0, 1)`.
pub trait RandomSource: Send {
    /// Returns the next value in `[0, 1)`.
    fn next_unit(&mut self) -> f64;

    /// Returns a real number uniformly drawn from `[low, high)`.
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        (high - low).mul_add(self.next_unit(), low)
    }

    /// Returns an integer uniformly drawn from `[low, high)`.
    ///
    /// Returns `low` when the range is empty.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn int_in(&mut self, low: u64, high: u64) -> u64 {
        if high <= low {
            return low;
        }
        let span = high - low;
        let offset = ((self.next_unit() * span as f64) as u64).min(span - 1);
        low + offset
    }

    /// Returns `true` with probability `p`.
    fn chance(&mut self, p: f64) -> bool {
        self.next_unit() < p
    }
}

/// [`RandomSource`] backed by `rand`'s standard generator.
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    /// Creates a reproducible source from a fixed seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Creates a source seeded from the operating system.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_unit(&mut self) -> f64 {
        self.rng.r#gen::<f64>()
    }
}

/// [`RandomSource`] that replays a scripted list of draws, cycling when
/// exhausted.
///
/// Values are clamped into `[0, 1)`.
#[derive(Debug, Clone)]
pub struct FixedSequence {
    values: Vec<f64>,
    next: usize,
}

impl FixedSequence {
    /// Creates a sequence from the given draws. An empty list always
    /// yields `0.0`.
    #[must_use]
    pub const fn new(values: Vec<f64>) -> Self {
        Self { values, next: 0 }
    }

    /// Number of draws consumed so far.
    #[must_use]
    pub const fn consumed(&self) -> usize {
        self.next
    }
}

impl RandomSource for FixedSequence {
    fn next_unit(&mut self) -> f64 {
        if self.values.is_empty() {
            self.next += 1;
            return 0.0;
        }
        let value = self.values[self.next % self.values.len()];
        self.next += 1;
        if value.is_finite() {
            value.clamp(0.0, 1.0 - f64::EPSILON)
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_in_maps_unit_interval_onto_range() {
        let mut source = FixedSequence::new(vec![0.0, 0.5, 0.999_999]);
        assert_eq!(source.int_in(60, 100), 60);
        assert_eq!(source.int_in(60, 100), 80);
        assert_eq!(source.int_in(60, 100), 99);
    }

    #[test]
    fn int_in_empty_range_returns_low() {
        let mut source = FixedSequence::new(vec![0.7]);
        assert_eq!(source.int_in(5, 5), 5);
        assert_eq!(source.consumed(), 0);
    }

    #[test]
    fn fixed_sequence_clamps_and_cycles() {
        let mut source = FixedSequence::new(vec![1.5, -2.0, f64::NAN]);
        assert!(source.next_unit() < 1.0);
        assert!(source.next_unit().abs() < f64::EPSILON);
        assert!(source.next_unit().abs() < f64::EPSILON);
        assert!(source.next_unit() < 1.0);
        assert_eq!(source.consumed(), 4);
    }

    #[test]
    fn seeded_sources_repeat() {
        let mut a = SeededRandom::new(42);
        let mut b = SeededRandom::new(42);
        for _ in 0..16 {
            let value = a.next_unit();
            assert!((0.0..1.0).contains(&value));
            assert!((value - b.next_unit()).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn uniform_scales_draw() {
        let mut source = FixedSequence::new(vec![0.25]);
        assert!((source.uniform(30.0, 90.0) - 45.0).abs() < 1e-9);
    }
}
