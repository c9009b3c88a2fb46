use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

/// Uniform random numbers in `[0, 1)` for the traffic simulator.
pub trait RandomSource {
    fn next_f64(&mut self) -> f64;

    /// Picks one element uniformly. `items` must not be empty.
    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T
    where
        Self: Sized,
    {
        let index = (self.next_f64() * items.len() as f64) as usize;
        &items[index.min(items.len() - 1)]
    }
}

/// `rand`-backed source, seeded from the OS or from a fixed seed.
#[derive(Debug, Clone)]
pub struct StdRandom(StdRng);

impl StdRandom {
    pub fn from_entropy() -> Self {
        Self(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl RandomSource for StdRandom {
    fn next_f64(&mut self) -> f64 {
        self.0.gen::<f64>()
    }
}

/// Replays a fixed sequence, cycling when it runs out. An empty script
/// always yields `0.0`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    values: VecDeque<f64>,
}

impl ScriptedRandom {
    pub fn new(values: impl IntoIterator<Item = f64>) -> Self {
        Self {
            values: values.into_iter().collect(),
        }
    }
}

impl RandomSource for ScriptedRandom {
    fn next_f64(&mut self) -> f64 {
        match self.values.pop_front() {
            Some(v) => {
                self.values.push_back(v);
                v
            }
            None => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_cycles() {
        let mut rng = ScriptedRandom::new([0.1, 0.9]);
        assert_eq!(rng.next_f64(), 0.1);
        assert_eq!(rng.next_f64(), 0.9);
        assert_eq!(rng.next_f64(), 0.1);
    }

    #[test]
    fn pick_maps_unit_interval_onto_indices() {
        let items = ["a", "b", "c", "d"];
        let mut rng = ScriptedRandom::new([0.0, 0.26, 0.5, 0.999_999]);
        assert_eq!(*rng.pick(&items), "a");
        assert_eq!(*rng.pick(&items), "b");
        assert_eq!(*rng.pick(&items), "c");
        assert_eq!(*rng.pick(&items), "d");
    }

    #[test]
    fn seeded_is_reproducible() {
        let mut a = StdRandom::seeded(7);
        let mut b = StdRandom::seeded(7);
        for _ in 0..5 {
            let x = a.next_f64();
            assert_eq!(x, b.next_f64());
            assert!((0.0..1.0).contains(&x));
        }
    }
}
