//! Reproducible operation generation for randomized workloads.
//!
//! Generates random but reproducible add/remove sequences against the
//! caller-guaranteed uniqueness contract: adds never repeat a live key, and
//! removals target live keys most of the time with an occasional deliberate
//! miss. Given the same seed, the sequence is identical.

use std::collections::HashSet;

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::types::Key;

/// Configuration for operation generation.
#[derive(Debug, Clone)]
pub struct OpGenConfig {
    /// Probability of generating a removal once keys are live (0.0 - 1.0).
    pub remove_rate: f64,
    /// Probability that a generated removal targets an absent key.
    pub missing_rate: f64,
    /// Upper bound of the numeric keyspace keys are drawn from.
    pub key_ceiling: i64,
}

impl Default for OpGenConfig {
    fn default() -> Self {
        Self {
            remove_rate: 0.4,
            missing_rate: 0.1,
            key_ceiling: 10_000,
        }
    }
}

/// One generated operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Insert a key that is not currently live.
    Add(Key),
    /// Remove a key; it may deliberately be absent.
    Remove(Key),
}

/// Generates a reproducible operation stream from a seed.
#[derive(Debug)]
pub struct OperationGenerator {
    rng: StdRng,
    config: OpGenConfig,
    live: Vec<i64>,
    live_set: HashSet<i64>,
}

impl OperationGenerator {
    /// Create a generator for the given seed.
    #[must_use]
    pub fn new(seed: u64, config: OpGenConfig) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            config,
            live: Vec::new(),
            live_set: HashSet::new(),
        }
    }

    /// Produce the next operation.
    pub fn next_operation(&mut self) -> Operation {
        let remove = !self.live.is_empty() && self.rng.random_bool(self.config.remove_rate);
        if remove {
            if self.rng.random_bool(self.config.missing_rate) {
                // A removal of an absent key must come back `false`, never
                // corrupt anything.
                return Operation::Remove(Key::Number(self.fresh_value()));
            }
            let index = self.rng.random_range(0..self.live.len());
            let value = self.live.swap_remove(index);
            let _ = self.live_set.remove(&value);
            return Operation::Remove(Key::Number(value));
        }

        let value = self.fresh_value();
        self.live.push(value);
        let _ = self.live_set.insert(value);
        Operation::Add(Key::Number(value))
    }

    /// Number of keys currently live under this generator's model.
    #[must_use]
    pub fn live_keys(&self) -> usize {
        self.live.len()
    }

    fn fresh_value(&mut self) -> i64 {
        loop {
            let candidate = self.rng.random_range(0..self.config.key_ceiling);
            if !self.live_set.contains(&candidate) {
                return candidate;
            }
        }
    }
}
