//! Randomized workload testing infrastructure.
//!
//! This module provides tools for exercising the tree with reproducible
//! random workloads:
//! - Seeded operation generation (no uncontrolled randomness)
//! - Structural invariant checking after every operation
//! - A model set the tree's key sequence is compared against
//!
//! Given the same seed, execution is identical, so a failing seed is a
//! complete reproduction recipe.

mod invariants;
mod op_gen;

pub use invariants::{InvariantViolation, check_tree};
pub use op_gen::{OpGenConfig, Operation, OperationGenerator};

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::trace::TraceSink;
    use crate::tree::BTree;
    use crate::types::Key;

    fn run_workload(seed: u64, max_keys: usize, operations: usize, traced: bool) {
        let mut tree = BTree::new(max_keys);
        let mut model: BTreeSet<Key> = BTreeSet::new();
        let mut generator = OperationGenerator::new(seed, OpGenConfig::default());

        for step in 0..operations {
            match generator.next_operation() {
                Operation::Add(key) => {
                    let _ = model.insert(key.clone());
                    if traced {
                        let mut sink = TraceSink::new();
                        tree.add_traced(key, Some(&mut sink));
                        assert!(!sink.is_empty(), "traced add must emit frames");
                    } else {
                        tree.add(key);
                    }
                }
                Operation::Remove(key) => {
                    let expected = model.remove(&key);
                    let removed = if traced {
                        let mut sink = TraceSink::new();
                        tree.remove_traced(&key, Some(&mut sink))
                    } else {
                        tree.remove(&key)
                    };
                    assert_eq!(
                        removed, expected,
                        "seed {seed} capacity {max_keys} step {step}: removal of {key}"
                    );
                }
            }

            let violations = check_tree(&tree);
            assert!(
                violations.is_empty(),
                "seed {seed} capacity {max_keys} step {step}: {violations:?}"
            );
        }

        let expected: Vec<Key> = model.into_iter().collect();
        assert_eq!(tree.keys(), expected, "seed {seed} capacity {max_keys}");
    }

    #[test]
    fn test_workloads_hold_invariants_across_capacities() {
        for seed in [1, 7, 42] {
            for max_keys in [2, 3, 4, 5, 8] {
                run_workload(seed, max_keys, 400, false);
            }
        }
    }

    #[test]
    fn test_traced_workload_matches_untraced_semantics() {
        // Instrumentation must never change what the tree does.
        run_workload(1234, 3, 200, true);
    }

    #[test]
    fn test_insert_heavy_then_drain() {
        let mut tree = BTree::new(2);
        let mut generator = OperationGenerator::new(
            5,
            OpGenConfig {
                remove_rate: 0.0,
                ..OpGenConfig::default()
            },
        );

        let mut keys = Vec::new();
        for _ in 0..120 {
            if let Operation::Add(key) = generator.next_operation() {
                keys.push(key.clone());
                tree.add(key);
            }
        }
        assert!(check_tree(&tree).is_empty());

        for key in &keys {
            assert!(tree.remove(key));
            assert!(check_tree(&tree).is_empty());
        }
        assert!(tree.is_empty());
    }
}
