//! End-to-end tests at the public API level.
//!
//! Each test file covers a specific scenario, using deterministic inputs
//! to verify the complete mutate/inspect/serialize/sequence surface.

#![cfg(test)]

mod helpers;

mod test_bounded_replay;
mod test_deletion_collapse;
mod test_keygen_workload;
mod test_order3_scenario;
mod test_roundtrip;
mod test_sequencer_navigation;
mod test_split_correctness;
