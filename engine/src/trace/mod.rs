//! Instrumentation for replayable mutation traces.
//!
//! The tree decomposes every instrumented insert/delete into micro-steps and
//! captures each one as a [`Frame`]: a materialized snapshot of the tree
//! shape, a [`Highlight`] describing what the step emphasizes, and a copy of
//! the telemetry counters. Frames flow into a [`TraceSink`] passed explicitly
//! into the instrumented operations.

mod frame;
mod highlight;

pub use frame::{Frame, SnapshotNode, TraceSink, TreeSnapshot};
pub use highlight::{EdgeHighlight, Highlight, IndexMark, NodeHighlight, SeparatorMark};
