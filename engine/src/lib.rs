// Life of a sequenced operation:
// 1. Keys come in (typed, or synthesized by keygen)
// 2. The sequencer replaces its queue and enters the in-sequence state
// 3. For each external tick:
//     - Step within buffered frames, or
//     - Run the next queued operation with a trace sink attached, so every
//       micro-step inside the tree captures a frame
//     - Hand the frame to the rendering collaborator
// 4. When queue and buffer are exhausted, return the settled tree state
//
// System components:
//  - B-tree over an id-addressed node arena
//  - Highlight/frame trace layer
//  - Frame sequencer with bounded backward history

pub mod config;
pub mod keygen;
pub mod sequencer;
pub mod simulation;
pub mod trace;
pub mod tree;
pub mod types;

#[cfg(test)]
mod e2e_tests;

pub use sequencer::{BufferUnderflow, FRAME_BUFFER_SIZE, FrameSequencer, OpKind, PendingOp};
pub use trace::{Frame, Highlight, TraceSink, TreeSnapshot};
pub use tree::{AddResult, BTree, MalformedTree, NodeView, SplitDescriptor, Telemetry};
pub use types::{Key, KeyType, NodeId};
