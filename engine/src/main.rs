// Forbid unwrap() in production code to prevent panics from bad input.
// Test code is allowed to use unwrap() for convenience.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]

use engine::config::EngineConfig;
use engine::keygen::{self, KeyOrder};
use engine::sequencer::FrameSequencer;
use engine::trace::{Frame, SnapshotNode};
use engine::tree::BTree;
use engine::types::KeyType;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from environment variables
    let config = match EngineConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!(
        "Loaded configuration: max_keys={}, frame_buffer_size={}, demo_keys={}",
        config.max_keys,
        config.frame_buffer_size,
        config.demo_keys
    );

    // Synthesize a workload the way the input layer would.
    let mut rng = rand::rng();
    let keys = keygen::generate_keys(
        &mut rng,
        config.demo_keys,
        KeyType::Number,
        KeyOrder::Random,
        &[],
    );
    tracing::info!("Synthesized {} keys", keys.len());

    // Drive the sequencer to completion, printing one line per frame the
    // way a rendering collaborator would consume them.
    let tree = BTree::new(config.max_keys);
    let mut sequencer = FrameSequencer::with_capacity(tree, config.frame_buffer_size);
    sequencer.add_keys(keys);

    let mut step = 0usize;
    loop {
        let frame = sequencer.next_frame();
        let done = !sequencer.in_sequence();
        step += 1;
        println!("step {step:>4}  {}", render_frame(&frame));
        if done {
            break;
        }
    }

    let counters = sequencer.tree().counters();
    tracing::info!(
        "sequence finished: splits={}, merges={}, small_rotations={}, big_rotations={}",
        counters.splits,
        counters.merges,
        counters.small_rotations,
        counters.big_rotations
    );

    println!("{}", sequencer.tree().export());
}

/// One compact line per frame: the bracketed tree shape plus how many
/// nodes the frame emphasizes.
fn render_frame(frame: &Frame) -> String {
    let highlighted = frame.highlight.nodes().len();
    format!(
        "{} ({} highlighted)",
        render_node(&frame.snapshot.root),
        highlighted
    )
}

fn render_node(node: &SnapshotNode) -> String {
    let keys: Vec<String> = node.keys.iter().map(ToString::to_string).collect();
    if node.is_leaf() {
        return format!("[{}]", keys.join(" "));
    }

    let mut parts = Vec::new();
    for (position, child) in node.children.iter().enumerate() {
        parts.push(render_node(child));
        if let Some(key) = keys.get(position) {
            parts.push(key.clone());
        }
    }
    format!("({})", parts.join(" "))
}
