//! Signal propagation engine.
//!
//! This module computes a consistent value for every socket of a scene.
//!
//! ## Iterative relaxation
//!
//! Evaluation starts with every socket disabled and proceeds in passes:
//!
//! 1. Evaluate every dirty node against the values of the previous pass
//! 2. Commit the outputs that changed
//! 3. Mark the consumers of changed nodes dirty for the next pass
//!
//! A pass is order independent, so the result depends only on topology and
//! stimulus. Gate functions are monotone (a disabled input always yields a
//! disabled output), so every output socket leaves disabled at most once.
//! A scene without a socket-level cycle therefore settles within one pass
//! per output socket, and a cycle simply stays disabled.
//!
//! If a round exhausts its pass budget the nodes that changed in the last
//! pass are pinned to disabled and relaxation continues. Each round pins at
//! least one new node, which bounds the total work.

mod propagate;
mod table;

pub use propagate::{PropagationConfig, PropagationReport, Propagator};
pub use table::{truth_table, TruthTable, MAX_TABLE_INPUTS};

/// Passes allowed per round on top of the output socket count.
pub const EXTRA_PASSES: usize = 2;
