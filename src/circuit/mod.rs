//! Circuit graph representation.
//!
//! This module provides the data model of one circuit: signal and socket
//! types, the connection graph, and the [`Scene`] that owns nodes and
//! connections and keeps every socket value propagated.

mod build;
mod graph;
mod scene;
mod types;
mod validate;

pub use graph::Connections;
pub use scene::Scene;
pub use types::*;
pub use validate::validate_scene;
