//! # Gatesim Core
//!
//! A tri-state digital logic circuit graph and its evaluation engine.
//!
//! This library provides:
//! - A scene model of input pins, output pins, gates and nested sub-circuits
//! - A connection graph with one driver per input socket
//! - Tri-state signals (`1`, `0`, and `x` for undriven)
//! - Deterministic fixed-point propagation that tolerates feedback loops
//! - Snapshots, a netlist DSL, and truth tables for hosts and tools
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`circuit`] - Signals, sockets, connections and the [`Scene`]
//! - [`nodes`] - Node variants and gate truth rules
//! - [`engine`] - Propagation and truth-table analysis
//! - [`events`] - Change notifications drained by the host
//! - [`snapshot`] - Enumeration and rebuild contract for persistence
//! - [`dsl`] - Parser for the netlist language
//!
//! ## Usage
//!
//! ### Library
//!
//! ```
//! use gatesim_core::{GateKind, Scene, Signal};
//!
//! let mut scene = Scene::new();
//! let a = scene.add_input();
//! let b = scene.add_input();
//! let and = scene.add_gate(GateKind::And);
//! let out = scene.add_output();
//! scene.connect(out, 0, and, 0).unwrap();
//! scene.connect(and, 0, a, 0).unwrap();
//! scene.connect(and, 1, b, 0).unwrap();
//!
//! // Inputs that were never set are undriven
//! assert_eq!(scene.output_value(out).unwrap(), Signal::Disabled);
//!
//! scene.set_input(a, Signal::True).unwrap();
//! scene.set_input(b, Signal::True).unwrap();
//! assert_eq!(scene.output_value(out).unwrap(), Signal::True);
//! ```
//!
//! ### Native CLI
//!
//! ```bash
//! gatesim adder.gs --set a=1 --set b=0
//! gatesim adder.gs --table
//! ```
//!
//! ## Signal Semantics
//!
//! Every gate yields `x` as soon as any of its inputs is `x`. Unconnected
//! inputs read `x`, so a gate widened with [`Scene::increment`] stays
//! undriven until its new socket is connected.

pub mod circuit;
pub mod dsl;
pub mod engine;
pub mod error;
pub mod events;
pub mod nodes;
pub mod snapshot;

// Re-export main types for convenience
pub use circuit::{Connection, Direction, NodeId, Scene, Signal, SocketAddr, SocketRef};
pub use engine::{PropagationConfig, PropagationReport};
pub use error::{GatesimError, Result};
pub use events::SceneEvent;
pub use nodes::{ComponentNode, GateKind, Node, NodeKind};
pub use snapshot::SceneSnapshot;

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::WasmScene;

/// Frame time assumed by hosts that tick without a clock.
pub const DEFAULT_FRAME_TIME: f64 = 1.0 / 60.0;
