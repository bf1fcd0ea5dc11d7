//! WASM bindings for Gatesim Core.
//!
//! This module provides JavaScript-friendly bindings so a browser front end
//! can drive a scene once per animation frame.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmScene } from 'gatesim_core';
//!
//! await init();
//!
//! const netlist = `
//!   .input a 1
//!   .input b 0
//!   NAND g a b
//!   .output y g
//! `;
//!
//! const scene = new WasmScene(netlist);
//! scene.toggle("b");
//! console.log(scene.output("y")); // 0
//! ```
//!
//! Signals cross the boundary as `1`, `0`, or `-1` for undriven.

use wasm_bindgen::prelude::*;

use crate::circuit::{Scene, Signal};
use crate::dsl;
use crate::engine::PropagationConfig;

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn to_js(signal: Signal) -> i8 {
    match signal {
        Signal::True => 1,
        Signal::False => 0,
        Signal::Disabled => -1,
    }
}

fn from_js(value: i8) -> Signal {
    match value {
        1 => Signal::True,
        0 => Signal::False,
        _ => Signal::Disabled,
    }
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// WASM-compatible circuit scene addressed by element name.
#[wasm_bindgen]
pub struct WasmScene {
    scene: Scene,
}

#[wasm_bindgen]
impl WasmScene {
    /// Create a scene from netlist text.
    #[wasm_bindgen(constructor)]
    pub fn new(netlist: &str) -> Result<WasmScene, JsValue> {
        let ast = dsl::parse(netlist).map_err(js_error)?;
        let scene = Scene::from_ast(&ast).map_err(js_error)?;
        Ok(WasmScene { scene })
    }

    /// Create a scene with a custom propagation pass budget.
    #[wasm_bindgen]
    pub fn with_max_passes(netlist: &str, max_passes: usize) -> Result<WasmScene, JsValue> {
        let mut wasm = Self::new(netlist)?;
        wasm.scene
            .set_config(PropagationConfig::new().with_max_passes(max_passes));
        Ok(wasm)
    }

    /// Set an input pin by name (`1`, `0`, or `-1`).
    #[wasm_bindgen]
    pub fn set_input(&mut self, name: &str, value: i8) -> Result<(), JsValue> {
        let id = self.find(name)?;
        self.scene.set_input(id, from_js(value)).map_err(js_error)
    }

    /// Flip an input pin. Returns its new value.
    #[wasm_bindgen]
    pub fn toggle(&mut self, name: &str) -> Result<i8, JsValue> {
        let id = self.find(name)?;
        self.scene.toggle_input(id).map(to_js).map_err(js_error)
    }

    /// Value of an output pin by name.
    #[wasm_bindgen]
    pub fn output(&self, name: &str) -> Result<i8, JsValue> {
        let id = self.find(name)?;
        self.scene.output_value(id).map(to_js).map_err(js_error)
    }

    /// Names of all output pins, in id order.
    #[wasm_bindgen]
    pub fn output_names(&self) -> Vec<String> {
        self.scene
            .output_pins()
            .into_iter()
            .filter_map(|id| self.scene.get_node(id)?.label().map(str::to_string))
            .collect()
    }

    /// Frame tick. Returns whether the scene settled.
    #[wasm_bindgen]
    pub fn run(&mut self, delta_time: f64) -> bool {
        self.scene.run(delta_time).converged
    }

    /// The scene snapshot as JSON.
    #[wasm_bindgen]
    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        self.scene.snapshot().to_json().map_err(js_error)
    }

    fn find(&self, name: &str) -> Result<crate::circuit::NodeId, JsValue> {
        self.scene
            .find_by_label(name)
            .ok_or_else(|| JsValue::from_str(&format!("no element named '{}'", name)))
    }
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
