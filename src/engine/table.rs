//! Exhaustive truth tables.

use std::fmt;

use crate::circuit::{NodeId, Scene, Signal};
use crate::error::{GatesimError, Result};

/// Largest number of input pins a truth table will enumerate.
pub const MAX_TABLE_INPUTS: usize = 16;

/// Output values for every combination of input values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TruthTable {
    /// Input column headers
    pub inputs: Vec<String>,
    /// Output column headers
    pub outputs: Vec<String>,
    /// One row per input combination, counting up from all-false
    pub rows: Vec<(Vec<Signal>, Vec<Signal>)>,
}

/// Enumerate all true/false combinations of the scene's input pins and
/// record every output pin. The scene itself is left untouched.
pub fn truth_table(scene: &Scene) -> Result<TruthTable> {
    let inputs = scene.input_pins();
    let outputs = scene.output_pins();
    if inputs.len() > MAX_TABLE_INPUTS {
        return Err(GatesimError::TooManyInputs {
            count: inputs.len(),
            max: MAX_TABLE_INPUTS,
        });
    }

    let mut work = scene.clone();
    work.set_event_recording(false);

    let mut rows = Vec::with_capacity(1 << inputs.len());
    for combination in 0u32..(1u32 << inputs.len()) {
        // First input is the most significant bit
        let stimulus: Vec<(NodeId, Signal)> = inputs
            .iter()
            .enumerate()
            .map(|(i, &id)| {
                let bit = (combination >> (inputs.len() - 1 - i)) & 1 == 1;
                (id, Signal::from(bit))
            })
            .collect();
        work.set_inputs(&stimulus)?;

        let values = outputs
            .iter()
            .map(|&id| work.output_value(id))
            .collect::<Result<Vec<_>>>()?;
        rows.push((stimulus.into_iter().map(|(_, v)| v).collect(), values));
    }

    Ok(TruthTable {
        inputs: headers(scene, &inputs),
        outputs: headers(scene, &outputs),
        rows,
    })
}

fn headers(scene: &Scene, ids: &[NodeId]) -> Vec<String> {
    ids.iter()
        .map(|&id| {
            scene
                .get_node(id)
                .and_then(|n| n.label())
                .map(str::to_string)
                .unwrap_or_else(|| id.to_string())
        })
        .collect()
}

impl fmt::Display for TruthTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let widths: Vec<usize> = self
            .inputs
            .iter()
            .chain(self.outputs.iter())
            .map(|h| h.len().max(1))
            .collect();
        let (in_widths, out_widths) = widths.split_at(self.inputs.len());

        let header = |names: &[String], widths: &[usize]| {
            names
                .iter()
                .zip(widths)
                .map(|(n, w)| format!("{:>w$}", n, w = *w))
                .collect::<Vec<_>>()
                .join(" ")
        };
        writeln!(
            f,
            "{} | {}",
            header(&self.inputs, in_widths),
            header(&self.outputs, out_widths)
        )?;

        let row = |values: &[Signal], widths: &[usize]| {
            values
                .iter()
                .zip(widths)
                .map(|(v, w)| format!("{:>w$}", v.to_string(), w = *w))
                .collect::<Vec<_>>()
                .join(" ")
        };
        for (ins, outs) in &self.rows {
            writeln!(f, "{} | {}", row(ins, in_widths), row(outs, out_widths))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::GateKind;

    fn xor_scene() -> Scene {
        let mut scene = Scene::new();
        let a = scene.add_input();
        let b = scene.add_input();
        let x = scene.add_gate(GateKind::Xor);
        let y = scene.add_output();
        scene.set_label(a, "a").unwrap();
        scene.set_label(b, "b").unwrap();
        scene.set_label(y, "y").unwrap();
        scene.connect(x, 0, a, 0).unwrap();
        scene.connect(x, 1, b, 0).unwrap();
        scene.connect(y, 0, x, 0).unwrap();
        scene
    }

    #[test]
    fn test_xor_table() {
        let scene = xor_scene();
        let table = truth_table(&scene).unwrap();
        assert_eq!(table.inputs, vec!["a", "b"]);
        assert_eq!(table.outputs, vec!["y"]);
        let outputs: Vec<Signal> = table.rows.iter().map(|(_, o)| o[0]).collect();
        assert_eq!(
            outputs,
            vec![Signal::False, Signal::True, Signal::True, Signal::False]
        );
        assert_eq!(table.rows[1].0, vec![Signal::False, Signal::True]);
    }

    #[test]
    fn test_table_leaves_scene_untouched() {
        let scene = xor_scene();
        let before = scene.snapshot();
        truth_table(&scene).unwrap();
        assert_eq!(scene.snapshot(), before);
    }

    #[test]
    fn test_table_display() {
        let table = truth_table(&xor_scene()).unwrap();
        let text = table.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "a b | y");
        assert_eq!(lines[2], "0 1 | 1");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn test_too_many_inputs() {
        let mut scene = Scene::new();
        for _ in 0..=MAX_TABLE_INPUTS {
            scene.add_input();
        }
        assert!(matches!(
            truth_table(&scene),
            Err(GatesimError::TooManyInputs { .. })
        ));
    }
}
