//! Input and output pins.

use crate::circuit::Signal;

/// External stimulus entry point: no inputs, one output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputPin {
    state: Signal,
}

impl InputPin {
    /// Create a pin that has never been driven.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a pin holding the given state.
    pub fn with_state(state: Signal) -> Self {
        Self { state }
    }

    /// Current stimulus.
    pub fn get(&self) -> Signal {
        self.state
    }

    /// Replace the stimulus.
    pub fn set(&mut self, state: Signal) {
        self.state = state;
    }

    /// Flip between true and false. A disabled pin stays disabled.
    pub fn toggle(&mut self) -> Signal {
        self.state = !self.state;
        self.state
    }
}

/// Terminal probe: one input, no outputs.
///
/// The displayed value is the value cached on its single input socket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputPin;
