//! Button dispatch
//!
//! Three momentary buttons share one edge interrupt. Each pending edge is
//! handled in the order start, reset, stop, then its indicator is cleared so
//! the same edge is not seen twice. Buttons are live whatever the run state.

use heapless::Vec;

use crate::clock::StopwatchState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    Start,
    Reset,
    Stop,
}

impl Button {
    /// Dispatch order when several edges are pending together
    pub const ALL: [Button; 3] = [Button::Start, Button::Reset, Button::Stop];
}

/// Edge-pending indicators for the button inputs
pub trait ButtonLines {
    fn is_pending(&self, button: Button) -> bool;

    fn clear_pending(&mut self, button: Button);
}

/// Buttons handled by one dispatch, in handling order
pub type Handled = Vec<Button, 3>;

/// Apply one button's action to the stopwatch.
pub fn press(button: Button, state: &mut StopwatchState) {
    match button {
        Button::Start => state.start(),
        Button::Reset => state.reset(),
        Button::Stop => state.stop(),
    }
}

/// Handle every pending edge and clear its indicator.
pub fn dispatch<L: ButtonLines>(lines: &mut L, state: &mut StopwatchState) -> Handled {
    let mut handled = Handled::new();
    for button in Button::ALL {
        if lines.is_pending(button) {
            press(button, state);
            lines.clear_pending(button);
            // Capacity equals the number of buttons
            let _ = handled.push(button);
        }
    }
    handled
}
