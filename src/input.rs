//! Physical input device mapping.

use std::thread::{self, JoinHandle};

use log::{debug, warn};

use crate::command::Command;
use crate::queue::CommandSender;
use crate::types::Effect;

/// One event reported by a rotary/button control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Signed detents; positive is clockwise
    Rotate(i32),
    Click,
    DoubleClick,
    LongPress,
}

impl InputEvent {
    /// The command this event stands for, if any.
    ///
    /// ```
    /// use rgbw_light_controller::{Command, InputEvent};
    ///
    /// assert_eq!(InputEvent::Rotate(-2).into_command(8), Some(Command::AdjustBrightness(-16)));
    /// assert_eq!(InputEvent::Click.into_command(8), Some(Command::TogglePower));
    /// assert_eq!(InputEvent::Rotate(0).into_command(8), None);
    /// ```
    pub fn into_command(self, brightness_step: u8) -> Option<Command> {
        match self {
            InputEvent::Rotate(0) => None,
            InputEvent::Rotate(detents) => Some(Command::AdjustBrightness(
                detents.saturating_mul(brightness_step as i32),
            )),
            InputEvent::Click => Some(Command::TogglePower),
            InputEvent::DoubleClick => Some(Command::NextEffect),
            InputEvent::LongPress => Some(Command::select_effect(Effect::Solid)),
        }
    }
}

/// Forward events from a blocking source on a dedicated thread.
///
/// The thread ends when the source is exhausted or the controller is gone.
pub fn spawn_listener<I>(events: I, sender: CommandSender, brightness_step: u8) -> JoinHandle<()>
where
    I: IntoIterator<Item = InputEvent> + Send + 'static,
{
    thread::spawn(move || {
        for event in events {
            let Some(command) = event.into_command(brightness_step) else {
                continue;
            };
            if let Err(e) = sender.enqueue(command) {
                warn!("Input listener stopping: {e}");
                return;
            }
        }
        debug!("Input source exhausted");
    })
}
