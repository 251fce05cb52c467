//! Mode state machine driven by the control loop.

use log::{debug, warn};

use crate::animation;
use crate::command::Command;
use crate::light::Light;
use crate::serial::CommandSink;

/// A behaviour the control loop can run.
///
/// The loop feeds every dequeued command to [`Mode::handle_command`] and calls
/// [`Mode::advance`] exactly once per tick.
pub trait Mode {
    fn handle_command(&mut self, command: Command);

    fn advance(&mut self);

    /// Current authoritative light state.
    fn light(&self) -> &Light;
}

/// The standard mode: applies commands to one light, animates its effect and
/// forwards changed states to the serial link.
///
/// A frame is only handed to the sink when the rendered light differs from
/// the last one transmitted, so idle ticks cost nothing on the wire.
#[derive(Debug)]
pub struct LightMode<S> {
    light: Light,
    sink: S,
    last_transmitted: Option<Light>,
    tick: u64,
    brightness_step: u8,
}

impl<S: CommandSink> LightMode<S> {
    pub fn new(sink: S, brightness_step: u8) -> Self {
        Self::with_light(Light::new(), sink, brightness_step)
    }

    pub fn with_light(light: Light, sink: S, brightness_step: u8) -> Self {
        LightMode {
            light,
            sink,
            last_transmitted: None,
            tick: 0,
            brightness_step,
        }
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn last_transmitted(&self) -> Option<&Light> {
        self.last_transmitted.as_ref()
    }

    /// Send the light as rendered for the current tick, unless it is exactly
    /// what was sent last.
    pub fn request_update(&mut self) {
        let rendered = animation::render(&self.light, self.tick);
        if self.last_transmitted.as_ref() == Some(&rendered) {
            return;
        }
        let command = rendered.serial_command();
        if let Err(e) = self.sink.add_command(command) {
            warn!("Dropping {command:?}: {e}");
        }
        // Recorded even on failure; the next change produces a fresh frame.
        self.last_transmitted = Some(rendered);
    }
}

impl<S: CommandSink> Mode for LightMode<S> {
    fn handle_command(&mut self, command: Command) {
        debug!("Applying {command:?}");
        let step = self.brightness_step as i64;
        match command {
            Command::IncreaseBrightness => self.light.adjust_brightness(step),
            Command::DecreaseBrightness => self.light.adjust_brightness(-step),
            Command::AdjustBrightness(delta) => self.light.adjust_brightness(delta.into()),
            Command::SetBrightness(value) => self.light.set_brightness(value.into()),
            Command::TogglePower => self.light.toggle_power(),
            Command::SetPower(on) => self.light.set_power(on),
            Command::NextEffect => self.light.next_effect(),
            Command::SelectEffect(name) => {
                self.light.select_effect(&name);
            }
            Command::SetColor(color) => self.light.set_color(&color),
        }
        self.request_update();
    }

    fn advance(&mut self) {
        self.tick = self.tick.wrapping_add(1);
        self.request_update();
    }

    fn light(&self) -> &Light {
        &self.light
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use crate::errors::Error;
    use crate::serial::SerialCommand;
    use crate::types::{ColorRGBW, Effect};

    #[derive(Default)]
    struct RecordingSink {
        sent: Mutex<Vec<SerialCommand>>,
    }

    impl RecordingSink {
        fn sent(&self) -> Vec<SerialCommand> {
            self.sent.lock().unwrap().clone()
        }
    }

    impl CommandSink for RecordingSink {
        fn add_command(&self, command: SerialCommand) -> Result<(), Error> {
            self.sent.lock().unwrap().push(command);
            Ok(())
        }
    }

    struct ClosedSink;

    impl CommandSink for ClosedSink {
        fn add_command(&self, _command: SerialCommand) -> Result<(), Error> {
            Err(Error::ChannelClosed("serial sender"))
        }
    }

    fn mode() -> (LightMode<Arc<RecordingSink>>, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::default());
        (LightMode::new(Arc::clone(&sink), 8), sink)
    }

    #[test]
    fn test_idle_ticks_are_deduplicated() {
        let (mut mode, sink) = mode();
        mode.advance();
        mode.advance();
        assert_eq!(sink.sent(), vec![SerialCommand::OFF]);
        assert_eq!(mode.tick(), 2);
    }

    #[test]
    fn test_toggle_power_sends_scaled_state() {
        let (mut mode, sink) = mode();
        mode.handle_command(Command::SetColor(ColorRGBW::new(255, 0, 0, 0)));
        mode.handle_command(Command::SetBrightness(128));
        mode.handle_command(Command::TogglePower);
        assert_eq!(sink.sent().last(), Some(&SerialCommand::new(128, 0, 0, 0)));

        mode.handle_command(Command::TogglePower);
        assert_eq!(sink.sent().last(), Some(&SerialCommand::OFF));
    }

    #[test]
    fn test_brightness_commands_clamp() {
        let (mut mode, _sink) = mode();
        for _ in 0..40 {
            mode.handle_command(Command::IncreaseBrightness);
        }
        assert_eq!(mode.light().brightness(), 255);
        mode.handle_command(Command::AdjustBrightness(i32::MIN));
        assert_eq!(mode.light().brightness(), 0);
        mode.handle_command(Command::DecreaseBrightness);
        assert_eq!(mode.light().brightness(), 0);
        mode.handle_command(Command::SetBrightness(9000));
        assert_eq!(mode.light().brightness(), 255);
    }

    #[test]
    fn test_unknown_effect_keeps_current() {
        let (mut mode, _sink) = mode();
        mode.handle_command(Command::SelectEffect("Rainbow".into()));
        mode.handle_command(Command::SelectEffect("not-a-real-effect".into()));
        assert_eq!(mode.light().active_effect(), Some(Effect::Rainbow));
    }

    #[test]
    fn test_animated_effect_updates_while_on() {
        let (mut mode, sink) = mode();
        mode.handle_command(Command::select_effect(Effect::ColorfadeFast));
        mode.handle_command(Command::SetPower(true));
        let before = sink.sent().len();
        for _ in 0..10 {
            mode.advance();
        }
        assert_eq!(sink.sent().len(), before + 10);

        mode.handle_command(Command::SetPower(false));
        let before = sink.sent().len();
        for _ in 0..10 {
            mode.advance();
        }
        assert_eq!(sink.sent().len(), before);
    }

    #[test]
    fn test_closed_sink_does_not_retry() {
        let mut mode = LightMode::new(ClosedSink, 8);
        mode.handle_command(Command::TogglePower);
        mode.advance();
        assert!(mode.last_transmitted().unwrap().power());
    }
}
