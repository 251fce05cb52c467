//! # rgbw_light_controller
//!
//! Real-time control of an RGBW light fixture driven over a serial link.
//!
//! Commands arrive from any number of producers (a rotary/button control, a
//! smart-home bridge) and are queued without blocking. A control loop running
//! on a fixed tick drains the queue into a mode state machine, which keeps the
//! authoritative light state and sends a serial frame whenever the rendered
//! state actually changes.
//!
//! ## Quick Start
//!
//! ```ignore
//! use rgbw_light_controller::{Command, Controller, ControllerConfig, SerialClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Any AsyncWrite works as the link; open the real port however you like
//!     let port = open_serial_port("/dev/ttyUSB0")?;
//!     let serial = SerialClient::start(port);
//!
//!     let mut controller = Controller::start(&ControllerConfig::default(), serial);
//!     controller.add_input_command(Command::TogglePower)?;
//!     controller.add_input_command(Command::SelectEffect("Rainbow".into()))?;
//!
//!     controller.stop().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Command queue**: lock-free fan-in from threads and tasks via [`CommandSender`]
//! - **Fixed tick loop**: [`Controller`] drains, advances and publishes every tick
//! - **Light model**: four channels, brightness, power and a closed [`Effect`] set on [`Light`]
//! - **Effects**: Solid, Rainbow, Breath, colorfade (slow/fast) and flash animations
//! - **Deduplicated output**: identical states are never re-sent to the fixture
//! - **Serial framing**: checksummed frames written in order by [`SerialClient`]
//! - **Bridge adapter**: JSON command/state payloads through [`BridgeAdapter`]
//! - **Input devices**: rotary/button events mapped by [`InputEvent`]
//!
//! ## Wire format
//!
//! Each state change becomes one 9-byte frame:
//! `[0x3A] [0x01] [0x04] [r] [g] [b] [w] [cs_hi] [cs_lo]`, where the checksum is
//! the big-endian 16-bit sum of the first seven bytes.

mod animation;
mod bridge;
mod command;
mod config;
mod controller;
mod errors;
mod history;
pub mod input;
mod light;
pub mod mode;
mod queue;
pub mod serial;
mod status;
mod types;

// Re-export public API
pub use animation::render;
pub use bridge::{BridgeAdapter, BridgeColor, BridgeCommand};
pub use command::Command;
pub use config::{BridgeConfig, ControllerConfig};
pub use controller::Controller;
pub use errors::Error;
pub use history::{FrameEntry, FrameHistory, FrameOutcome, SerialDiagnostics};
pub use input::InputEvent;
pub use light::Light;
pub use mode::{LightMode, Mode};
pub use queue::{CommandQueue, CommandSender, command_queue};
pub use serial::{CommandSink, SerialClient, SerialCommand};
pub use status::LightStatus;
pub use types::{ColorRGBW, Effect, PowerMode};
