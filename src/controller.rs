//! The fixed-tick control loop.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use log::{debug, warn};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use crate::command::Command;
use crate::config::ControllerConfig;
use crate::errors::Error;
use crate::light::Light;
use crate::mode::{LightMode, Mode};
use crate::queue::{CommandQueue, CommandSender, command_queue};
use crate::serial::CommandSink;

type Result<T> = std::result::Result<T, Error>;

/// Owns the control loop and the entry point for input commands.
///
/// The loop runs on its own task. Each tick it drains the command queue
/// into the mode, advances the mode once, and publishes a snapshot of the
/// light. Stopping is cooperative: the loop finishes its current tick first.
///
/// # Example
///
/// ```ignore
/// let (link, _device) = tokio::io::duplex(64);
/// let serial = SerialClient::start(link);
/// let mut controller = Controller::start(&ControllerConfig::default(), serial);
/// controller.add_input_command(Command::TogglePower)?;
/// controller.stop().await;
/// ```
#[derive(Debug)]
pub struct Controller {
    commands: CommandSender,
    running: Arc<AtomicBool>,
    status: watch::Receiver<Light>,
    task: Option<JoinHandle<()>>,
}

impl Controller {
    /// Start the standard [`LightMode`] over `sink`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start<S>(config: &ControllerConfig, sink: S) -> Self
    where
        S: CommandSink + Send + 'static,
    {
        Self::with_mode(config, LightMode::new(sink, config.brightness_step))
    }

    /// Start the loop around any mode.
    pub fn with_mode<M>(config: &ControllerConfig, mode: M) -> Self
    where
        M: Mode + Send + 'static,
    {
        let (commands, queue) = command_queue();
        let (status_tx, status) = watch::channel(mode.light().clone());
        let running = Arc::new(AtomicBool::new(true));

        let task = tokio::spawn(control_loop(
            mode,
            queue,
            Arc::clone(&running),
            status_tx,
            config.tick_period(),
        ));

        Controller {
            commands,
            running,
            status,
            task: Some(task),
        }
    }

    /// Queue a command from any thread; never blocks.
    pub fn add_input_command(&self, command: Command) -> Result<()> {
        self.commands.enqueue(command)
    }

    /// Another producer handle for the same queue.
    pub fn sender(&self) -> CommandSender {
        self.commands.clone()
    }

    /// Receiver of light snapshots, updated whenever a tick changes the light.
    pub fn subscribe(&self) -> watch::Receiver<Light> {
        self.status.clone()
    }

    /// The light as of the last completed tick.
    pub fn light(&self) -> Light {
        self.status.borrow().clone()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Ask the loop to exit after its current tick and wait for it.
    pub async fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(task) = self.task.take()
            && let Err(e) = task.await
        {
            warn!("Control loop ended abnormally: {e}");
        }
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

async fn control_loop<M: Mode>(
    mut mode: M,
    mut queue: CommandQueue,
    running: Arc<AtomicBool>,
    status: watch::Sender<Light>,
    period: Duration,
) {
    let mut ticker = time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    debug!("Control loop started with {period:?} ticks");

    loop {
        ticker.tick().await;
        if !running.load(Ordering::SeqCst) {
            break;
        }
        for command in queue.drain_all() {
            mode.handle_command(command);
        }
        mode.advance();

        let light = mode.light();
        status.send_if_modified(|current| {
            if *current == *light {
                return false;
            }
            *current = light.clone();
            true
        });
    }
    debug!("Control loop stopped");
}
