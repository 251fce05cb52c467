//! Multi-producer command queue feeding the control loop.

use std::iter;

use tokio::sync::mpsc;

use crate::command::Command;
use crate::errors::Error;

type Result<T> = std::result::Result<T, Error>;

/// Create a connected producer handle and consumer queue.
///
/// The sender can be cloned freely and used from plain threads as well as
/// async tasks; enqueueing never blocks.
pub fn command_queue() -> (CommandSender, CommandQueue) {
    let (tx, rx) = mpsc::unbounded_channel();
    (CommandSender { tx }, CommandQueue { rx })
}

/// Producer side of the command queue.
#[derive(Debug, Clone)]
pub struct CommandSender {
    tx: mpsc::UnboundedSender<Command>,
}

impl CommandSender {
    /// Queue a command without waiting.
    ///
    /// Only fails once the consuming [`CommandQueue`] has been dropped.
    pub fn enqueue(&self, command: Command) -> Result<()> {
        self.tx
            .send(command)
            .map_err(|_| Error::ChannelClosed("command queue"))
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Consumer side of the command queue, owned by the control loop.
#[derive(Debug)]
pub struct CommandQueue {
    rx: mpsc::UnboundedReceiver<Command>,
}

impl CommandQueue {
    pub fn try_dequeue(&mut self) -> Option<Command> {
        self.rx.try_recv().ok()
    }

    /// Take every command queued right now, oldest first.
    pub fn drain_all(&mut self) -> Vec<Command> {
        iter::from_fn(|| self.try_dequeue()).collect()
    }
}
