//! Serial protocol client for the fixture's microcontroller.
//!
//! Frame format: `[0x3A] [tag] [payload_len] [r g b w] [cs_hi] [cs_lo]`.
//! The checksum is the 16-bit big-endian sum of all preceding bytes.

use std::sync::{Arc, Mutex, PoisonError};

use log::{debug, error};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;

use crate::errors::Error;
use crate::history::{FrameHistory, SerialDiagnostics};

type Result<T> = std::result::Result<T, Error>;

pub const FRAME_START: u8 = 0x3A;
pub const TAG_SOLID_APPEARANCE: u8 = 0x01;
pub const PAYLOAD_LEN: usize = 4;
pub const FRAME_LEN: usize = 3 + PAYLOAD_LEN + 2;

/// 16-bit big-endian checksum of all bytes.
fn checksum(data: &[u8]) -> [u8; 2] {
    let sum = data
        .iter()
        .fold(0u16, |acc, &b| acc.wrapping_add(b as u16));
    sum.to_be_bytes()
}

/// Four resolved channel intensities, ready for the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SerialCommand {
    red: u8,
    green: u8,
    blue: u8,
    white: u8,
}

impl SerialCommand {
    pub const OFF: SerialCommand = SerialCommand::new(0, 0, 0, 0);

    pub const fn new(red: u8, green: u8, blue: u8, white: u8) -> Self {
        Self {
            red,
            green,
            blue,
            white,
        }
    }

    pub fn red(&self) -> u8 {
        self.red
    }

    pub fn green(&self) -> u8 {
        self.green
    }

    pub fn blue(&self) -> u8 {
        self.blue
    }

    pub fn white(&self) -> u8 {
        self.white
    }

    pub fn channels(&self) -> [u8; 4] {
        [self.red, self.green, self.blue, self.white]
    }

    /// Encode as one complete wire frame.
    pub fn encode(&self) -> [u8; FRAME_LEN] {
        let mut frame = [0u8; FRAME_LEN];
        frame[0] = FRAME_START;
        frame[1] = TAG_SOLID_APPEARANCE;
        frame[2] = PAYLOAD_LEN as u8;
        frame[3..7].copy_from_slice(&self.channels());
        let cs = checksum(&frame[..7]);
        frame[7..].copy_from_slice(&cs);
        frame
    }

    /// Parse a single frame, validating header and checksum.
    pub fn decode(frame: &[u8]) -> Result<Self> {
        if frame.len() != FRAME_LEN {
            return Err(Error::InvalidFrame(format!(
                "expected {FRAME_LEN} bytes, got {}",
                frame.len()
            )));
        }
        if frame[0] != FRAME_START || frame[1] != TAG_SOLID_APPEARANCE {
            return Err(Error::invalid_frame("unknown header"));
        }
        if frame[2] as usize != PAYLOAD_LEN {
            return Err(Error::invalid_frame("bad payload length"));
        }
        if checksum(&frame[..7]) != frame[7..] {
            return Err(Error::invalid_frame("checksum mismatch"));
        }
        Ok(Self::new(frame[3], frame[4], frame[5], frame[6]))
    }
}

/// Anything that accepts serial commands for transmission.
///
/// Implementations must keep submission order and must not block.
pub trait CommandSink {
    fn add_command(&self, command: SerialCommand) -> Result<()>;
}

impl<S: CommandSink + ?Sized> CommandSink for Arc<S> {
    fn add_command(&self, command: SerialCommand) -> Result<()> {
        (**self).add_command(command)
    }
}

/// Sends frames to the microcontroller from a dedicated task.
///
/// Cloning yields another handle to the same link; the sender task stops
/// once every handle is dropped.
#[derive(Debug, Clone)]
pub struct SerialClient {
    tx: mpsc::UnboundedSender<SerialCommand>,
    history: Arc<Mutex<FrameHistory>>,
}

impl SerialClient {
    /// Start the sender task over an already opened link.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start<W>(link: W) -> Self
    where
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let history = Arc::new(Mutex::new(FrameHistory::new()));
        tokio::spawn(transmit(link, rx, Arc::clone(&history)));
        Self { tx, history }
    }

    pub fn diagnostics(&self) -> SerialDiagnostics {
        self.lock_history().summary()
    }

    pub fn history(&self) -> FrameHistory {
        self.lock_history().clone()
    }

    pub fn clear_history(&self) {
        self.lock_history().clear();
    }

    fn lock_history(&self) -> std::sync::MutexGuard<'_, FrameHistory> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CommandSink for SerialClient {
    fn add_command(&self, command: SerialCommand) -> Result<()> {
        self.tx
            .send(command)
            .map_err(|_| Error::ChannelClosed("serial sender"))
    }
}

async fn transmit<W>(
    mut link: W,
    mut rx: mpsc::UnboundedReceiver<SerialCommand>,
    history: Arc<Mutex<FrameHistory>>,
) where
    W: AsyncWrite + Unpin,
{
    while let Some(command) = rx.recv().await {
        let result = write_frame(&mut link, &command.encode()).await;
        let mut record = history.lock().unwrap_or_else(PoisonError::into_inner);
        match result {
            Ok(()) => record.record_sent(command),
            Err(e) => {
                // Not retried: the next state change produces a fresh frame.
                error!("Failed to send {command:?}: {e}");
                record.record_error(command, &e.to_string());
            }
        }
    }
    debug!("Serial sender stopped");
}

async fn write_frame<W>(link: &mut W, frame: &[u8]) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    link.write_all(frame)
        .await
        .map_err(|e| Error::serial("write", e))?;
    link.flush().await.map_err(|e| Error::serial("flush", e))
}
