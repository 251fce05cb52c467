/// All error types that can occur while driving the fixture.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Failed to serialize data to JSON.
    #[error("failed to dump json: {0:?}")]
    JsonDump(serde_json::Error),

    /// Failed to deserialize JSON data.
    #[error("failed to load json: {0:?}")]
    JsonLoad(serde_json::Error),

    /// A write to the serial link failed.
    #[error("serial {action} error: {err:?}")]
    Serial { action: String, err: std::io::Error },

    /// The receiving side of an internal channel is gone.
    #[error("{0} channel is closed")]
    ChannelClosed(&'static str),

    /// A byte sequence is not a valid wire frame.
    #[error("invalid frame: {0}")]
    InvalidFrame(String),

    /// Failed to parse a [`crate::ColorRGBW`] from a string.
    #[error("invalid color string: {0}")]
    InvalidColorString(String),
}

impl Error {
    /// Create a new serial error
    pub fn serial(action: &str, err: std::io::Error) -> Self {
        Error::Serial {
            action: action.to_string(),
            err,
        }
    }

    /// Create a new invalid frame error
    pub fn invalid_frame(reason: &str) -> Self {
        Error::InvalidFrame(reason.to_string())
    }
}

/// Hacky implementation of PartialEq for testing
#[cfg(test)]
impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}
