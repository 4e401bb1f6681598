use thiserror::Error;

use crate::data_aquisition::ssh::SshError;

#[derive(Debug, Error)]
pub enum ReaderError {
    /// Malformed connection string or missing option.
    #[error("configuration error: {0}")]
    Config(String),
    /// Session establishment or command execution failed.
    #[error("transport error on {device}: {source}")]
    Transport {
        device: String,
        #[source]
        source: SshError,
    },
    /// The command output did not have the expected shape.
    #[error("cannot decode output of '{command}': {reason}")]
    Decode { command: String, reason: String },
    #[error("cannot write report: {0}")]
    Output(#[from] std::io::Error),
}

impl ReaderError {
    pub fn transport(device: impl Into<String>, source: SshError) -> Self {
        Self::Transport {
            device: device.into(),
            source,
        }
    }

    pub fn decode(command: &str, reason: impl ToString) -> Self {
        Self::Decode {
            command: command.to_string(),
            reason: reason.to_string(),
        }
    }
}
