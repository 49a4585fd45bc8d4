/// Errors raised while reading and executing a script
use std::io;

pub type Result<T> = std::result::Result<T, Error>;

/// Every failure is fatal to the script run that raised it.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("script source unreadable: {source}")]
    UnreadableSource {
        #[source]
        source: io::Error,
    },

    #[error("line {line}: malformed arguments for `{command}`: {reason}")]
    MalformedArgumentLine {
        line: usize,
        command: &'static str,
        reason: String,
    },

    #[error("tessellation steps must be between {min} and {max}, got {steps}")]
    InvalidTessellationStep { steps: usize, min: usize, max: usize },

    #[error("line {line}: unsupported rotation axis '{axis}' (expected x, y or z)")]
    UnsupportedRotationAxis { line: usize, axis: char },

    #[error("line {line}: unknown command `{token}`")]
    UnknownCommand { line: usize, token: String },

    #[error("{operation} failed: {source}")]
    CollaboratorFailure {
        operation: &'static str,
        #[source]
        source: io::Error,
    },
}

impl Error {
    pub fn malformed(line: usize, command: &'static str, reason: impl Into<String>) -> Self {
        Self::MalformedArgumentLine {
            line,
            command,
            reason: reason.into(),
        }
    }

    pub fn collaborator(operation: &'static str, source: io::Error) -> Self {
        Self::CollaboratorFailure { operation, source }
    }
}
