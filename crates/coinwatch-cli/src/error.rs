use thiserror::Error;

use crate::form::FormError;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Form(#[from] FormError),

    #[error(transparent)]
    Command(#[from] coinwatch_core::AuthCommandError),

    #[error(transparent)]
    Validation(#[from] coinwatch_core::AuthError),

    #[error("logging setup failed: {0}")]
    Logging(String),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Form(_) => 2,
            Self::Command(_) => 2,
            Self::Validation(_) => 2,
            Self::Serialization(_) => 4,
            Self::Logging(_) => 10,
            Self::Io(_) => 10,
        }
    }
}
