use thiserror::Error;

use marketmood_core::{ConfigError, MailError};

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Delivery failed after the report was already printed.
    #[error("report delivery failed: {0}")]
    Delivery(#[from] MailError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 2,
            Self::Delivery(_) => 4,
            Self::Io(_) => 10,
        }
    }
}
