use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] rewind_core::ValidationError),

    #[error("command error: {0}")]
    Command(String),

    #[error(transparent)]
    Source(#[from] rewind_core::SourceError),

    #[error("no snapshot could be shown for {date}")]
    NothingDisplayed { date: rewind_core::TradingDate },

    #[error(transparent)]
    Controller(#[from] rewind_core::ControllerClosed),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Command(_) => 2,
            Self::Source(_) => 3,
            Self::NothingDisplayed { .. } => 3,
            Self::Controller(_) => 6,
            Self::Io(_) => 10,
        }
    }
}
