//! Errors surfaced by session operations.

use game_core::{ErrorSeverity, GameError, UpgradeError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SessionError>;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error(transparent)]
    Upgrade(#[from] UpgradeError),
}

impl GameError for SessionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Upgrade(err) => err.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Upgrade(err) => err.error_code(),
        }
    }
}
