//! Core error taxonomy for game commands.

use derive_more::{Display, Error};

use crate::db::DbError;

/// Expected, caller-recoverable failure of a game command.
///
/// The first three variants map 1:1 to transport status codes (404, 403,
/// 409). `Db` carries an unexpected persistence failure and is propagated
/// unmodified.
#[derive(Debug, Clone, Display, Error)]
pub enum GameError {
    /// Entity does not exist.
    #[display("{reason}")]
    NotFound {
        /// Human-readable reason.
        reason: String,
    },
    /// Actor lacks standing for the action.
    #[display("{reason}")]
    Forbidden {
        /// Human-readable reason.
        reason: String,
    },
    /// Action violates a state or uniqueness rule.
    #[display("{reason}")]
    Conflict {
        /// Human-readable reason.
        reason: String,
    },
    /// Underlying persistence failure.
    #[display("{source}")]
    Db {
        /// The database error.
        source: DbError,
    },
}

impl GameError {
    /// Creates a not-found verdict.
    pub fn not_found(reason: impl Into<String>) -> Self {
        Self::NotFound {
            reason: reason.into(),
        }
    }

    /// Creates a forbidden verdict.
    pub fn forbidden(reason: impl Into<String>) -> Self {
        Self::Forbidden {
            reason: reason.into(),
        }
    }

    /// Creates a conflict verdict.
    pub fn conflict(reason: impl Into<String>) -> Self {
        Self::Conflict {
            reason: reason.into(),
        }
    }
}

impl From<DbError> for GameError {
    fn from(source: DbError) -> Self {
        Self::Db { source }
    }
}

// Lets game commands run inside `diesel` transactions, which require the
// closure error type to absorb rollback failures.
impl From<diesel::result::Error> for GameError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        Self::Db {
            source: DbError::from(err),
        }
    }
}
