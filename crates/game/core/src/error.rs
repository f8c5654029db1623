//! Common error infrastructure for game-core.
//!
//! The combat and timer paths never fail: a system that does not apply returns
//! `None`, and undeliverable effects are dropped. Errors only exist at the
//! edges where callers hand the core identifiers it may not know about
//! (upgrade ids, offer slots, stat names coming from content files).
//!
//! # Design Principles
//!
//! - **Type Safety**: Each surface has its own error type with specific variants
//! - **Severity Classification**: Errors are categorized for recovery strategies
//! - **No Panics**: Nothing here is expected to abort a running session

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: Temporary conditions that may succeed on retry or with alternative input
/// - **Validation**: Invalid input that should be rejected without retry
/// - **Internal**: Unexpected state inconsistencies that require investigation
/// - **Fatal**: Unrecoverable errors indicating corrupted game state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - can retry with same or alternative input.
    ///
    /// Examples: no upgrade offer pending yet
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: unknown upgrade id, offer slot out of range
    Validation,

    /// Internal error - unexpected state inconsistency.
    Internal,

    /// Fatal error - game state corrupted, cannot continue.
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all game-core errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Default implementation uses the error type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Errors raised when acquiring or offering upgrades.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum UpgradeError {
    /// The catalog has no upgrade with this id.
    #[error("unknown upgrade id `{0}`")]
    UnknownUpgrade(String),

    /// An offer was chosen while none was pending.
    #[error("no upgrade offer is pending")]
    NoPendingOffer,

    /// The chosen slot does not exist in the pending offer.
    #[error("offer slot {index} is out of range (offer has {len} choices)")]
    OfferSlotOutOfRange { index: usize, len: usize },
}

impl GameError for UpgradeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownUpgrade(_) => ErrorSeverity::Validation,
            Self::NoPendingOffer => ErrorSeverity::Recoverable,
            Self::OfferSlotOutOfRange { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownUpgrade(_) => "UPGRADE_UNKNOWN",
            Self::NoPendingOffer => "UPGRADE_NO_PENDING_OFFER",
            Self::OfferSlotOutOfRange { .. } => "UPGRADE_SLOT_OUT_OF_RANGE",
        }
    }
}

impl GameError for strum::ParseError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        "STAT_KEY_UNKNOWN"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upgrade_errors_are_classified() {
        assert_eq!(
            UpgradeError::UnknownUpgrade("x".into()).severity(),
            ErrorSeverity::Validation
        );
        assert!(UpgradeError::NoPendingOffer.severity().is_recoverable());
        assert_eq!(
            UpgradeError::OfferSlotOutOfRange { index: 4, len: 3 }.to_string(),
            "offer slot 4 is out of range (offer has 3 choices)"
        );
    }
}
