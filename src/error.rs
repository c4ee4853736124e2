// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F.

//! Error types for governor construction and pattern registration.
//!
//! Every variant signals caller misuse detected synchronously at the point
//! of the call. None of them are transient and none are retried. Normal
//! throttling is not an error: [`CallGovernor::acquire`] blocks instead.
//!
//! [`CallGovernor::acquire`]: crate::governor::CallGovernor::acquire

/// Invalid governor configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// `capacity` was zero.
    #[error("capacity must be positive, got {capacity}")]
    NonPositiveCapacity { capacity: usize },

    /// `window` was zero.
    #[error("window must be a positive duration")]
    NonPositiveWindow,

    /// A config document could not be decoded.
    #[error("invalid governor config: {reason}")]
    Parse { reason: String },
}

/// Pattern registration and lookup errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum RegistryError {
    /// A pattern with this name exists; the registry is unchanged.
    #[error("pattern '{name}' already registered")]
    DuplicateName { name: String },

    /// The token sequence was empty.
    #[error("pattern '{name}' has an empty sequence")]
    EmptySequence { name: String },

    /// The match cap was `Limited(0)`.
    #[error("pattern '{name}' has max_matches = 0; use a positive cap or unlimited")]
    InvalidMaxMatches { name: String },

    /// `reset` named a pattern that was never registered.
    #[error("pattern '{name}' is not registered")]
    UnknownPattern { name: String },

    /// A catalog document could not be decoded.
    #[error("invalid pattern catalog: {reason}")]
    Catalog { reason: String },
}

impl RegistryError {
    /// Returns true for the errors that reject a malformed pattern definition
    /// (empty sequence or a zero match cap).
    #[must_use]
    pub const fn is_invalid_pattern(&self) -> bool {
        matches!(
            self,
            Self::EmptySequence { .. } | Self::InvalidMaxMatches { .. }
        )
    }
}
