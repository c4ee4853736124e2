// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F.

//! Token labels consumed by pattern detection.
//!
//! An upstream classification stage discretizes each bias-axis score into a
//! label of the form `{level}_{axis}` (for example `high_escalation`). The
//! detector compares labels by exact, case-sensitive string equality and
//! attaches no further meaning to them.
//!
//! Two axis spellings exist. The evaluator scores the axes in
//! [`BIAS_AXES`] (`user_invalidation`, `refusals`, ...), while pattern
//! sequences, including the built-in ones, use the short forms in
//! [`PATTERN_AXES`] (`invalidation`, `refusal`, ...) plus [`ANY_AXIS`] for
//! the aggregate over all axes. Map an evaluator axis with [`pattern_axis`]
//! before building its token:
//!
//! ```
//! use sentinel::common::token::{axis_token, pattern_axis, Level};
//!
//! let axis = pattern_axis("asymmetric_coverage").unwrap();
//! assert_eq!(axis_token(Level::High, axis), "high_asymmetric");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// The bias axes scored by the upstream evaluator.
pub const BIAS_AXES: [&str; 5] = [
    "user_invalidation",
    "escalation",
    "personal_expression",
    "asymmetric_coverage",
    "refusals",
];

/// Axis spellings used in pattern sequences, index-aligned with [`BIAS_AXES`].
pub const PATTERN_AXES: [&str; 5] = [
    "invalidation",
    "escalation",
    "personal_expression",
    "asymmetric",
    "refusal",
];

/// Pseudo-axis for a level aggregated over every axis.
pub const ANY_AXIS: &str = "bias_any";

/// Discretized severity level of one axis score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Low severity.
    Low,
    /// Medium severity.
    Medium,
    /// High severity.
    High,
}

impl Level {
    /// All levels, lowest first.
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    /// Label prefix for this level.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Short pattern spelling of an evaluator axis, or `None` if `axis` is not
/// in [`BIAS_AXES`].
#[must_use]
pub fn pattern_axis(axis: &str) -> Option<&'static str> {
    BIAS_AXES
        .iter()
        .position(|&a| a == axis)
        .map(|i| PATTERN_AXES[i])
}

/// Builds the `{level}_{axis}` token for one axis observation.
///
/// `axis` is used verbatim; pass a [`PATTERN_AXES`] entry or [`ANY_AXIS`]
/// for tokens that the built-in patterns recognize.
///
/// ```
/// use sentinel::common::token::{axis_token, Level};
///
/// assert_eq!(axis_token(Level::High, "escalation"), "high_escalation");
/// ```
#[must_use]
pub fn axis_token(level: Level, axis: &str) -> String {
    let mut token = String::with_capacity(level.as_str().len() + 1 + axis.len());
    token.push_str(level.as_str());
    token.push('_');
    token.push_str(axis);
    token
}
