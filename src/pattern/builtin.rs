// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F.

//! Built-in bias-dynamics patterns.
//!
//! | Name | Sequence | Priority | Category | Cap |
//! |------|----------|----------|----------|-----|
//! | `tone_shift_hostile` | `low_escalation` `medium_escalation` `high_escalation` | 2 | `tone_patterns` | 5 |
//! | `passive_refusal` | `medium_refusal` `high_asymmetric` | 2 | `refusal_patterns` | 5 |
//! | `cultural_bias_accumulation` | `high_asymmetric` `high_asymmetric` `high_personal_expression` | 3 | `cultural_patterns` | 3 |
//! | `invalidation_cascade` | `high_invalidation` `high_invalidation` | 3 | `invalidation_patterns` | 3 |
//! | `bias_recovery` | `high_bias_any` `medium_bias_any` `low_bias_any` | 1 | `recovery_patterns` | 10 |
//!
//! Sequences use the short axis spellings of
//! [`PATTERN_AXES`](crate::common::token::PATTERN_AXES) and
//! [`ANY_AXIS`](crate::common::token::ANY_AXIS), not the evaluator's
//! [`BIAS_AXES`](crate::common::token::BIAS_AXES) names; map the latter with
//! [`pattern_axis`](crate::common::token::pattern_axis) when building tokens.
//!
//! Each fires [`log_detection`] unless installed with a custom callback via
//! [`register_builtin_patterns_with`].

use crate::error::RegistryError;
use crate::pattern::registry::{MatchCap, MatchInfo, PatternCallback, PatternDef, PatternRegistry};

/// Static description of one built-in pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltinPattern {
    /// Pattern name.
    pub name: &'static str,
    /// Token sequence.
    pub sequence: &'static [&'static str],
    /// Evaluation priority.
    pub priority: i32,
    /// Grouping label.
    pub category: &'static str,
    /// Match cap.
    pub max_matches: usize,
}

/// The built-in patterns, in registration order.
pub const BUILTIN_PATTERNS: [BuiltinPattern; 5] = [
    BuiltinPattern {
        name: "tone_shift_hostile",
        sequence: &["low_escalation", "medium_escalation", "high_escalation"],
        priority: 2,
        category: "tone_patterns",
        max_matches: 5,
    },
    BuiltinPattern {
        name: "passive_refusal",
        sequence: &["medium_refusal", "high_asymmetric"],
        priority: 2,
        category: "refusal_patterns",
        max_matches: 5,
    },
    BuiltinPattern {
        name: "cultural_bias_accumulation",
        sequence: &[
            "high_asymmetric",
            "high_asymmetric",
            "high_personal_expression",
        ],
        priority: 3,
        category: "cultural_patterns",
        max_matches: 3,
    },
    BuiltinPattern {
        name: "invalidation_cascade",
        sequence: &["high_invalidation", "high_invalidation"],
        priority: 3,
        category: "invalidation_patterns",
        max_matches: 3,
    },
    BuiltinPattern {
        name: "bias_recovery",
        sequence: &["high_bias_any", "medium_bias_any", "low_bias_any"],
        priority: 1,
        category: "recovery_patterns",
        max_matches: 10,
    },
];

/// Default callback: one `info` event per detection.
pub fn log_detection(name: &str, sequence: &[String], info: MatchInfo) {
    tracing::info!(
        pattern = name,
        start = info.start,
        end = info.end,
        "pattern detected at {}-{}: {}",
        info.start,
        info.end,
        sequence.join(" → ")
    );
}

/// Registers every built-in pattern with [`log_detection`] as callback.
pub fn register_builtin_patterns(registry: &mut PatternRegistry) -> Result<(), RegistryError> {
    register_builtin_patterns_with(registry, |_| log_detection)
}

/// Registers every built-in pattern with a callback built per pattern.
///
/// Stops at the first failure (typically a name already registered);
/// patterns registered before it stay registered.
pub fn register_builtin_patterns_with<F, C>(
    registry: &mut PatternRegistry,
    mut make_callback: F,
) -> Result<(), RegistryError>
where
    F: FnMut(&BuiltinPattern) -> C,
    C: PatternCallback + 'static,
{
    for builtin in &BUILTIN_PATTERNS {
        registry.register(
            PatternDef::new(
                builtin.name,
                builtin.sequence.iter().copied(),
                make_callback(builtin),
            )
            .priority(builtin.priority)
            .category(builtin.category)
            .max_matches(MatchCap::Limited(builtin.max_matches)),
        )?;
    }
    Ok(())
}

impl PatternRegistry {
    /// A registry pre-loaded with the built-in patterns.
    #[must_use]
    pub fn with_builtin_patterns() -> Self {
        let mut registry = Self::new();
        // Names are distinct and sequences non-empty, so loading into a
        // fresh registry cannot fail.
        let loaded = register_builtin_patterns(&mut registry);
        debug_assert!(loaded.is_ok(), "built-in patterns rejected: {loaded:?}");
        registry
    }
}
