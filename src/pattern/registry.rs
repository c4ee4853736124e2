// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F.

//! Pattern definitions and the registry that owns them.
//!
//! A pattern is a named, fixed-length sequence of token labels plus the
//! callback to fire when the sequence appears contiguously in a stream.
//! The registry enforces unique names and keeps patterns in evaluation
//! order: descending priority, registration order among equal priorities.
//! Ordering is settled at insert time so detection needs no sort.

use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

use crate::error::RegistryError;

/// Position of one match in the scanned stream.
///
/// `end` is exclusive: the matched tokens are `stream[start..end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchInfo {
    /// Index of the first matched token.
    pub start: usize,
    /// One past the index of the last matched token.
    pub end: usize,
}

/// Receiver of pattern matches.
///
/// Implemented for every `FnMut(&str, &[String], MatchInfo) + Send`, so a
/// closure is the usual callback; a struct implementing the trait works
/// when the receiver needs its own state or a name in backtraces.
pub trait PatternCallback: Send {
    /// Called once per dispatched match, synchronously, during detection.
    fn on_match(&mut self, name: &str, sequence: &[String], info: MatchInfo);
}

impl<F> PatternCallback for F
where
    F: FnMut(&str, &[String], MatchInfo) + Send,
{
    fn on_match(&mut self, name: &str, sequence: &[String], info: MatchInfo) {
        self(name, sequence, info);
    }
}

/// Upper bound on how many times a pattern may fire.
///
/// Serialized as a plain integer or the string `"unlimited"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchCap {
    /// At most this many matches. Zero is rejected at registration.
    Limited(usize),
    /// No bound.
    Unlimited,
}

impl MatchCap {
    /// Returns true while `seen` matches leave room for another.
    #[must_use]
    #[inline]
    pub const fn allows(self, seen: usize) -> bool {
        match self {
            Self::Limited(max) => seen < max,
            Self::Unlimited => true,
        }
    }

    const fn is_valid(self) -> bool {
        !matches!(self, Self::Limited(0))
    }
}

impl Default for MatchCap {
    fn default() -> Self {
        Self::Limited(1)
    }
}

impl fmt::Display for MatchCap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Limited(max) => write!(f, "{max}"),
            Self::Unlimited => f.write_str(UNLIMITED),
        }
    }
}

const UNLIMITED: &str = "unlimited";

impl Serialize for MatchCap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Limited(max) => serializer.serialize_u64(*max as u64),
            Self::Unlimited => serializer.serialize_str(UNLIMITED),
        }
    }
}

impl<'de> Deserialize<'de> for MatchCap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CapVisitor;

        impl Visitor<'_> for CapVisitor {
            type Value = MatchCap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a non-negative integer or the string \"unlimited\"")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<MatchCap, E> {
                usize::try_from(v)
                    .map(MatchCap::Limited)
                    .map_err(|_| E::invalid_value(de::Unexpected::Unsigned(v), &self))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<MatchCap, E> {
                usize::try_from(v)
                    .map(MatchCap::Limited)
                    .map_err(|_| E::invalid_value(de::Unexpected::Signed(v), &self))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<MatchCap, E> {
                if v == UNLIMITED {
                    Ok(MatchCap::Unlimited)
                } else {
                    Err(E::invalid_value(de::Unexpected::Str(v), &self))
                }
            }
        }

        deserializer.deserialize_any(CapVisitor)
    }
}

/// A pattern definition awaiting registration.
///
/// ```
/// use sentinel::pattern::registry::{MatchCap, MatchInfo, PatternDef, PatternRegistry};
///
/// let mut registry = PatternRegistry::new();
/// registry
///     .register(
///         PatternDef::new("tone", ["low", "medium", "high"], |_: &str, _: &[String], _: MatchInfo| {})
///             .priority(2)
///             .category("tone_patterns")
///             .max_matches(MatchCap::Limited(5)),
///     )
///     .unwrap();
/// assert_eq!(registry.len(), 1);
/// ```
pub struct PatternDef {
    name: String,
    sequence: Vec<String>,
    callback: Box<dyn PatternCallback>,
    priority: i32,
    category: Option<String>,
    max_matches: MatchCap,
}

impl PatternDef {
    /// Starts a definition with priority 0, no category and a cap of 1.
    pub fn new<N, I, T, F>(name: N, sequence: I, callback: F) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = T>,
        T: Into<String>,
        F: PatternCallback + 'static,
    {
        Self {
            name: name.into(),
            sequence: sequence.into_iter().map(Into::into).collect(),
            callback: Box::new(callback),
            priority: 0,
            category: None,
            max_matches: MatchCap::default(),
        }
    }

    /// Higher priorities are evaluated first.
    #[must_use]
    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Grouping label used by [`PatternRegistry::list`].
    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Match cap.
    #[must_use]
    pub fn max_matches(mut self, cap: MatchCap) -> Self {
        self.max_matches = cap;
        self
    }

    fn validate(&self) -> Result<(), RegistryError> {
        if self.sequence.is_empty() {
            return Err(RegistryError::EmptySequence {
                name: self.name.clone(),
            });
        }
        if !self.max_matches.is_valid() {
            return Err(RegistryError::InvalidMaxMatches {
                name: self.name.clone(),
            });
        }
        Ok(())
    }
}

impl fmt::Debug for PatternDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternDef")
            .field("name", &self.name)
            .field("sequence", &self.sequence)
            .field("priority", &self.priority)
            .field("category", &self.category)
            .field("max_matches", &self.max_matches)
            .finish_non_exhaustive()
    }
}

/// A registered pattern.
pub struct Pattern {
    pub(crate) name: String,
    pub(crate) sequence: Vec<String>,
    pub(crate) callback: Box<dyn PatternCallback>,
    pub(crate) priority: i32,
    pub(crate) category: Option<String>,
    pub(crate) max_matches: MatchCap,
    /// Matches dispatched since registration or the last reset.
    pub(crate) matches_so_far: usize,
}

impl Pattern {
    /// Unique name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Token sequence (never empty).
    #[must_use]
    pub fn sequence(&self) -> &[String] {
        &self.sequence
    }

    /// Evaluation priority.
    #[must_use]
    pub const fn priority(&self) -> i32 {
        self.priority
    }

    /// Optional grouping label.
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Match cap.
    #[must_use]
    pub const fn max_matches(&self) -> MatchCap {
        self.max_matches
    }

    /// Matches dispatched since registration or the last reset.
    #[must_use]
    pub const fn matches_so_far(&self) -> usize {
        self.matches_so_far
    }

    /// True once the cap is reached; detection skips the pattern.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        !self.max_matches.allows(self.matches_so_far)
    }

    /// Owned snapshot of everything but the callback.
    #[must_use]
    pub fn summary(&self) -> PatternSummary {
        PatternSummary {
            name: self.name.clone(),
            sequence: self.sequence.clone(),
            priority: self.priority,
            category: self.category.clone(),
            max_matches: self.max_matches,
            matches_so_far: self.matches_so_far,
        }
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pattern")
            .field("name", &self.name)
            .field("sequence", &self.sequence)
            .field("priority", &self.priority)
            .field("category", &self.category)
            .field("max_matches", &self.max_matches)
            .field("matches_so_far", &self.matches_so_far)
            .finish_non_exhaustive()
    }
}

/// Serializable view of a registered pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternSummary {
    /// Unique name.
    pub name: String,
    /// Token sequence.
    pub sequence: Vec<String>,
    /// Evaluation priority.
    pub priority: i32,
    /// Optional grouping label.
    pub category: Option<String>,
    /// Match cap.
    pub max_matches: MatchCap,
    /// Matches dispatched since registration or the last reset.
    pub matches_so_far: usize,
}

/// The set of registered patterns, kept in evaluation order.
#[derive(Debug, Default)]
pub struct PatternRegistry {
    patterns: Vec<Pattern>,
}

impl PatternRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            patterns: Vec::new(),
        }
    }

    /// Registers a pattern.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::DuplicateName`] if the name is taken.
    /// - [`RegistryError::EmptySequence`] or
    ///   [`RegistryError::InvalidMaxMatches`] for a malformed definition.
    ///
    /// On error the registry is unchanged.
    pub fn register(&mut self, def: PatternDef) -> Result<(), RegistryError> {
        if self.patterns.iter().any(|p| p.name == def.name) {
            return Err(RegistryError::DuplicateName { name: def.name });
        }
        def.validate()?;

        // Insert after every pattern of equal or higher priority: the Vec
        // stays sorted by descending priority, ties in registration order.
        let pos = self.patterns.partition_point(|p| p.priority >= def.priority);
        tracing::debug!(
            name = %def.name,
            len = def.sequence.len(),
            priority = def.priority,
            max_matches = %def.max_matches,
            "pattern registered"
        );
        self.patterns.insert(
            pos,
            Pattern {
                name: def.name,
                sequence: def.sequence,
                callback: def.callback,
                priority: def.priority,
                category: def.category,
                max_matches: def.max_matches,
                matches_so_far: 0,
            },
        );
        Ok(())
    }

    /// Zeroes the match counter of one pattern.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownPattern`] if no pattern has that name.
    pub fn reset(&mut self, name: &str) -> Result<(), RegistryError> {
        let pattern = self
            .patterns
            .iter_mut()
            .find(|p| p.name == name)
            .ok_or_else(|| RegistryError::UnknownPattern {
                name: name.to_string(),
            })?;
        pattern.matches_so_far = 0;
        tracing::debug!(name, "pattern counter reset");
        Ok(())
    }

    /// Zeroes every match counter so the registry can scan a fresh stream.
    pub fn reset_all(&mut self) {
        for pattern in &mut self.patterns {
            pattern.matches_so_far = 0;
        }
        tracing::debug!(patterns = self.patterns.len(), "all pattern counters reset");
    }

    /// Snapshots of the registered patterns in evaluation order, optionally
    /// restricted to one category.
    #[must_use]
    pub fn list(&self, category: Option<&str>) -> Vec<PatternSummary> {
        self.iter()
            .filter(|p| category.is_none() || p.category() == category)
            .map(Pattern::summary)
            .collect()
    }

    /// Looks up a pattern by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Pattern> {
        self.patterns.iter().find(|p| p.name == name)
    }

    /// Patterns in evaluation order.
    pub fn iter(&self) -> impl Iterator<Item = &Pattern> {
        self.patterns.iter()
    }

    /// Number of registered patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// True if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Scans `tokens` and dispatches callbacks. See
    /// [`SlidingWindowMatcher::detect`](crate::pattern::matcher::SlidingWindowMatcher::detect).
    pub fn detect<S: AsRef<str>>(&mut self, tokens: &[S]) {
        crate::pattern::matcher::SlidingWindowMatcher.detect(tokens, self);
    }

    pub(crate) fn patterns_mut(&mut self) -> &mut [Pattern] {
        &mut self.patterns
    }
}
