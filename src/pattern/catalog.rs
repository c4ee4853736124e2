// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F.

//! Pattern definitions declared in TOML.
//!
//! ```toml
//! [[pattern]]
//! name = "tone_shift_hostile"
//! sequence = ["low_escalation", "medium_escalation", "high_escalation"]
//! priority = 2
//! category = "tone_patterns"
//! max_matches = 5            # or "unlimited"; defaults to 1
//! ```
//!
//! Callbacks cannot be expressed in a document, so
//! [`PatternCatalog::register_into`] asks the caller for one per entry.

use serde::{Deserialize, Serialize};

use crate::error::RegistryError;
use crate::pattern::registry::{MatchCap, PatternCallback, PatternDef, PatternRegistry};

/// One `[[pattern]]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogEntry {
    /// Unique pattern name.
    pub name: String,
    /// Token sequence.
    pub sequence: Vec<String>,
    /// Evaluation priority (default 0).
    #[serde(default)]
    pub priority: i32,
    /// Optional grouping label.
    #[serde(default)]
    pub category: Option<String>,
    /// Match cap (default 1).
    #[serde(default)]
    pub max_matches: MatchCap,
}

/// An ordered list of pattern definitions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternCatalog {
    /// Entries in document order.
    #[serde(default, rename = "pattern")]
    pub patterns: Vec<CatalogEntry>,
}

impl PatternCatalog {
    /// Parses a TOML catalog.
    ///
    /// Only the document shape is checked here; names, sequences and caps
    /// are validated when the entries are registered.
    pub fn from_toml_str(input: &str) -> Result<Self, RegistryError> {
        toml::from_str(input).map_err(|e| RegistryError::Catalog {
            reason: e.to_string(),
        })
    }

    /// Registers every entry in document order, building each callback
    /// with `make_callback`.
    ///
    /// Stops at the first rejected entry and returns its error; entries
    /// before it remain registered.
    pub fn register_into<F, C>(
        &self,
        registry: &mut PatternRegistry,
        mut make_callback: F,
    ) -> Result<usize, RegistryError>
    where
        F: FnMut(&CatalogEntry) -> C,
        C: PatternCallback + 'static,
    {
        for entry in &self.patterns {
            let mut def = PatternDef::new(
                entry.name.as_str(),
                entry.sequence.iter().map(String::as_str),
                make_callback(entry),
            )
            .priority(entry.priority)
            .max_matches(entry.max_matches);
            if let Some(category) = &entry.category {
                def = def.category(category.as_str());
            }
            registry.register(def)?;
        }
        tracing::debug!(patterns = self.patterns.len(), "pattern catalog loaded");
        Ok(self.patterns.len())
    }
}
