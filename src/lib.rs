// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F.

//! # `sentinel` — Call Governor and Sequence Pattern Detection
//!
//! Two independent pieces for bias-evaluation pipelines:
//!
//! | Component | Module | Description |
//! |-----------|--------|-------------|
//! | `CallGovernor` | [`governor`] | Sliding-window admission control around calls to a scoring service |
//! | `PatternRegistry` | [`pattern::registry`] | Named token-sequence patterns with priorities, categories and match caps |
//! | `SlidingWindowMatcher` | [`pattern::matcher`] | Fires pattern callbacks for every contiguous occurrence in a token stream |
//!
//! A caller gates its scoring requests through a [`CallGovernor`], turns
//! the per-axis results into `{level}_{axis}` tokens (see
//! [`common::token`]; the built-in patterns expect the short axis spellings
//! from [`common::token::pattern_axis`]), and hands the accumulated stream to
//! [`PatternRegistry::detect`]. The two components share no state.
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//! use sentinel::{CallGovernor, MatchCap, MatchInfo, PatternDef, PatternRegistry};
//!
//! let governor = Arc::new(CallGovernor::new(50, Duration::from_secs(60)).unwrap());
//! let classify = governor.wrap(|score: u8| {
//!     if score >= 4 { "high_escalation" } else { "low_escalation" }
//! });
//! let stream: Vec<&str> = [1, 5, 5].into_iter().map(&classify).collect();
//!
//! let mut registry = PatternRegistry::new();
//! registry
//!     .register(
//!         PatternDef::new(
//!             "sustained_escalation",
//!             ["high_escalation", "high_escalation"],
//!             |name: &str, _: &[String], info: MatchInfo| {
//!                 assert_eq!((name, info.start, info.end), ("sustained_escalation", 1, 3));
//!             },
//!         )
//!         .max_matches(MatchCap::Unlimited),
//!     )
//!     .unwrap();
//! registry.detect(&stream);
//! ```
//!
//! Nothing here installs a `tracing` subscriber or holds global state;
//! every governor and registry is an explicitly constructed value.

pub mod common;
pub mod error;
pub mod governor;
pub mod pattern;

pub use error::{ConfigError, RegistryError};
pub use governor::{CallGovernor, GovernorConfig};
pub use pattern::matcher::SlidingWindowMatcher;
pub use pattern::registry::{
    MatchCap, MatchInfo, Pattern, PatternCallback, PatternDef, PatternRegistry, PatternSummary,
};
pub use pattern::shared::SharedRegistry;
