// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F.

//! Sequence pattern detection over classification token streams.
//!
//! A pattern is a fixed, ordered list of token labels such as
//! `["low_escalation", "medium_escalation", "high_escalation"]`. Detection
//! slides a window of the pattern's length across the stream and fires the
//! pattern's callback wherever the window equals the sequence exactly.
//!
//! - [`registry`]: pattern definitions, match caps, callbacks
//! - [`matcher`]: the sliding-window scan
//! - [`shared`]: a mutex-guarded registry handle for multi-threaded use
//! - [`builtin`]: the stock bias-dynamics patterns
//! - [`catalog`]: TOML-declared pattern sets

pub mod builtin;
pub mod catalog;
pub mod matcher;
pub mod registry;
pub mod shared;
