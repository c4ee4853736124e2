// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F.

//! Sliding-window matcher for contiguous token sequences.
//!
//! Scans a token stream once per registered pattern and dispatches the
//! pattern's callback at every offset where the stream contains the
//! pattern's sequence verbatim.

use crate::pattern::registry::{MatchInfo, Pattern, PatternRegistry};

/// Detects registered patterns in token streams.
///
/// Stateless: all mutable state (match counters) lives in the registry.
#[derive(Debug, Clone, Copy, Default)]
pub struct SlidingWindowMatcher;

impl SlidingWindowMatcher {
    /// Scans `tokens` for every pattern in `registry` and fires callbacks.
    ///
    /// # Algorithm
    ///
    /// Patterns are visited in evaluation order (descending priority, then
    /// registration order). For a pattern of length `m`, every window
    /// `tokens[start..start + m]` for `start` in `0..=len - m` is compared
    /// element-wise against the sequence, in ascending `start` order. Each
    /// exact match invokes the callback with `MatchInfo { start, end }` and
    /// bumps the pattern's counter. Matches may overlap, both across
    /// patterns and within one pattern: `["x", "x"]` over `["x", "x", "x"]`
    /// fires at 0 and at 1.
    ///
    /// Once a pattern's cap is reached, its scan stops and the next pattern
    /// starts. A pattern already exhausted on entry fires nothing.
    ///
    /// O(P × N × M) time, no allocation. Unknown tokens simply never match.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::{Arc, Mutex};
    /// use sentinel::pattern::matcher::SlidingWindowMatcher;
    /// use sentinel::pattern::registry::{MatchCap, MatchInfo, PatternDef, PatternRegistry};
    ///
    /// let hits = Arc::new(Mutex::new(Vec::new()));
    /// let sink = Arc::clone(&hits);
    /// let mut registry = PatternRegistry::new();
    /// registry
    ///     .register(
    ///         PatternDef::new("cascade", ["dup", "dup"], move |_: &str, _: &[String], info: MatchInfo| {
    ///             sink.lock().unwrap().push((info.start, info.end));
    ///         })
    ///         .max_matches(MatchCap::Unlimited),
    ///     )
    ///     .unwrap();
    ///
    /// SlidingWindowMatcher.detect(&["dup", "dup", "dup"], &mut registry);
    /// assert_eq!(*hits.lock().unwrap(), vec![(0, 2), (1, 3)]);
    /// ```
    pub fn detect<S: AsRef<str>>(&self, tokens: &[S], registry: &mut PatternRegistry) {
        for pattern in registry.patterns_mut() {
            scan_pattern(tokens, pattern);
        }
    }
}

/// Runs one pattern over the stream, honoring its cap.
fn scan_pattern<S: AsRef<str>>(tokens: &[S], pattern: &mut Pattern) {
    let Pattern {
        name,
        sequence,
        callback,
        max_matches,
        matches_so_far,
        ..
    } = pattern;

    let m = sequence.len();
    if tokens.len() < m {
        return;
    }
    if !max_matches.allows(*matches_so_far) {
        tracing::trace!(name = %name, "pattern cap already reached, skipping");
        return;
    }

    for start in 0..=tokens.len() - m {
        if !window_equals(&tokens[start..start + m], sequence) {
            continue;
        }
        let info = MatchInfo {
            start,
            end: start + m,
        };
        tracing::debug!(name = %name, start, end = info.end, "pattern matched");
        (**callback).on_match(name, sequence, info);
        *matches_so_far += 1;

        if !max_matches.allows(*matches_so_far) {
            tracing::trace!(name = %name, cap = %max_matches, "pattern cap reached");
            break;
        }
    }
}

/// Element-wise exact comparison. Callers guarantee equal lengths.
#[inline]
fn window_equals<S: AsRef<str>>(window: &[S], sequence: &[String]) -> bool {
    window
        .iter()
        .zip(sequence)
        .all(|(token, expected)| token.as_ref() == expected.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::registry::{MatchCap, PatternDef};
    use std::sync::{Arc, Mutex};

    /// Recorded callback invocation: `(name, start, end)`.
    type Hit = (String, usize, usize);

    fn recorder(log: &Arc<Mutex<Vec<Hit>>>) -> impl FnMut(&str, &[String], MatchInfo) + Send {
        let log = Arc::clone(log);
        move |name: &str, _: &[String], info: MatchInfo| {
            log.lock()
                .unwrap()
                .push((name.to_string(), info.start, info.end));
        }
    }

    fn hits(log: &Arc<Mutex<Vec<Hit>>>) -> Vec<Hit> {
        log.lock().unwrap().clone()
    }

    fn hit(name: &str, start: usize, end: usize) -> Hit {
        (name.to_string(), start, end)
    }

    #[test]
    fn test_empty_registry_is_noop() {
        let mut registry = PatternRegistry::new();
        SlidingWindowMatcher.detect(&["a", "b"], &mut registry);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_empty_stream() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = PatternRegistry::new();
        registry
            .register(PatternDef::new("p", ["a"], recorder(&log)))
            .unwrap();
        SlidingWindowMatcher.detect::<&str>(&[], &mut registry);
        assert!(hits(&log).is_empty());
    }

    #[test]
    fn test_single_match_scenario_a() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = PatternRegistry::new();
        registry
            .register(
                PatternDef::new("tone", ["low", "medium", "high"], recorder(&log))
                    .max_matches(MatchCap::Limited(5)),
            )
            .unwrap();
        SlidingWindowMatcher.detect(&["low", "medium", "high"], &mut registry);
        assert_eq!(hits(&log), vec![hit("tone", 0, 3)]);
    }

    #[test]
    fn test_overlapping_matches_scenario_b() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = PatternRegistry::new();
        registry
            .register(
                PatternDef::new("cascade", ["dup", "dup"], recorder(&log))
                    .max_matches(MatchCap::Unlimited),
            )
            .unwrap();
        SlidingWindowMatcher.detect(&["dup", "dup", "dup"], &mut registry);
        assert_eq!(hits(&log), vec![hit("cascade", 0, 2), hit("cascade", 1, 3)]);
    }

    #[test]
    fn test_repeated_sequence_scenario_c() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = PatternRegistry::new();
        registry
            .register(
                PatternDef::new("recovery", ["high", "medium", "low"], recorder(&log))
                    .max_matches(MatchCap::Limited(10)),
            )
            .unwrap();
        SlidingWindowMatcher.detect(
            &["high", "medium", "low", "high", "medium", "low"],
            &mut registry,
        );
        assert_eq!(
            hits(&log),
            vec![hit("recovery", 0, 3), hit("recovery", 3, 6)]
        );
    }

    #[test]
    fn test_cap_stops_scan() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = PatternRegistry::new();
        registry
            .register(
                PatternDef::new("x", ["x"], recorder(&log)).max_matches(MatchCap::Limited(2)),
            )
            .unwrap();
        SlidingWindowMatcher.detect(&["x", "x", "x", "x"], &mut registry);
        assert_eq!(hits(&log), vec![hit("x", 0, 1), hit("x", 1, 2)]);
        assert!(registry.get("x").unwrap().is_exhausted());
    }

    #[test]
    fn test_default_cap_is_one() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = PatternRegistry::new();
        registry
            .register(PatternDef::new("a", ["a"], recorder(&log)))
            .unwrap();
        SlidingWindowMatcher.detect(&["a", "a"], &mut registry);
        assert_eq!(hits(&log), vec![hit("a", 0, 1)]);
    }

    #[test]
    fn test_exhausted_pattern_contributes_nothing_but_next_runs() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = PatternRegistry::new();
        registry
            .register(PatternDef::new("first", ["a"], recorder(&log)).priority(1))
            .unwrap();
        registry
            .register(PatternDef::new("second", ["b"], recorder(&log)))
            .unwrap();

        SlidingWindowMatcher.detect(&["a"], &mut registry);
        SlidingWindowMatcher.detect(&["a", "b"], &mut registry);
        assert_eq!(hits(&log), vec![hit("first", 0, 1), hit("second", 1, 2)]);
    }

    #[test]
    fn test_stream_shorter_than_pattern() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = PatternRegistry::new();
        registry
            .register(PatternDef::new("long", ["a", "b", "c"], recorder(&log)))
            .unwrap();
        SlidingWindowMatcher.detect(&["a", "b"], &mut registry);
        assert!(hits(&log).is_empty());
        assert_eq!(registry.get("long").unwrap().matches_so_far(), 0);
    }

    #[test]
    fn test_priority_order_on_overlap() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = PatternRegistry::new();
        registry
            .register(PatternDef::new("low_prio", ["b", "c"], recorder(&log)).priority(1))
            .unwrap();
        registry
            .register(PatternDef::new("high_prio", ["a", "b"], recorder(&log)).priority(5))
            .unwrap();
        SlidingWindowMatcher.detect(&["a", "b", "c"], &mut registry);
        assert_eq!(
            hits(&log),
            vec![hit("high_prio", 0, 2), hit("low_prio", 1, 3)]
        );
    }

    #[test]
    fn test_equal_priority_keeps_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = PatternRegistry::new();
        for name in ["zeta", "alpha", "mid"] {
            registry
                .register(PatternDef::new(name, ["t"], recorder(&log)))
                .unwrap();
        }
        SlidingWindowMatcher.detect(&["t"], &mut registry);
        let order: Vec<String> = hits(&log).into_iter().map(|h| h.0).collect();
        assert_eq!(order, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_case_sensitive_and_unknown_tokens() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = PatternRegistry::new();
        registry
            .register(
                PatternDef::new("esc", ["high_escalation"], recorder(&log))
                    .max_matches(MatchCap::Unlimited),
            )
            .unwrap();
        SlidingWindowMatcher.detect(
            &["HIGH_ESCALATION", "", "???", "high_escalation "],
            &mut registry,
        );
        assert!(hits(&log).is_empty());
    }

    #[test]
    fn test_owned_string_stream() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = PatternRegistry::new();
        registry
            .register(PatternDef::new("p", ["a", "b"], recorder(&log)))
            .unwrap();
        let stream: Vec<String> = vec!["a".into(), "b".into()];
        registry.detect(&stream);
        assert_eq!(hits(&log), vec![hit("p", 0, 2)]);
    }

    #[test]
    fn test_callback_receives_pattern_sequence() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut registry = PatternRegistry::new();
        registry
            .register(PatternDef::new(
                "seq",
                ["m", "n"],
                move |_: &str, sequence: &[String], _: MatchInfo| {
                    sink.lock().unwrap().push(sequence.to_vec());
                },
            ))
            .unwrap();
        registry.detect(&["z", "m", "n"]);
        assert_eq!(*seen.lock().unwrap(), vec![vec!["m".to_string(), "n".to_string()]]);
    }

    #[test]
    fn test_reset_all_replays_identically() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = PatternRegistry::new();
        registry
            .register(
                PatternDef::new("pair", ["a", "a"], recorder(&log)).max_matches(MatchCap::Limited(2)),
            )
            .unwrap();
        registry
            .register(PatternDef::new("ab", ["a", "b"], recorder(&log)).priority(3))
            .unwrap();
        let stream = ["a", "a", "a", "b", "a", "a"];

        registry.detect(&stream);
        let first = hits(&log);
        log.lock().unwrap().clear();

        registry.reset_all();
        registry.detect(&stream);
        assert_eq!(hits(&log), first);
        assert_eq!(
            first,
            vec![hit("ab", 2, 4), hit("pair", 0, 2), hit("pair", 1, 3)]
        );
    }
}
