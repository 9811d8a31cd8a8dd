// Copyright (C) 2025 Category Labs, Inc.
// SPDX-License-Identifier: GPL-3.0-or-later

//! First-match-wins search over the pattern registry.

use crate::error::InterpretError;
use crate::interpreter::{Intent, PatternRegistry, SlotKind, SlotValue};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// A successful match of one pattern against the input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub intent: Intent,
    /// The substring of the input the pattern matched.
    pub matched: String,
    /// Template of the pattern that matched.
    pub template: String,
    pub captures: BTreeMap<SlotKind, SlotValue>,
}

impl MatchResult {
    pub fn amount(&self) -> Option<f64> {
        match self.captures.get(&SlotKind::Amount) {
            Some(SlotValue::Amount(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn address(&self) -> Option<&str> {
        match self.captures.get(&SlotKind::Address) {
            Some(SlotValue::Address(a)) => Some(a),
            _ => None,
        }
    }

    pub fn handle(&self) -> Option<&str> {
        match self.captures.get(&SlotKind::Handle) {
            Some(SlotValue::Handle(h)) => Some(h),
            _ => None,
        }
    }
}

/// Tries intents in priority order, patterns in registration order.
#[derive(Debug, Clone, Copy)]
pub struct Matcher<'r> {
    registry: &'r PatternRegistry,
}

impl<'r> Matcher<'r> {
    pub fn new(registry: &'r PatternRegistry) -> Self {
        Self { registry }
    }

    /// Find the first pattern matching `text`.
    ///
    /// Text that matches nothing yields [`InterpretError::NoMatch`]. A hit
    /// whose amount cannot be used yields
    /// [`InterpretError::MalformedCapture`]; the search does not continue
    /// past it.
    pub fn find(&self, text: &str) -> Result<MatchResult, InterpretError> {
        for pattern in self.registry.iter() {
            let Some(caps) = pattern.regex().captures(text) else {
                continue;
            };

            let mut captures = BTreeMap::new();
            for slot in pattern.slots() {
                let raw = caps.name(slot.group_name()).ok_or_else(|| {
                    InterpretError::InternalInconsistency {
                        detail: format!(
                            "pattern `{}` matched without its {} group",
                            pattern.template(),
                            slot
                        ),
                    }
                })?;
                captures.insert(*slot, slot.convert(raw.as_str())?);
            }

            // A trailing handle consumes its terminator; drop it.
            let matched = caps
                .get(0)
                .map(|m| m.as_str())
                .unwrap_or_default()
                .trim_end_matches(|c: char| c.is_whitespace() || ",.!?".contains(c));
            debug!(
                "Matched {} via `{}`: {:?}",
                pattern.intent(),
                pattern.template(),
                matched
            );

            return Ok(MatchResult {
                intent: pattern.intent(),
                matched: matched.to_string(),
                template: pattern.template().to_string(),
                captures,
            });
        }

        debug!("No pattern matched {:?}", text);
        Err(InterpretError::NoMatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDR: &str = "0x1111111111111111111111111111111111111111";

    fn builtin() -> PatternRegistry {
        PatternRegistry::builtin()
    }

    #[test]
    fn swap_phrasings_all_match() {
        let registry = builtin();
        let matcher = Matcher::new(&registry);
        for text in [
            format!("swap 2.5 MON to {ADDR}"),
            format!("convert 2.5 MON to {ADDR}"),
            format!("exchange 2.5 MON for {ADDR}"),
            format!("tukar 2.5 MON ke {ADDR}"),
            format!("tolong swap 2.5 MON ke {ADDR}"),
        ] {
            let m = matcher.find(&text).unwrap();
            assert_eq!(m.intent, Intent::Swap, "{}", text);
            assert_eq!(m.amount(), Some(2.5));
            assert_eq!(m.address(), Some(ADDR));
        }
    }

    #[test]
    fn matched_substring_excludes_surrounding_text() {
        let registry = builtin();
        let m = Matcher::new(&registry)
            .find(&format!("please kirim 1 MON ke {ADDR} now"))
            .unwrap();
        assert_eq!(m.intent, Intent::Send);
        assert_eq!(m.matched, format!("kirim 1 MON ke {ADDR}"));
        assert_eq!(m.template, "kirim {amount} MON ke {address}");
    }

    #[test]
    fn handle_terminator_is_not_part_of_the_match() {
        let registry = builtin();
        let m = Matcher::new(&registry)
            .find("could you check twitter for @jack. thanks")
            .unwrap();
        assert_eq!(m.intent, Intent::CheckTwitter);
        assert_eq!(m.matched, "check twitter for @jack");
    }

    #[test]
    fn extra_whitespace_is_tolerated() {
        let registry = builtin();
        let m = Matcher::new(&registry)
            .find(&format!("send   0.1\tMON  to {ADDR}"))
            .unwrap();
        assert_eq!(m.intent, Intent::Send);
        assert_eq!(m.amount(), Some(0.1));
    }

    #[test]
    fn keyword_inside_word_does_not_match() {
        let registry = builtin();
        assert_eq!(
            Matcher::new(&registry).find(&format!("unswap 1 MON to {ADDR}")),
            Err(InterpretError::NoMatch)
        );
    }

    #[test]
    fn bad_address_lengths_fall_through() {
        let registry = builtin();
        let matcher = Matcher::new(&registry);
        let short = format!("0x{}", "a".repeat(39));
        let long = format!("0x{}", "a".repeat(41));
        assert_eq!(matcher.find(&format!("swap 1 MON to {short}")), Err(InterpretError::NoMatch));
        assert_eq!(matcher.find(&format!("swap 1 MON to {long}")), Err(InterpretError::NoMatch));
        assert_eq!(matcher.find(&format!("analyze token {long}")), Err(InterpretError::NoMatch));
    }

    #[test]
    fn overflowing_amount_is_malformed_not_no_match() {
        let registry = builtin();
        let text = format!("swap {} MON to {ADDR}", "9".repeat(400));
        assert!(matches!(
            Matcher::new(&registry).find(&text),
            Err(InterpretError::MalformedCapture { slot: SlotKind::Amount, .. })
        ));
    }

    #[test]
    fn long_twitter_handle_is_no_match() {
        let registry = builtin();
        assert_eq!(
            Matcher::new(&registry).find("check twitter history for @abcdefghijklmnop"),
            Err(InterpretError::NoMatch)
        );
    }

    #[test]
    fn twitter_history_phrasing_beats_short_form() {
        let registry = builtin();
        let m = Matcher::new(&registry)
            .find("check twitter history for @elonmusk")
            .unwrap();
        assert_eq!(m.intent, Intent::CheckTwitter);
        assert_eq!(m.handle(), Some("elonmusk"));
    }

    #[test]
    fn unregistered_intents_are_never_produced() {
        let mut builder = PatternRegistry::builder();
        builder.register(Intent::AnalyzeToken, "analyze token {address}").unwrap();
        let registry = builder.build();
        assert_eq!(
            Matcher::new(&registry).find(&format!("swap 1 MON to {ADDR}")),
            Err(InterpretError::NoMatch)
        );
    }
}
