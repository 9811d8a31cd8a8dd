// Copyright (C) 2025 Category Labs, Inc.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Pattern registry - the single canonical table of accepted phrasings.
//!
//! Templates are whitespace separated tokens. `{amount}`, `{address}` and
//! `{handle}` are typed slots, every other token is a literal matched
//! case-insensitively. A registry is assembled with [`RegistryBuilder`] and is
//! read-only once built.

use crate::error::RegistryError;
use crate::interpreter::{Intent, SlotKind};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

lazy_static! {
    /// Built-in registry shared by the CLI, HTTP and MCP surfaces.
    pub static ref BUILTIN_REGISTRY: PatternRegistry = PatternRegistry::builtin();
}

const SWAP_TEMPLATES: &[&str] = &[
    "swap {amount} MON to {address}",
    "swap {amount} MON ke {address}",
    "convert {amount} MON to {address}",
    "exchange {amount} MON for {address}",
    "tukar {amount} MON ke {address}",
    "tukar {amount} MON to {address}",
];

const SEND_TEMPLATES: &[&str] = &[
    "send {amount} MON to {address}",
    "transfer {amount} MON to {address}",
    "kirim {amount} MON ke {address}",
    "kirim {amount} MON to {address}",
];

const ANALYZE_TOKEN_TEMPLATES: &[&str] = &[
    "analyze token {address}",
    "analyse token {address}",
    "check token {address}",
    "analisa token {address}",
    "cek token {address}",
];

const ANALYZE_ADDRESS_TEMPLATES: &[&str] = &[
    "analyze address {address}",
    "analyze wallet {address}",
    "analyse address {address}",
    "check wallet {address}",
    "check address {address}",
    "analisa alamat {address}",
    "analisa wallet {address}",
    "cek wallet {address}",
    "cek alamat {address}",
];

// No bare `check twitter {handle}` or `cek twitter {handle}`: either would
// capture "history" from `check twitter history @...` as the handle.
const CHECK_TWITTER_TEMPLATES: &[&str] = &[
    "check twitter history for {handle}",
    "check twitter history of {handle}",
    "twitter history for {handle}",
    "check twitter for {handle}",
    "cek riwayat twitter {handle}",
];

/// One compiled phrasing of an intent.
#[derive(Debug, Clone)]
pub struct Pattern {
    intent: Intent,
    template: String,
    slots: Vec<SlotKind>,
    regex: Regex,
}

impl Pattern {
    /// Compile a template for `intent`.
    pub fn compile(intent: Intent, template: &str) -> Result<Self, RegistryError> {
        let tokens: Vec<&str> = template.split_whitespace().collect();
        let Some(first) = tokens.first() else {
            return Err(RegistryError::EmptyTemplate);
        };

        let mut slots = Vec::new();
        let mut source = String::new();
        let mut after_handle = false;
        for (i, token) in tokens.iter().enumerate() {
            // The handle fragment already consumes its trailing separator.
            if i > 0 {
                source.push_str(if after_handle { r"\s*" } else { r"\s+" });
            }
            match placeholder(token) {
                Some(name) => {
                    let kind = SlotKind::from_placeholder(name)
                        .ok_or_else(|| RegistryError::UnknownSlot(name.to_string()))?;
                    if slots.contains(&kind) {
                        return Err(RegistryError::DuplicateSlot {
                            slot: kind,
                            template: template.to_string(),
                        });
                    }
                    slots.push(kind);
                    source.push_str(&kind.fragment());
                    after_handle = kind == SlotKind::Handle;
                }
                None => {
                    source.push_str(&regex::escape(token));
                    after_handle = false;
                }
            }
        }

        let leading_word = placeholder(first).is_none()
            && first
                .chars()
                .next()
                .is_some_and(|c| c.is_alphanumeric() || c == '_');
        let source = format!(
            "(?i){}{}",
            if leading_word { r"\b" } else { "" },
            source
        );

        let regex = Regex::new(&source).map_err(|e| RegistryError::Compile {
            template: template.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            intent,
            template: tokens.join(" "),
            slots,
            regex,
        })
    }

    pub fn intent(&self) -> Intent {
        self.intent
    }

    /// Normalized template text (single spaces).
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Slots in the order they appear in the template.
    pub fn slots(&self) -> &[SlotKind] {
        &self.slots
    }

    pub(crate) fn regex(&self) -> &Regex {
        &self.regex
    }
}

fn placeholder(token: &str) -> Option<&str> {
    token.strip_prefix('{').and_then(|t| t.strip_suffix('}'))
}

/// Patterns registered for one intent, in registration order.
#[derive(Debug, Clone)]
struct IntentPatterns {
    intent: Intent,
    patterns: Vec<Pattern>,
}

/// Collects templates during initialization.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    entries: Vec<IntentPatterns>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one more phrasing for `intent`.
    pub fn register(&mut self, intent: Intent, template: &str) -> Result<&mut Self, RegistryError> {
        let pattern = Pattern::compile(intent, template)?;
        match self.entries.iter_mut().find(|e| e.intent == intent) {
            Some(entry) => entry.patterns.push(pattern),
            None => self.entries.push(IntentPatterns {
                intent,
                patterns: vec![pattern],
            }),
        }
        Ok(self)
    }

    /// Register several phrasings for `intent`, keeping their order.
    pub fn register_all(
        &mut self,
        intent: Intent,
        templates: &[&str],
    ) -> Result<&mut Self, RegistryError> {
        for template in templates {
            self.register(intent, template)?;
        }
        Ok(self)
    }

    /// Seal the registry. Intents are reordered into [`Intent::PRIORITY`]
    /// regardless of the order they were registered in.
    pub fn build(self) -> PatternRegistry {
        let mut entries = self.entries;
        entries.sort_by_key(|e| e.intent.rank());
        debug!(
            "Pattern registry built: {} intents, {} patterns",
            entries.len(),
            entries.iter().map(|e| e.patterns.len()).sum::<usize>()
        );
        PatternRegistry { entries }
    }
}

/// Read-only table of patterns grouped by intent in priority order.
#[derive(Debug, Clone)]
pub struct PatternRegistry {
    entries: Vec<IntentPatterns>,
}

impl PatternRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// The canonical English + Indonesian phrasings.
    pub fn builtin() -> Self {
        let mut builder = RegistryBuilder::new();
        let tables: [(Intent, &[&str]); 5] = [
            (Intent::Swap, SWAP_TEMPLATES),
            (Intent::Send, SEND_TEMPLATES),
            (Intent::AnalyzeToken, ANALYZE_TOKEN_TEMPLATES),
            (Intent::AnalyzeAddress, ANALYZE_ADDRESS_TEMPLATES),
            (Intent::CheckTwitter, CHECK_TWITTER_TEMPLATES),
        ];
        for (intent, templates) in tables {
            builder
                .register_all(intent, templates)
                .expect("built-in pattern templates are valid");
        }
        builder.build()
    }

    /// Patterns for `intent` in the order they are tried. Empty if the
    /// intent is not registered.
    pub fn patterns_for_intent(&self, intent: Intent) -> &[Pattern] {
        self.entries
            .iter()
            .find(|e| e.intent == intent)
            .map(|e| e.patterns.as_slice())
            .unwrap_or(&[])
    }

    /// Registered intents, highest priority first.
    pub fn intents_in_priority_order(&self) -> Vec<Intent> {
        self.entries.iter().map(|e| e.intent).collect()
    }

    pub fn contains(&self, intent: Intent) -> bool {
        self.entries.iter().any(|e| e.intent == intent)
    }

    /// Every pattern in evaluation order.
    pub fn iter(&self) -> impl Iterator<Item = &Pattern> {
        self.entries.iter().flat_map(|e| e.patterns.iter())
    }

    pub fn len(&self) -> usize {
        self.entries.iter().map(|e| e.patterns.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_covers_every_intent_in_priority_order() {
        let registry = PatternRegistry::builtin();
        assert_eq!(registry.intents_in_priority_order(), Intent::PRIORITY.to_vec());
        for intent in Intent::PRIORITY {
            assert!(!registry.patterns_for_intent(intent).is_empty(), "{}", intent);
        }
    }

    #[test]
    fn builtin_slots_per_intent() {
        let registry = PatternRegistry::builtin();
        for pattern in registry.patterns_for_intent(Intent::Swap) {
            assert_eq!(pattern.slots(), &[SlotKind::Amount, SlotKind::Address]);
        }
        for pattern in registry.patterns_for_intent(Intent::Send) {
            assert_eq!(pattern.slots(), &[SlotKind::Amount, SlotKind::Address]);
        }
        for pattern in registry.patterns_for_intent(Intent::CheckTwitter) {
            assert_eq!(pattern.slots(), &[SlotKind::Handle]);
        }
    }

    #[test]
    fn build_reorders_intents_by_priority() {
        let mut builder = PatternRegistry::builder();
        builder
            .register(Intent::CheckTwitter, "who is {handle}")
            .unwrap()
            .register(Intent::Swap, "swap {amount} MON to {address}")
            .unwrap();
        let registry = builder.build();
        assert_eq!(
            registry.intents_in_priority_order(),
            vec![Intent::Swap, Intent::CheckTwitter]
        );
        assert!(!registry.contains(Intent::Send));
        assert!(registry.patterns_for_intent(Intent::Send).is_empty());
    }

    #[test]
    fn patterns_keep_registration_order() {
        let mut builder = PatternRegistry::builder();
        builder
            .register_all(Intent::Send, &["send {amount} MON to {address}", "kirim {amount} MON ke {address}"])
            .unwrap();
        let registry = builder.build();
        let templates: Vec<&str> = registry
            .patterns_for_intent(Intent::Send)
            .iter()
            .map(|p| p.template())
            .collect();
        assert_eq!(templates, vec!["send {amount} MON to {address}", "kirim {amount} MON ke {address}"]);
    }

    #[test]
    fn bad_templates_are_rejected() {
        assert_eq!(
            Pattern::compile(Intent::Swap, "   ").unwrap_err(),
            RegistryError::EmptyTemplate
        );
        assert_eq!(
            Pattern::compile(Intent::Swap, "swap {qty} MON").unwrap_err(),
            RegistryError::UnknownSlot("qty".into())
        );
        assert!(matches!(
            Pattern::compile(Intent::Swap, "move {address} to {address}"),
            Err(RegistryError::DuplicateSlot { slot: SlotKind::Address, .. })
        ));
    }

    #[test]
    fn literals_are_escaped() {
        let pattern = Pattern::compile(Intent::AnalyzeToken, "token? {address}").unwrap();
        let addr = format!("0x{}", "1".repeat(40));
        assert!(pattern.regex().is_match(&format!("token? {}", addr)));
        assert!(!pattern.regex().is_match(&format!("toke {}", addr)));
    }
}
