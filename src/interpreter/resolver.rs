// Copyright (C) 2025 Category Labs, Inc.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Turns a match into the action descriptor handed to collaborators.

use crate::error::InterpretError;
use crate::interpreter::{Intent, MatchResult, PatternRegistry, SlotKind};
use serde::{Deserialize, Serialize};
use tracing::error;

/// Normalized output of interpretation.
///
/// Serializes as `{"intent": "...", "params": {...}}` with the canonical
/// parameter names collaborators expect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "intent", content = "params", rename_all = "kebab-case")]
pub enum ActionDescriptor {
    #[serde(rename_all = "camelCase")]
    Swap { amount: f64, contract_address: String },

    #[serde(rename_all = "camelCase")]
    Send { amount: f64, to_address: String },

    #[serde(rename_all = "camelCase")]
    AnalyzeToken { token_address: String },

    #[serde(rename_all = "camelCase")]
    AnalyzeAddress { address: String },

    #[serde(rename_all = "camelCase")]
    CheckTwitter { screen_name: String },
}

impl ActionDescriptor {
    pub fn intent(&self) -> Intent {
        match self {
            Self::Swap { .. } => Intent::Swap,
            Self::Send { .. } => Intent::Send,
            Self::AnalyzeToken { .. } => Intent::AnalyzeToken,
            Self::AnalyzeAddress { .. } => Intent::AnalyzeAddress,
            Self::CheckTwitter { .. } => Intent::CheckTwitter,
        }
    }

    /// Short human-readable description for logs and prompts.
    pub fn describe(&self) -> String {
        match self {
            Self::Swap { amount, contract_address } => {
                format!("swap {} MON to {}", amount, contract_address)
            }
            Self::Send { amount, to_address } => format!("send {} MON to {}", amount, to_address),
            Self::AnalyzeToken { token_address } => format!("analyze token {}", token_address),
            Self::AnalyzeAddress { address } => format!("analyze address {}", address),
            Self::CheckTwitter { screen_name } => format!("check twitter history for @{}", screen_name),
        }
    }
}

/// Maps match results onto action descriptors.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'r> {
    registry: &'r PatternRegistry,
}

impl<'r> Resolver<'r> {
    pub fn new(registry: &'r PatternRegistry) -> Self {
        Self { registry }
    }

    /// Shape a match into an action. Pure; performs no I/O.
    pub fn resolve(&self, m: &MatchResult) -> Result<ActionDescriptor, InterpretError> {
        if !self.registry.contains(m.intent) {
            return Err(inconsistency(format!(
                "intent {} is not registered",
                m.intent
            )));
        }

        let action = match m.intent {
            Intent::Swap => ActionDescriptor::Swap {
                amount: m.amount().ok_or_else(|| missing(m, SlotKind::Amount))?,
                contract_address: m
                    .address()
                    .ok_or_else(|| missing(m, SlotKind::Address))?
                    .to_string(),
            },
            Intent::Send => ActionDescriptor::Send {
                amount: m.amount().ok_or_else(|| missing(m, SlotKind::Amount))?,
                to_address: m
                    .address()
                    .ok_or_else(|| missing(m, SlotKind::Address))?
                    .to_string(),
            },
            Intent::AnalyzeToken => ActionDescriptor::AnalyzeToken {
                token_address: m
                    .address()
                    .ok_or_else(|| missing(m, SlotKind::Address))?
                    .to_string(),
            },
            Intent::AnalyzeAddress => ActionDescriptor::AnalyzeAddress {
                address: m
                    .address()
                    .ok_or_else(|| missing(m, SlotKind::Address))?
                    .to_string(),
            },
            Intent::CheckTwitter => ActionDescriptor::CheckTwitter {
                screen_name: m
                    .handle()
                    .ok_or_else(|| missing(m, SlotKind::Handle))?
                    .to_string(),
            },
        };

        Ok(action)
    }
}

fn missing(m: &MatchResult, slot: SlotKind) -> InterpretError {
    inconsistency(format!(
        "{} match from `{}` has no {} capture",
        m.intent, m.template, slot
    ))
}

fn inconsistency(detail: String) -> InterpretError {
    error!("❌ Resolver inconsistency: {}", detail);
    InterpretError::InternalInconsistency { detail }
}
