// Copyright (C) 2025 Category Labs, Inc.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error types for the interpreter, configuration and collaborators.

use crate::interpreter::SlotKind;
use thiserror::Error;

/// Failures produced while turning free text into an action.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InterpretError {
    /// No registered pattern matched the input.
    #[error("command not recognized")]
    NoMatch,

    /// A slot matched syntactically but its value is unusable.
    #[error("invalid {slot} `{raw}`: {reason}")]
    MalformedCapture {
        slot: SlotKind,
        raw: String,
        reason: String,
    },

    /// The resolver was handed a match it cannot account for.
    /// The detail is for logs only and is never displayed.
    #[error("internal error")]
    InternalInconsistency { detail: String },
}

impl InterpretError {
    /// Whether the caller can sensibly re-prompt the user.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::InternalInconsistency { .. })
    }
}

/// Rejected pattern templates.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistryError {
    #[error("pattern template is empty")]
    EmptyTemplate,

    #[error("unknown slot `{{{0}}}` in template")]
    UnknownSlot(String),

    #[error("slot {slot} appears more than once in `{template}`")]
    DuplicateSlot { slot: SlotKind, template: String },

    #[error("pattern `{template}` failed to compile: {reason}")]
    Compile { template: String, reason: String },
}

/// Missing or invalid configuration values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{name} has invalid value `{value}`")]
    Invalid { name: String, value: String },

    #[error("invalid address in {name}: {value}")]
    Address { name: String, value: String },
}

/// Failures reported by downstream collaborators.
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("key store error: {0}")]
    KeyStore(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid Twitter handle `{0}`: handles are 1-15 letters, digits or underscores")]
    InvalidHandle(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("rpc error: {0}")]
    Rpc(String),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    ApiStatus { status: u16, message: String },

    #[error("{0}")]
    NotFound(String),

    #[error("language model error: {0}")]
    Llm(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ExecResult<T> = Result<T, ExecError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_detail_is_not_displayed() {
        let err = InterpretError::InternalInconsistency {
            detail: "slot table for swap lost its address".into(),
        };
        assert_eq!(err.to_string(), "internal error");
        assert!(!err.is_recoverable());
    }

    #[test]
    fn user_errors_are_recoverable() {
        assert!(InterpretError::NoMatch.is_recoverable());
        let malformed = InterpretError::MalformedCapture {
            slot: SlotKind::Amount,
            raw: "9".repeat(400),
            reason: "amount is not a finite number".into(),
        };
        assert!(malformed.is_recoverable());
        assert!(malformed.to_string().starts_with("invalid amount"));
    }
}
