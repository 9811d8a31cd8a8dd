// Copyright (C) 2025 Category Labs, Inc.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Typed capture slots: the regex fragment each slot compiles to and the
//! conversion applied to whatever it captured.

use crate::error::InterpretError;
use serde::Serialize;
use std::fmt;

/// Hex digits in an account address, excluding the `0x` prefix.
pub const ADDRESS_HEX_LEN: usize = 40;

/// Longest screen name the social lookup accepts.
pub const MAX_HANDLE_LEN: usize = 15;

/// Kind of a capture slot in a pattern template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotKind {
    /// Non-negative decimal number, e.g. `2.5`.
    Amount,
    /// `0x` followed by exactly 40 hex digits.
    Address,
    /// 1-15 word characters, optional leading `@` left outside the capture.
    Handle,
}

/// A captured, type-converted slot value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SlotValue {
    Amount(f64),
    Address(String),
    Handle(String),
}

impl SlotKind {
    /// Parse the `{name}` placeholder used in templates.
    pub fn from_placeholder(name: &str) -> Option<Self> {
        match name {
            "amount" => Some(Self::Amount),
            "address" => Some(Self::Address),
            "handle" => Some(Self::Handle),
            _ => None,
        }
    }

    /// Capture group name used inside compiled patterns.
    pub fn group_name(&self) -> &'static str {
        match self {
            Self::Amount => "amount",
            Self::Address => "address",
            Self::Handle => "handle",
        }
    }

    /// Regex fragment for this slot. Addresses end on a word boundary so an
    /// over-long run of hex fails the whole pattern. Handles must be followed
    /// by whitespace, the end of input, or closing punctuation, so
    /// `@jack-smith` is not cut down to `jack`.
    pub fn fragment(&self) -> String {
        match self {
            Self::Amount => r"(?P<amount>[0-9]+(?:\.[0-9]+)?)".to_string(),
            Self::Address => format!(r"(?P<address>0x[0-9a-fA-F]{{{}}})\b", ADDRESS_HEX_LEN),
            Self::Handle => format!(
                r"@?(?P<handle>[A-Za-z0-9_]{{1,{}}})(?:\s|$|[,.!?](?:\s|$))",
                MAX_HANDLE_LEN
            ),
        }
    }

    /// Convert a raw capture into a typed value.
    pub fn convert(&self, raw: &str) -> Result<SlotValue, InterpretError> {
        match self {
            Self::Amount => {
                let value: f64 = raw
                    .parse()
                    .map_err(|_| self.malformed(raw, "amount is not a decimal number"))?;
                if !value.is_finite() {
                    return Err(self.malformed(raw, "amount is not a finite number"));
                }
                if value < 0.0 {
                    return Err(self.malformed(raw, "amount must not be negative"));
                }
                Ok(SlotValue::Amount(value))
            }
            Self::Address => {
                if is_hex_address(raw) {
                    Ok(SlotValue::Address(raw.to_string()))
                } else {
                    Err(self.malformed(raw, "expected 0x followed by 40 hex digits"))
                }
            }
            Self::Handle => {
                let handle = raw.strip_prefix('@').unwrap_or(raw);
                if is_handle(handle) {
                    Ok(SlotValue::Handle(handle.to_string()))
                } else {
                    Err(self.malformed(
                        raw,
                        "handles are 1-15 letters, digits or underscores",
                    ))
                }
            }
        }
    }

    fn malformed(&self, raw: &str, reason: &str) -> InterpretError {
        InterpretError::MalformedCapture {
            slot: *self,
            raw: raw.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.group_name())
    }
}

/// `0x` (either case) plus exactly 40 hex digits.
pub fn is_hex_address(s: &str) -> bool {
    let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) else {
        return false;
    };
    hex.len() == ADDRESS_HEX_LEN && hex.bytes().all(|b| b.is_ascii_hexdigit())
}

fn is_handle(s: &str) -> bool {
    !s.is_empty()
        && s.len() <= MAX_HANDLE_LEN
        && s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}
