// Copyright (C) 2025 Category Labs, Inc.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Intent catalogue.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A recognized category of user command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Intent {
    Swap,
    Send,
    AnalyzeToken,
    AnalyzeAddress,
    CheckTwitter,
}

impl Intent {
    /// Fixed evaluation order: transactional intents before analysis,
    /// analysis before social lookups.
    pub const PRIORITY: [Intent; 5] = [
        Intent::Swap,
        Intent::Send,
        Intent::AnalyzeToken,
        Intent::AnalyzeAddress,
        Intent::CheckTwitter,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Swap => "swap",
            Self::Send => "send",
            Self::AnalyzeToken => "analyze-token",
            Self::AnalyzeAddress => "analyze-address",
            Self::CheckTwitter => "check-twitter",
        }
    }

    /// Position in [`Intent::PRIORITY`]; lower runs first.
    pub fn rank(&self) -> usize {
        Self::PRIORITY
            .iter()
            .position(|i| i == self)
            .unwrap_or(Self::PRIORITY.len())
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_name_matches_display() {
        for intent in Intent::PRIORITY {
            let json = serde_json::to_string(&intent).unwrap();
            assert_eq!(json, format!("\"{}\"", intent));
        }
    }

    #[test]
    fn ranks_follow_priority() {
        assert_eq!(Intent::Swap.rank(), 0);
        assert_eq!(Intent::CheckTwitter.rank(), 4);
        assert!(Intent::AnalyzeToken.rank() < Intent::AnalyzeAddress.rank());
    }
}
