// Copyright (C) 2025 Category Labs, Inc.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Gas strategy for transaction priority.

use crate::error::{ExecError, ExecResult};
use alloy::providers::Provider;

const GWEI: u128 = 1_000_000_000;

/// Base fee assumed when the latest block does not report one.
pub const FALLBACK_BASE_FEE: u128 = GWEI;

/// Gas strategy determines how aggressively we bid for transaction inclusion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GasStrategy {
    /// base_fee + 2 gwei priority
    #[default]
    Standard,

    /// base_fee * 1.5 + 10 gwei priority
    Aggressive,

    /// base_fee * 2.0 + 50 gwei priority
    Frontrun,
}

impl GasStrategy {
    /// Calculate max fee per gas and priority fee.
    ///
    /// Returns (max_fee_per_gas, max_priority_fee_per_gas) in wei.
    pub fn calculate(&self, base_fee: u128) -> (u128, u128) {
        let (max_fee, priority) = match self {
            Self::Standard => (base_fee, 2 * GWEI),
            Self::Aggressive => (base_fee * 150 / 100, 10 * GWEI),
            Self::Frontrun => (base_fee * 200 / 100, 50 * GWEI),
        };
        (max_fee + priority, priority)
    }

    /// Get strategy from config multiplier.
    pub fn from_multiplier(multiplier: f64) -> Self {
        if multiplier >= 2.0 {
            Self::Frontrun
        } else if multiplier >= 1.5 {
            Self::Aggressive
        } else {
            Self::Standard
        }
    }
}

/// Base fee of the latest block, or [`FALLBACK_BASE_FEE`].
pub async fn latest_base_fee<P: Provider>(provider: &P) -> ExecResult<u128> {
    let block = provider
        .get_block_by_number(alloy::eips::BlockNumberOrTag::Latest)
        .await
        .map_err(|e| ExecError::Rpc(format!("failed to get block: {}", e)))?
        .ok_or_else(|| ExecError::Rpc("no latest block".to_string()))?;

    Ok(block
        .header
        .base_fee_per_gas
        .map(|fee| fee as u128)
        .unwrap_or(FALLBACK_BASE_FEE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_adds_two_gwei() {
        assert_eq!(
            GasStrategy::Standard.calculate(FALLBACK_BASE_FEE),
            (3 * GWEI, 2 * GWEI)
        );
    }

    #[test]
    fn aggressive_and_frontrun_scale_base_fee() {
        assert_eq!(GasStrategy::Aggressive.calculate(10 * GWEI), (25 * GWEI, 10 * GWEI));
        assert_eq!(GasStrategy::Frontrun.calculate(10 * GWEI), (70 * GWEI, 50 * GWEI));
    }

    #[test]
    fn multiplier_thresholds() {
        assert_eq!(GasStrategy::from_multiplier(1.0), GasStrategy::Standard);
        assert_eq!(GasStrategy::from_multiplier(1.5), GasStrategy::Aggressive);
        assert_eq!(GasStrategy::from_multiplier(3.0), GasStrategy::Frontrun);
        assert_eq!(GasStrategy::default(), GasStrategy::Standard);
    }
}
