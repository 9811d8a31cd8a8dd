// Copyright (C) 2025 Category Labs, Inc.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Token lookup - ERC-20 metadata and contract presence.

use alloy::primitives::utils::format_units;
use alloy::primitives::{Address, U256};
use alloy::providers::Provider;
use alloy::sol;
use serde::Serialize;
use std::fmt::Write as _;
use tracing::{info, warn};

// ERC20 metadata interface
sol! {
    #[sol(rpc)]
    interface IERC20 {
        function name() external view returns (string);
        function symbol() external view returns (string);
        function decimals() external view returns (uint8);
        function totalSupply() external view returns (uint256);
    }
}

/// What could be learned about a token contract.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenReport {
    pub token: Address,
    pub has_code: bool,
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub decimals: Option<u8>,
    pub total_supply: Option<String>,
    pub warnings: Vec<String>,
}

impl TokenReport {
    /// Assemble a report from the raw lookups. Supply is scaled by
    /// `decimals` when both are known.
    pub fn new(
        token: Address,
        has_code: bool,
        name: Option<String>,
        symbol: Option<String>,
        decimals: Option<u8>,
        raw_supply: Option<U256>,
    ) -> Self {
        let total_supply = raw_supply.map(|supply| match decimals {
            Some(d) => format_units(supply, d).unwrap_or_else(|_| supply.to_string()),
            None => supply.to_string(),
        });

        let mut warnings = Vec::new();
        if !has_code {
            warnings.push("No contract code at this address".to_string());
        }
        if has_code && name.is_none() && symbol.is_none() && total_supply.is_none() {
            warnings.push("Contract does not expose ERC-20 metadata".to_string());
        }

        Self {
            token,
            has_code,
            name,
            symbol,
            decimals,
            total_supply,
            warnings,
        }
    }

    pub fn summary(&self) -> String {
        let unknown = || "unknown".to_string();
        let mut out = format!(
            "Token {:?}\nName: {}\nSymbol: {}\nDecimals: {}\nTotal supply: {}",
            self.token,
            self.name.clone().unwrap_or_else(unknown),
            self.symbol.clone().unwrap_or_else(unknown),
            self.decimals.map(|d| d.to_string()).unwrap_or_else(unknown),
            self.total_supply.clone().unwrap_or_else(unknown),
        );
        for warning in &self.warnings {
            let _ = write!(out, "\n⚠️ {}", warning);
        }
        out
    }
}

/// Reads token metadata over RPC.
pub struct TokenLookup<P: Provider + Clone> {
    provider: P,
}

impl<P: Provider + Clone> TokenLookup<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Fetch each field independently; a failing call leaves it unknown.
    pub async fn lookup(&self, token: Address) -> TokenReport {
        let has_code = match self.provider.get_code_at(token).await {
            Ok(code) => !code.is_empty(),
            Err(e) => {
                warn!("Failed to get code for {:?}: {}", token, e);
                false
            }
        };

        let contract = IERC20::new(token, &self.provider);
        let name = contract.name().call().await.ok();
        let symbol = contract.symbol().call().await.ok();
        let decimals = contract.decimals().call().await.ok();
        let supply = contract.totalSupply().call().await.ok();

        let report = TokenReport::new(token, has_code, name, symbol, decimals, supply);
        info!(
            "🔍 Token {:?}: {} ({}), {} warnings",
            token,
            report.name.as_deref().unwrap_or("?"),
            report.symbol.as_deref().unwrap_or("?"),
            report.warnings.len()
        );
        report
    }
}
