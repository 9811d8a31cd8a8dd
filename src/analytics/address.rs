// Copyright (C) 2025 Category Labs, Inc.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Address lookup - balance, activity and contract detection.

use crate::error::{ExecError, ExecResult};
use alloy::primitives::utils::format_ether;
use alloy::primitives::{Address, U256};
use alloy::providers::Provider;
use serde::Serialize;
use tracing::{info, warn};

/// What could be learned about an account.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressReport {
    pub address: Address,
    pub balance_mon: String,
    pub transaction_count: u64,
    pub is_contract: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl AddressReport {
    pub fn new(address: Address, balance: U256, transaction_count: u64, is_contract: bool) -> Self {
        Self {
            address,
            balance_mon: format_ether(balance),
            transaction_count,
            is_contract,
            note: is_contract
                .then(|| "This is a contract; use the token lookup for token details".to_string()),
        }
    }

    pub fn summary(&self) -> String {
        let mut out = format!(
            "Address {:?}\nBalance: {} MON\nTransactions sent: {}\nType: {}",
            self.address,
            self.balance_mon,
            self.transaction_count,
            if self.is_contract { "contract" } else { "wallet" }
        );
        if let Some(note) = &self.note {
            out.push('\n');
            out.push_str(note);
        }
        out
    }
}

/// Balance of one key-store wallet.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletBalance {
    pub index: usize,
    pub address: Address,
    /// `None` when the balance query failed.
    pub balance_mon: Option<String>,
}

/// Reads account state over RPC.
pub struct AddressLookup<P: Provider + Clone> {
    provider: P,
}

impl<P: Provider + Clone> AddressLookup<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub async fn lookup(&self, address: Address) -> ExecResult<AddressReport> {
        let balance = self
            .provider
            .get_balance(address)
            .await
            .map_err(|e| ExecError::Rpc(format!("failed to get balance: {}", e)))?;
        let nonce = self
            .provider
            .get_transaction_count(address)
            .await
            .map_err(|e| ExecError::Rpc(format!("failed to get nonce: {}", e)))?;
        let code = self
            .provider
            .get_code_at(address)
            .await
            .map_err(|e| ExecError::Rpc(format!("failed to get code: {}", e)))?;

        let report = AddressReport::new(address, balance, nonce, !code.is_empty());
        info!(
            "🔍 Address {:?}: {} MON, {} txs, contract={}",
            address, report.balance_mon, report.transaction_count, report.is_contract
        );
        Ok(report)
    }

    /// Balances for `wallets`, in order, numbered from 1.
    pub async fn balances(&self, wallets: &[Address]) -> Vec<WalletBalance> {
        let mut out = Vec::with_capacity(wallets.len());
        for (i, address) in wallets.iter().enumerate() {
            let balance_mon = match self.provider.get_balance(*address).await {
                Ok(balance) => Some(format_ether(balance)),
                Err(e) => {
                    warn!("Failed to get balance for {:?}: {}", address, e);
                    None
                }
            };
            out.push(WalletBalance {
                index: i + 1,
                address: *address,
                balance_mon,
            });
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wallet_report() {
        let report = AddressReport::new(
            Address::ZERO,
            U256::from(2_000_000_000_000_000_000u128),
            12,
            false,
        );
        assert_eq!(report.balance_mon, "2.000000000000000000");
        assert!(report.note.is_none());
        assert!(report.summary().contains("Type: wallet"));
    }

    #[test]
    fn contract_report_points_to_token_lookup() {
        let report = AddressReport::new(Address::ZERO, U256::ZERO, 1, true);
        assert!(report.note.as_deref().unwrap_or_default().contains("token lookup"));
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["isContract"], true);
        assert_eq!(json["transactionCount"], 1);
    }
}
