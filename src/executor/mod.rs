// Copyright (C) 2025 Category Labs, Inc.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Transaction execution module.
//!
//! Every executor signs with each key in the key store in turn. A wallet
//! that fails is recorded in the [`BatchReport`] and the batch carries on.

pub mod gas;
pub mod send;
pub mod swap;

pub use gas::GasStrategy;
pub use send::SendExecutor;
pub use swap::SwapExecutor;

use crate::error::{ExecError, ExecResult};
use alloy::primitives::utils::parse_ether;
use alloy::primitives::{Address, U256};
use alloy::rpc::types::TransactionReceipt;
use serde::Serialize;
use std::fmt::Write as _;

/// Convert a MON amount to wei (18 decimals). Uses the shortest decimal
/// form of `mon`, so `0.1` is exactly 10^17 wei.
pub fn mon_to_wei(mon: f64) -> ExecResult<U256> {
    if !mon.is_finite() || mon < 0.0 {
        return Err(ExecError::InvalidAmount(mon.to_string()));
    }
    parse_ether(&mon.to_string()).map_err(|e| ExecError::InvalidAmount(format!("{mon}: {e}")))
}

/// Result of one wallet's transaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletTx {
    pub wallet: Address,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explorer_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_used: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl WalletTx {
    pub fn from_receipt(wallet: Address, receipt: &TransactionReceipt, explorer_url: &str) -> Self {
        let tx_hash = format!("{:?}", receipt.transaction_hash);
        Self {
            wallet,
            success: receipt.status(),
            explorer_url: Some(format!("{}/tx/{}", explorer_url, tx_hash)),
            tx_hash: Some(tx_hash),
            gas_used: Some(receipt.gas_used),
            block_number: receipt.block_number,
            error: (!receipt.status()).then(|| "transaction reverted".to_string()),
        }
    }

    pub fn failed(wallet: Address, error: &ExecError) -> Self {
        Self {
            wallet,
            success: false,
            tx_hash: None,
            explorer_url: None,
            gas_used: None,
            block_number: None,
            error: Some(error.to_string()),
        }
    }
}

/// Per-wallet results of one batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub succeeded: usize,
    pub failed: usize,
    pub transactions: Vec<WalletTx>,
}

impl BatchReport {
    pub fn push(&mut self, tx: WalletTx) {
        if tx.success {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
        self.transactions.push(tx);
    }

    /// One line per wallet, prefixed with the totals.
    pub fn summary(&self) -> String {
        let mut out = format!(
            "{} of {} wallets succeeded",
            self.succeeded,
            self.transactions.len()
        );
        for tx in &self.transactions {
            let detail = match (&tx.tx_hash, &tx.error) {
                (Some(hash), None) => hash.clone(),
                (Some(hash), Some(err)) => format!("{} ({})", hash, err),
                (None, Some(err)) => err.clone(),
                (None, None) => String::new(),
            };
            let mark = if tx.success { "✅" } else { "❌" };
            let _ = write!(out, "\n{} {:?}: {}", mark, tx.wallet, detail);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mon_to_wei_is_exact_for_decimal_input() {
        assert_eq!(mon_to_wei(2.5).unwrap(), U256::from(2_500_000_000_000_000_000u128));
        assert_eq!(mon_to_wei(0.000001).unwrap(), U256::from(1_000_000_000_000u128));
        assert_eq!(mon_to_wei(0.0).unwrap(), U256::ZERO);
        assert_eq!(mon_to_wei(0.1).unwrap(), U256::from(100_000_000_000_000_000u128));
        assert_eq!(mon_to_wei(0.3).unwrap(), U256::from(300_000_000_000_000_000u128));
        assert_eq!(mon_to_wei(1e-7).unwrap(), U256::from(100_000_000_000u128));
    }

    #[test]
    fn mon_to_wei_rejects_unusable_amounts() {
        assert!(matches!(mon_to_wei(-1.0), Err(ExecError::InvalidAmount(_))));
        assert!(matches!(mon_to_wei(f64::INFINITY), Err(ExecError::InvalidAmount(_))));
    }

    #[test]
    fn batch_report_counts_and_summarizes() {
        let mut report = BatchReport::default();
        report.push(WalletTx {
            wallet: Address::ZERO,
            success: true,
            tx_hash: Some("0xaa".into()),
            explorer_url: None,
            gas_used: Some(21000),
            block_number: Some(7),
            error: None,
        });
        report.push(WalletTx::failed(
            Address::ZERO,
            &ExecError::Rpc("insufficient funds".into()),
        ));

        assert_eq!((report.succeeded, report.failed), (1, 1));
        let summary = report.summary();
        assert!(summary.starts_with("1 of 2 wallets succeeded"));
        assert!(summary.contains("0xaa"));
        assert!(summary.contains("rpc error: insufficient funds"));
    }
}
