// Copyright (C) 2025 Category Labs, Inc.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Native MON transfers.

use crate::config::Config;
use crate::error::{ExecError, ExecResult};
use crate::executor::gas::{latest_base_fee, GasStrategy};
use crate::executor::{BatchReport, WalletTx};
use crate::rpc::{create_provider, RpcConfig};
use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, U256};
use alloy::providers::Provider;
use alloy::rpc::types::TransactionRequest;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Gas limit of a plain value transfer.
pub const TRANSFER_GAS_LIMIT: u64 = 21_000;

/// Sends MON from every key-store wallet.
#[derive(Debug, Clone)]
pub struct SendExecutor {
    rpc_url: String,
    chain_id: u64,
    explorer_url: String,
    gas_strategy: GasStrategy,
    wallet_delay: Duration,
}

impl SendExecutor {
    pub fn from_config(config: &Config) -> Self {
        Self {
            rpc_url: config.rpc_url.clone(),
            chain_id: config.chain_id,
            explorer_url: config.explorer_url.clone(),
            gas_strategy: GasStrategy::from_multiplier(config.gas_multiplier),
            wallet_delay: config.wallet_delay(),
        }
    }

    /// Send `amount_wei` to each recipient from each wallet.
    pub async fn send_all(&self, keys: &[String], recipients: &[Address], amount_wei: U256) -> BatchReport {
        info!(
            "💸 Sending {} wei MON to {} recipients from {} wallets",
            amount_wei,
            recipients.len(),
            keys.len()
        );

        let mut report = BatchReport::default();
        let mut first = true;
        for (i, key) in keys.iter().enumerate() {
            let rpc = RpcConfig {
                rpc_url: self.rpc_url.clone(),
                private_key: key.clone(),
                chain_id: self.chain_id,
            };
            let (provider, wallet) = match create_provider(&rpc) {
                Ok(pair) => pair,
                Err(e) => {
                    warn!("⚠️ Skipping wallet #{}: {}", i + 1, e);
                    report.push(WalletTx::failed(Address::ZERO, &e));
                    continue;
                }
            };

            for to in recipients {
                if !first && !self.wallet_delay.is_zero() {
                    tokio::time::sleep(self.wallet_delay).await;
                }
                first = false;

                let tx = match self.send_one(&provider, wallet, *to, amount_wei).await {
                    Ok(tx) => tx,
                    Err(e) => {
                        error!("❌ Send from {:?} to {:?} failed: {}", wallet, to, e);
                        WalletTx::failed(wallet, &e)
                    }
                };
                report.push(tx);
            }
        }

        report
    }

    async fn send_one<P: Provider>(
        &self,
        provider: &P,
        wallet: Address,
        to: Address,
        amount_wei: U256,
    ) -> ExecResult<WalletTx> {
        let base_fee = latest_base_fee(provider).await?;
        let (max_fee, priority_fee) = self.gas_strategy.calculate(base_fee);
        debug!("Gas: max_fee={}, priority={}", max_fee, priority_fee);

        let tx = TransactionRequest::default()
            .to(to)
            .value(amount_wei)
            .gas_limit(TRANSFER_GAS_LIMIT)
            .max_fee_per_gas(max_fee)
            .max_priority_fee_per_gas(priority_fee)
            .with_chain_id(self.chain_id);

        let pending = provider
            .send_transaction(tx)
            .await
            .map_err(|e| ExecError::Rpc(format!("failed to send tx: {}", e)))?;

        info!("📤 Transfer sent from {:?}: {:?}", wallet, pending.tx_hash());

        let receipt = pending
            .get_receipt()
            .await
            .map_err(|e| ExecError::Rpc(format!("failed to get receipt: {}", e)))?;

        if receipt.status() {
            info!(
                "✅ Transfer confirmed in block {:?}, gas used {}",
                receipt.block_number, receipt.gas_used
            );
        } else {
            error!("❌ Transfer reverted: {:?}", receipt.transaction_hash);
        }

        Ok(WalletTx::from_receipt(wallet, &receipt, &self.explorer_url))
    }
}
