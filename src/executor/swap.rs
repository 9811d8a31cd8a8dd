// Copyright (C) 2025 Category Labs, Inc.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Swap execution: MON -> token through the DEX router.

use crate::config::Config;
use crate::error::{ExecError, ExecResult};
use crate::executor::gas::{latest_base_fee, GasStrategy};
use crate::executor::{BatchReport, WalletTx};
use crate::rpc::{create_provider, RpcConfig};
use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, U256};
use alloy::providers::Provider;
use alloy::rpc::types::TransactionRequest;
use alloy::sol;
use std::time::Duration;
use tracing::{debug, error, info, warn};

// Router interface for swaps
sol! {
    #[sol(rpc)]
    interface IRouter {
        function swapExactETHForTokens(
            uint256 amountOutMin,
            address[] calldata path,
            address to,
            uint256 deadline
        ) external payable returns (uint256[] memory amounts);
    }
}

/// Swap executor buying a token with MON from every key-store wallet.
#[derive(Debug, Clone)]
pub struct SwapExecutor {
    rpc_url: String,
    chain_id: u64,
    explorer_url: String,
    router: Address,
    wmon: Address,
    gas_limit: u64,
    deadline_secs: u64,
    gas_strategy: GasStrategy,
    wallet_delay: Duration,
}

impl SwapExecutor {
    pub fn from_config(config: &Config) -> Self {
        Self {
            rpc_url: config.rpc_url.clone(),
            chain_id: config.chain_id,
            explorer_url: config.explorer_url.clone(),
            router: config.router_address,
            wmon: config.wmon_address,
            gas_limit: config.swap_gas_limit,
            deadline_secs: config.swap_deadline_secs,
            gas_strategy: GasStrategy::from_multiplier(config.gas_multiplier),
            wallet_delay: config.wallet_delay(),
        }
    }

    /// Swap `amount_wei` of MON for `token` from each key in turn.
    pub async fn swap_all(&self, keys: &[String], token: Address, amount_wei: U256) -> BatchReport {
        info!(
            "🔄 Swapping {} wei MON -> {:?} from {} wallets",
            amount_wei,
            token,
            keys.len()
        );

        let mut report = BatchReport::default();
        for (i, key) in keys.iter().enumerate() {
            if i > 0 && !self.wallet_delay.is_zero() {
                debug!("Waiting {:?} before next wallet", self.wallet_delay);
                tokio::time::sleep(self.wallet_delay).await;
            }

            let rpc = RpcConfig {
                rpc_url: self.rpc_url.clone(),
                private_key: key.clone(),
                chain_id: self.chain_id,
            };
            let tx = match create_provider(&rpc) {
                Ok((provider, wallet)) => match self.swap_one(&provider, wallet, token, amount_wei).await {
                    Ok(tx) => tx,
                    Err(e) => {
                        error!("❌ Swap failed for {:?}: {}", wallet, e);
                        WalletTx::failed(wallet, &e)
                    }
                },
                Err(e) => {
                    warn!("⚠️ Skipping wallet #{}: {}", i + 1, e);
                    WalletTx::failed(Address::ZERO, &e)
                }
            };
            report.push(tx);
        }

        report
    }

    async fn swap_one<P: Provider>(
        &self,
        provider: &P,
        wallet: Address,
        token: Address,
        amount_wei: U256,
    ) -> ExecResult<WalletTx> {
        let base_fee = latest_base_fee(provider).await?;
        let (max_fee, priority_fee) = self.gas_strategy.calculate(base_fee);
        debug!(
            "Gas: base_fee={}, max_fee={}, priority={}",
            base_fee, max_fee, priority_fee
        );

        // WMON -> Token, no minimum output
        let path = vec![self.wmon, token];
        let deadline = U256::from(chrono::Utc::now().timestamp() as u64 + self.deadline_secs);

        let router = IRouter::new(self.router, provider);
        let call = router.swapExactETHForTokens(U256::ZERO, path, wallet, deadline);

        let tx = TransactionRequest::default()
            .to(self.router)
            .value(amount_wei)
            .input(call.calldata().clone().into())
            .gas_limit(self.gas_limit)
            .max_fee_per_gas(max_fee)
            .max_priority_fee_per_gas(priority_fee)
            .with_chain_id(self.chain_id);

        let pending = provider
            .send_transaction(tx)
            .await
            .map_err(|e| ExecError::Rpc(format!("failed to send tx: {}", e)))?;

        info!("📤 Swap sent from {:?}: {:?}", wallet, pending.tx_hash());

        let receipt = pending
            .get_receipt()
            .await
            .map_err(|e| ExecError::Rpc(format!("failed to get receipt: {}", e)))?;

        if receipt.status() {
            info!("✅ Swap confirmed: {:?}", receipt.transaction_hash);
        } else {
            error!("❌ Swap reverted: {:?}", receipt.transaction_hash);
        }

        Ok(WalletTx::from_receipt(wallet, &receipt, &self.explorer_url))
    }
}
