// Copyright (C) 2025 Category Labs, Inc.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Routes interpreted actions to the collaborator that carries them out.

use crate::analytics::{AddressLookup, TokenLookup, WalletBalance};
use crate::config::Config;
use crate::error::{ExecError, ExecResult};
use crate::executor::{mon_to_wei, BatchReport, SendExecutor, SwapExecutor};
use crate::interpreter::ActionDescriptor;
use crate::keystore;
use crate::rpc::create_read_provider;
use crate::twitter::TwitterChecker;
use alloy::primitives::Address;
use alloy::providers::Provider;
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use serde::Serialize;
use serde_json::Value;
use std::str::FromStr;
use tracing::info;

/// What a collaborator reports back.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionOutcome {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ExecutionOutcome {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// Executes action descriptors. Object safe so surfaces can hold
/// `Arc<dyn ActionExecutor>`.
pub trait ActionExecutor: Send + Sync {
    fn execute(&self, action: ActionDescriptor) -> BoxFuture<'_, ExecResult<ExecutionOutcome>>;
}

/// Production executor backed by the chain, memory.lol and the key store.
pub struct Dispatcher<P: Provider + Clone> {
    config: Config,
    swap: SwapExecutor,
    send: SendExecutor,
    tokens: TokenLookup<P>,
    addresses: AddressLookup<P>,
    twitter: TwitterChecker,
}

/// Build a dispatcher with its own read provider and HTTP client.
pub fn connect(config: Config) -> ExecResult<Dispatcher<impl Provider + Clone + 'static>> {
    let provider = create_read_provider(&config.rpc_url)?;
    let http = reqwest::Client::builder()
        .timeout(config.http_timeout())
        .build()?;
    Ok(Dispatcher::new(config, provider, http))
}

impl<P: Provider + Clone> Dispatcher<P> {
    pub fn new(config: Config, provider: P, http: reqwest::Client) -> Self {
        Self {
            swap: SwapExecutor::from_config(&config),
            send: SendExecutor::from_config(&config),
            tokens: TokenLookup::new(provider.clone()),
            addresses: AddressLookup::new(provider),
            twitter: TwitterChecker::new(http, &config),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Key-store wallets with their balances.
    pub async fn list_wallets(&self) -> ExecResult<Vec<WalletBalance>> {
        let wallets = keystore::wallet_addresses(&self.config.private_key_file)?;
        Ok(self.addresses.balances(&wallets).await)
    }

    /// Send `amount` MON from every wallet to every address in the
    /// address book.
    pub async fn broadcast(&self, amount: f64) -> ExecResult<ExecutionOutcome> {
        let recipients = keystore::load_addresses(&self.config.address_file)?;
        let amount_wei = mon_to_wei(amount)?;
        let keys = keystore::load_private_keys(&self.config.private_key_file)?;
        let report = self.send.send_all(&keys, &recipients, amount_wei).await;
        batch_outcome(
            format!(
                "Broadcast executed: {} MON to {} addresses",
                amount,
                recipients.len()
            ),
            report,
        )
    }

    async fn run(&self, action: ActionDescriptor) -> ExecResult<ExecutionOutcome> {
        info!("⚡ Executing {}", action.describe());

        match action {
            ActionDescriptor::Swap {
                amount,
                contract_address,
            } => {
                let token = parse_address(&contract_address)?;
                let amount_wei = mon_to_wei(amount)?;
                let keys = keystore::load_private_keys(&self.config.private_key_file)?;
                let report = self.swap.swap_all(&keys, token, amount_wei).await;
                batch_outcome(
                    format!("Swap executed: {} MON to {}", amount, contract_address),
                    report,
                )
            }
            ActionDescriptor::Send { amount, to_address } => {
                let to = parse_address(&to_address)?;
                let amount_wei = mon_to_wei(amount)?;
                let keys = keystore::load_private_keys(&self.config.private_key_file)?;
                let report = self.send.send_all(&keys, &[to], amount_wei).await;
                batch_outcome(
                    format!("Send executed: {} MON to {}", amount, to_address),
                    report,
                )
            }
            ActionDescriptor::AnalyzeToken { token_address } => {
                let token = parse_address(&token_address)?;
                let report = self.tokens.lookup(token).await;
                Ok(ExecutionOutcome::new(report.summary()).with_data(serde_json::to_value(&report)?))
            }
            ActionDescriptor::AnalyzeAddress { address } => {
                let address = parse_address(&address)?;
                let report = self.addresses.lookup(address).await?;
                Ok(ExecutionOutcome::new(report.summary()).with_data(serde_json::to_value(&report)?))
            }
            ActionDescriptor::CheckTwitter { screen_name } => {
                let history = self.twitter.history(&screen_name).await?;
                Ok(ExecutionOutcome::new(history.to_text())
                    .with_data(serde_json::to_value(&history)?))
            }
        }
    }
}

impl<P: Provider + Clone + 'static> ActionExecutor for Dispatcher<P> {
    fn execute(&self, action: ActionDescriptor) -> BoxFuture<'_, ExecResult<ExecutionOutcome>> {
        self.run(action).boxed()
    }
}

fn parse_address(s: &str) -> ExecResult<Address> {
    Address::from_str(s).map_err(|_| ExecError::InvalidAddress(s.to_string()))
}

/// A batch where no wallet succeeded is a failure.
fn batch_outcome(headline: String, report: BatchReport) -> ExecResult<ExecutionOutcome> {
    if report.succeeded == 0 {
        return Err(ExecError::Rpc(format!(
            "no wallet completed the transaction\n{}",
            report.summary()
        )));
    }
    let message = format!("{}\n{}", headline, report.summary());
    Ok(ExecutionOutcome::new(message).with_data(serde_json::to_value(&report)?))
}
