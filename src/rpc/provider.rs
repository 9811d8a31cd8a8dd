// Copyright (C) 2025 Category Labs, Inc.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Provider setup and configuration for Monad RPC.

use crate::error::{ExecError, ExecResult};
use alloy::{
    network::EthereumWallet,
    primitives::Address,
    providers::{Provider, ProviderBuilder},
    signers::local::PrivateKeySigner,
    transports::http::reqwest::Url,
};

/// Configuration for a signing RPC connection.
#[derive(Debug, Clone)]
pub struct RpcConfig {
    pub rpc_url: String,
    pub private_key: String,
    pub chain_id: u64,
}

/// Create a provider with signer from config. Returns the provider and the
/// signer's address.
pub fn create_provider(config: &RpcConfig) -> ExecResult<(impl Provider + Clone, Address)> {
    let signer: PrivateKeySigner = config
        .private_key
        .parse()
        .map_err(|e| ExecError::KeyStore(format!("invalid private key: {e}")))?;

    let address = signer.address();
    let wallet = EthereumWallet::from(signer);
    let url = parse_url(&config.rpc_url)?;

    let provider = ProviderBuilder::new().wallet(wallet).connect_http(url);

    Ok((provider, address))
}

/// Create a provider for read-only queries.
pub fn create_read_provider(rpc_url: &str) -> ExecResult<impl Provider + Clone> {
    let url = parse_url(rpc_url)?;
    Ok(ProviderBuilder::new().connect_http(url))
}

fn parse_url(rpc_url: &str) -> ExecResult<Url> {
    rpc_url
        .parse()
        .map_err(|e| ExecError::Rpc(format!("invalid RPC URL {rpc_url}: {e}")))
}
