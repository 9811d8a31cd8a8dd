// Copyright (C) 2025 Category Labs, Inc.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Key store - private keys and recipient lists kept in plain text files.

use crate::error::{ExecError, ExecResult};
use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use std::path::Path;
use tracing::{debug, warn};

/// Load signing keys, one per line.
///
/// Lines are trimmed; only 64 hex chars (or 66 with `0x`) are kept. Keys
/// are returned with a `0x` prefix.
pub fn load_private_keys(path: &Path) -> ExecResult<Vec<String>> {
    let data = std::fs::read_to_string(path).map_err(|e| {
        ExecError::KeyStore(format!("cannot read {}: {}", path.display(), e))
    })?;

    let keys: Vec<String> = data
        .lines()
        .map(str::trim)
        .filter(|k| k.len() == 64 || k.len() == 66)
        .map(|k| {
            if k.starts_with("0x") {
                k.to_string()
            } else {
                format!("0x{}", k)
            }
        })
        .collect();

    if keys.is_empty() {
        return Err(ExecError::KeyStore(format!(
            "no valid private keys found in {}",
            path.display()
        )));
    }

    debug!("Loaded {} private keys from {}", keys.len(), path.display());
    Ok(keys)
}

/// Load recipient addresses, one per line. Blank lines are skipped.
pub fn load_addresses(path: &Path) -> ExecResult<Vec<Address>> {
    let data = std::fs::read_to_string(path).map_err(|e| {
        ExecError::KeyStore(format!("cannot read {}: {}", path.display(), e))
    })?;

    let addresses = data
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            line.parse::<Address>()
                .map_err(|_| ExecError::InvalidAddress(line.to_string()))
        })
        .collect::<ExecResult<Vec<_>>>()?;

    if addresses.is_empty() {
        return Err(ExecError::KeyStore(format!(
            "no addresses found in {}",
            path.display()
        )));
    }

    Ok(addresses)
}

/// Addresses controlled by the keys in `path`. Keys that fail to parse are
/// skipped with a warning.
pub fn wallet_addresses(path: &Path) -> ExecResult<Vec<Address>> {
    let keys = load_private_keys(path)?;
    Ok(keys
        .iter()
        .enumerate()
        .filter_map(|(i, key)| match key.parse::<PrivateKeySigner>() {
            Ok(signer) => Some(signer.address()),
            Err(e) => {
                warn!("⚠️ Skipping key #{}: {}", i + 1, e);
                None
            }
        })
        .collect())
}
