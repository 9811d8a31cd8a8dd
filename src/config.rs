// Copyright (C) 2025 Category Labs, Inc.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration module - loads settings from environment variables.

use crate::error::ConfigError;
use alloy::primitives::Address;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Runtime configuration shared by the CLI, HTTP and MCP surfaces.
#[derive(Debug, Clone)]
pub struct Config {
    // RPC
    pub rpc_url: String,
    pub chain_id: u64,
    pub explorer_url: String,

    // Contracts
    pub router_address: Address,
    pub wmon_address: Address,

    // Key store
    pub private_key_file: PathBuf,
    pub address_file: PathBuf,

    // Transactions
    pub swap_gas_limit: u64,
    pub swap_deadline_secs: u64,
    pub gas_multiplier: f64,
    pub wallet_delay_ms: u64,

    // HTTP middleware
    pub http_port: u16,
    pub http_timeout_secs: u64,

    // Language model
    pub anthropic_api_key: Option<String>,
    pub llm_api_url: String,
    pub llm_model: String,
    pub llm_max_tokens: u32,

    // Social lookup
    pub memory_lol_url: String,
    pub report_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from `.env` and the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        Ok(Self {
            // RPC
            rpc_url: env.var_or("MONAD_RPC_URL", "https://testnet-rpc.monad.xyz/"),
            chain_id: env.parse_or("CHAIN_ID", 10143)?,
            explorer_url: env
                .var_or("EXPLORER_URL", "https://testnet.monadexplorer.com")
                .trim_end_matches('/')
                .to_string(),

            // Contracts
            router_address: env.address_or(
                "ROUTER_ADDRESS",
                "0xCa810D095e90Daae6e867c19DF6D9A8C56db2c89",
            )?,
            wmon_address: env.address_or(
                "WMON_ADDRESS",
                "0x760AfE86e5de5fa0Ee542fc7B7B713e1c5425701",
            )?,

            // Key store
            private_key_file: env.var_or("PRIVATE_KEY_FILE", "pvkey.txt").into(),
            address_file: env.var_or("ADDRESS_FILE", "address.txt").into(),

            // Transactions
            swap_gas_limit: env.parse_or("SWAP_GAS_LIMIT", 300_000)?,
            swap_deadline_secs: env.parse_or("SWAP_DEADLINE_SECS", 600)?,
            gas_multiplier: env.parse_or("GAS_MULTIPLIER", 1.0)?,
            wallet_delay_ms: env.parse_or("WALLET_DELAY_MS", 0)?,

            // HTTP middleware
            http_port: env.parse_or("HTTP_PORT", 4000)?,
            http_timeout_secs: env.parse_or("HTTP_TIMEOUT_SECS", 30)?,

            // Language model
            anthropic_api_key: env.optional("ANTHROPIC_API_KEY"),
            llm_api_url: env.var_or("LLM_API_URL", "https://api.anthropic.com/v1/messages"),
            llm_model: env.var_or("LLM_MODEL", "claude-3-sonnet-20240229"),
            llm_max_tokens: env.parse_or("LLM_MAX_TOKENS", 1000)?,

            // Social lookup
            memory_lol_url: env
                .var_or("MEMORY_LOL_URL", "https://api.memory.lol")
                .trim_end_matches('/')
                .to_string(),
            report_dir: env.optional("REPORT_DIR").map(PathBuf::from),
        })
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn wallet_delay(&self) -> Duration {
        Duration::from_millis(self.wallet_delay_ms)
    }

    /// Explorer link for an account or contract.
    pub fn address_url(&self, address: &str) -> String {
        format!("{}/address/{}", self.explorer_url, address)
    }
}

struct Env<F>(F);

impl<F: Fn(&str) -> Option<String>> Env<F> {
    /// Set and non-blank.
    fn optional(&self, name: &str) -> Option<String> {
        (self.0)(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn var_or(&self, name: &str, default: &str) -> String {
        self.optional(name).unwrap_or_else(|| default.to_string())
    }

    fn parse_or<T: FromStr>(&self, name: &str, default: T) -> Result<T, ConfigError> {
        match self.optional(name) {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                name: name.to_string(),
                value,
            }),
            None => Ok(default),
        }
    }

    fn address_or(&self, name: &str, default: &str) -> Result<Address, ConfigError> {
        let value = self.var_or(name, default);
        Address::from_str(&value).map_err(|_| ConfigError::Address {
            name: name.to_string(),
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_with(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(move |name| map.get(name).cloned())
    }

    #[test]
    fn defaults_target_monad_testnet() {
        let config = config_with(&[]).unwrap();
        assert_eq!(config.chain_id, 10143);
        assert_eq!(config.http_port, 4000);
        assert_eq!(config.swap_gas_limit, 300_000);
        assert_eq!(config.swap_deadline_secs, 600);
        assert_eq!(config.llm_max_tokens, 1000);
        assert_eq!(config.private_key_file, PathBuf::from("pvkey.txt"));
        assert_eq!(config.memory_lol_url, "https://api.memory.lol");
        assert!(config.anthropic_api_key.is_none());
        assert!(config.report_dir.is_none());
        assert_eq!(
            config.wmon_address,
            Address::from_str("0x760AfE86e5de5fa0Ee542fc7B7B713e1c5425701").unwrap()
        );
    }

    #[test]
    fn overrides_are_applied() {
        let config = config_with(&[
            ("HTTP_PORT", "8080"),
            ("GAS_MULTIPLIER", "2.0"),
            ("ANTHROPIC_API_KEY", "sk-test"),
            ("EXPLORER_URL", "https://explorer.example/"),
            ("REPORT_DIR", "/tmp/reports"),
        ])
        .unwrap();
        assert_eq!(config.http_port, 8080);
        assert_eq!(config.gas_multiplier, 2.0);
        assert_eq!(config.anthropic_api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.address_url("0xabc"), "https://explorer.example/address/0xabc");
        assert_eq!(config.report_dir, Some(PathBuf::from("/tmp/reports")));
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = config_with(&[("ANTHROPIC_API_KEY", "  "), ("CHAIN_ID", "")]).unwrap();
        assert!(config.anthropic_api_key.is_none());
        assert_eq!(config.chain_id, 10143);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert_eq!(
            config_with(&[("HTTP_PORT", "not-a-port")]).unwrap_err(),
            ConfigError::Invalid {
                name: "HTTP_PORT".into(),
                value: "not-a-port".into()
            }
        );
        assert!(matches!(
            config_with(&[("ROUTER_ADDRESS", "0x1234")]),
            Err(ConfigError::Address { .. })
        ));
    }
}
