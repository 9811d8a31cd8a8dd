// Copyright (C) 2025 Category Labs, Inc.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Twitter username history via memory.lol.

use crate::config::Config;
use crate::error::{ExecError, ExecResult};
use crate::interpreter::MAX_HANDLE_LEN;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::PathBuf;
use tracing::{info, warn};

/// Raw memory.lol response.
#[derive(Debug, Clone, Deserialize)]
pub struct MemoryLolResponse {
    #[serde(default)]
    pub accounts: Vec<MemoryLolAccount>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MemoryLolAccount {
    pub id_str: String,
    /// Screen name -> observed dates. Dates may be a list or a bare value.
    #[serde(default)]
    pub screen_names: BTreeMap<String, Value>,
}

/// Username history normalized for display and reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TwitterHistory {
    pub screen_name: String,
    pub accounts: Vec<AccountHistory>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountHistory {
    pub user_id: String,
    pub screen_names: Vec<ScreenNameRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreenNameRecord {
    pub name: String,
    pub dates: String,
}

impl TwitterHistory {
    pub fn from_response(screen_name: &str, response: MemoryLolResponse) -> Self {
        let accounts = response
            .accounts
            .into_iter()
            .map(|account| AccountHistory {
                user_id: account.id_str,
                screen_names: account
                    .screen_names
                    .into_iter()
                    .map(|(name, dates)| ScreenNameRecord {
                        name,
                        dates: join_dates(&dates),
                    })
                    .collect(),
            })
            .collect();

        Self {
            screen_name: screen_name.to_string(),
            accounts,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Human-readable history, one block per account.
    pub fn to_text(&self) -> String {
        if self.is_empty() {
            return format!("No username change history found for {}", self.screen_name);
        }

        let mut out = format!("Username change history for {}:\n", self.screen_name);
        for account in &self.accounts {
            let _ = write!(out, "\nUser ID {}:", account.user_id);
            for record in &account.screen_names {
                let _ = write!(out, "\n- {} ({})", record.name, record.dates);
            }
            out.push('\n');
        }
        out
    }
}

fn join_dates(dates: &Value) -> String {
    match dates {
        Value::Array(items) => items
            .iter()
            .map(|d| d.as_str().map(str::to_string).unwrap_or_else(|| d.to_string()))
            .collect::<Vec<_>>()
            .join(" to "),
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Strip a leading `@` and check the handle shape.
pub fn normalize_handle(raw: &str) -> ExecResult<String> {
    let handle = raw.trim();
    let handle = handle.strip_prefix('@').unwrap_or(handle);
    let valid = !handle.is_empty()
        && handle.len() <= MAX_HANDLE_LEN
        && handle.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_');
    if valid {
        Ok(handle.to_string())
    } else {
        Err(ExecError::InvalidHandle(raw.to_string()))
    }
}

/// memory.lol client.
#[derive(Debug, Clone)]
pub struct TwitterChecker {
    http: reqwest::Client,
    base_url: String,
    report_dir: Option<PathBuf>,
}

impl TwitterChecker {
    pub fn new(http: reqwest::Client, config: &Config) -> Self {
        Self {
            http,
            base_url: config.memory_lol_url.clone(),
            report_dir: config.report_dir.clone(),
        }
    }

    pub fn url_for(&self, screen_name: &str) -> String {
        format!("{}/v1/tw/{}", self.base_url, screen_name)
    }

    /// Fetch the history for `screen_name`, writing a JSON report when a
    /// report directory is configured.
    pub async fn history(&self, screen_name: &str) -> ExecResult<TwitterHistory> {
        let screen_name = normalize_handle(screen_name)?;
        info!("🐦 Querying username changes for {}", screen_name);

        let response = self.http.get(self.url_for(&screen_name)).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ExecError::NotFound(format!(
                "Twitter user {} not found in memory.lol database",
                screen_name
            )));
        }
        if !status.is_success() {
            return Err(ExecError::ApiStatus {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("unknown").to_string(),
            });
        }

        let body: MemoryLolResponse = response.json().await?;
        let history = TwitterHistory::from_response(&screen_name, body);

        if !history.is_empty() {
            if let Some(dir) = &self.report_dir {
                if let Err(e) = write_report(dir, &history).await {
                    warn!("⚠️ Failed to save Twitter report: {}", e);
                }
            }
        }

        Ok(history)
    }
}

async fn write_report(dir: &std::path::Path, history: &TwitterHistory) -> ExecResult<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(format!("twitter_history_{}.json", history.screen_name));
    let json = serde_json::to_string_pretty(history)?;
    tokio::fs::write(&path, json).await?;
    info!("💾 Twitter history saved to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> MemoryLolResponse {
        serde_json::from_value(json!({
            "accounts": [{
                "id_str": "44196397",
                "screen_names": {
                    "elonmusk": ["2010-06-03", "2023-01-01"],
                    "oldname": "2009-01-01"
                }
            }]
        }))
        .unwrap()
    }

    #[test]
    fn history_is_formatted_per_account() {
        let history = TwitterHistory::from_response("elonmusk", sample());
        let text = history.to_text();
        assert!(text.contains("User ID 44196397:\n- elonmusk (2010-06-03 to 2023-01-01)"));
        assert!(text.contains("- oldname (2009-01-01)"));
    }

    #[test]
    fn empty_accounts_are_not_an_error() {
        let response: MemoryLolResponse = serde_json::from_value(json!({ "accounts": [] })).unwrap();
        let history = TwitterHistory::from_response("nobody", response);
        assert!(history.is_empty());
        assert_eq!(history.to_text(), "No username change history found for nobody");

        let missing: MemoryLolResponse = serde_json::from_value(json!({})).unwrap();
        assert!(missing.accounts.is_empty());
    }

    #[test]
    fn handles_are_normalized() {
        assert_eq!(normalize_handle("@jack").unwrap(), "jack");
        assert_eq!(normalize_handle("under_score1").unwrap(), "under_score1");
        assert!(matches!(normalize_handle("@"), Err(ExecError::InvalidHandle(_))));
        assert!(normalize_handle("abcdefghijklmnop").is_err());
        assert!(normalize_handle("no-dash").is_err());
    }

    #[tokio::test]
    async fn report_is_written_as_json() {
        let dir = tempfile::tempdir().unwrap();
        let history = TwitterHistory::from_response("elonmusk", sample());
        let path = write_report(dir.path(), &history).await.unwrap();
        assert!(path.ends_with("twitter_history_elonmusk.json"));

        let saved: Value = serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(saved["screenName"], "elonmusk");
        assert_eq!(saved["accounts"][0]["userId"], "44196397");
    }

    #[test]
    fn url_uses_configured_base() {
        let config = Config::from_lookup(|name| {
            (name == "MEMORY_LOL_URL").then(|| "http://localhost:9999/".to_string())
        })
        .unwrap();
        let checker = TwitterChecker::new(reqwest::Client::new(), &config);
        assert_eq!(checker.url_for("jack"), "http://localhost:9999/v1/tw/jack");
    }
}
