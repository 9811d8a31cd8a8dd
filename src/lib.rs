// Copyright (C) 2025 Category Labs, Inc.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Monad AIO - natural-language commands for Monad testnet wallets.
//!
//! Free text such as `swap 2.5 MON to 0x...` or `kirim 1 MON ke 0x...` is
//! interpreted into an [`interpreter::ActionDescriptor`] and handed to a
//! [`dispatch::ActionExecutor`]. The same pipeline backs the CLI, the HTTP
//! middleware and the MCP tool server.

pub mod analytics;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod executor;
pub mod interpreter;
pub mod keystore;
pub mod llm;
pub mod rpc;
pub mod server;
pub mod twitter;
