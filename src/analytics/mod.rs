// Copyright (C) 2025 Category Labs, Inc.
// SPDX-License-Identifier: GPL-3.0-or-later

//! On-chain lookups for tokens and accounts.

pub mod address;
pub mod token;

pub use address::{AddressLookup, AddressReport, WalletBalance};
pub use token::{TokenLookup, TokenReport};
