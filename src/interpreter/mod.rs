// Copyright (C) 2025 Category Labs, Inc.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Natural-language command interpreter.
//!
//! Free text goes through the [`Matcher`] (first registered pattern wins, in
//! intent priority order) and the [`Resolver`] (canonical, typed parameters)
//! to produce an [`ActionDescriptor`].

mod intent;
mod matcher;
mod registry;
mod resolver;
mod slot;

pub use intent::Intent;
pub use matcher::{MatchResult, Matcher};
pub use registry::{Pattern, PatternRegistry, RegistryBuilder, BUILTIN_REGISTRY};
pub use resolver::{ActionDescriptor, Resolver};
pub use slot::{is_hex_address, SlotKind, SlotValue, ADDRESS_HEX_LEN, MAX_HANDLE_LEN};

use crate::error::InterpretError;
use tracing::debug;

/// Matcher and resolver bound to one registry.
#[derive(Debug, Clone, Copy)]
pub struct CommandInterpreter<'r> {
    registry: &'r PatternRegistry,
}

impl CommandInterpreter<'static> {
    /// Interpreter over the shared built-in registry.
    pub fn builtin() -> Self {
        Self::new(&BUILTIN_REGISTRY)
    }
}

impl Default for CommandInterpreter<'static> {
    fn default() -> Self {
        Self::builtin()
    }
}

impl<'r> CommandInterpreter<'r> {
    pub fn new(registry: &'r PatternRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r PatternRegistry {
        self.registry
    }

    /// Match only, without resolving.
    pub fn find(&self, text: &str) -> Result<MatchResult, InterpretError> {
        Matcher::new(self.registry).find(text)
    }

    /// Interpret `text` into an action descriptor.
    pub fn interpret(&self, text: &str) -> Result<ActionDescriptor, InterpretError> {
        let m = self.find(text)?;
        let action = Resolver::new(self.registry).resolve(&m)?;
        debug!("Interpreted {:?} as {}", text, action.describe());
        Ok(action)
    }
}
