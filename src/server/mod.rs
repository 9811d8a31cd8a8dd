// Copyright (C) 2025 Category Labs, Inc.
// SPDX-License-Identifier: GPL-3.0-or-later

//! External surfaces: HTTP middleware and MCP tool server.

pub mod http;
pub mod mcp;

pub use http::{start_http_server, AppState};
pub use mcp::{run_mcp_server, CommandMcpServer};

use crate::error::InterpretError;

/// Stable machine-readable code for an interpretation failure.
pub fn error_code(err: &InterpretError) -> &'static str {
    match err {
        InterpretError::NoMatch => "no_match",
        InterpretError::MalformedCapture { .. } => "malformed_capture",
        InterpretError::InternalInconsistency { .. } => "internal",
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::dispatch::{ActionExecutor, ExecutionOutcome};
    use crate::error::{ExecError, ExecResult};
    use crate::interpreter::ActionDescriptor;
    use futures_util::future::BoxFuture;
    use futures_util::FutureExt;
    use std::sync::Mutex;

    /// Records every action and answers without touching the network.
    #[derive(Default)]
    pub struct RecordingExecutor {
        pub calls: Mutex<Vec<ActionDescriptor>>,
        pub fail: bool,
    }

    impl RecordingExecutor {
        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        pub fn calls(&self) -> Vec<ActionDescriptor> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl ActionExecutor for RecordingExecutor {
        fn execute(&self, action: ActionDescriptor) -> BoxFuture<'_, ExecResult<ExecutionOutcome>> {
            let message = format!("done: {}", action.describe());
            self.calls.lock().unwrap().push(action);
            let fail = self.fail;
            async move {
                if fail {
                    Err(ExecError::Rpc("insufficient funds".into()))
                } else {
                    Ok(ExecutionOutcome::new(message))
                }
            }
            .boxed()
        }
    }
}
