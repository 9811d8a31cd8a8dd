// Copyright (C) 2025 Category Labs, Inc.
// SPDX-License-Identifier: GPL-3.0-or-later

//! MCP tool server over stdio.
//!
//! Tool failures are reported as error results with a JSON body
//! `{"error": code, "message": text}`; they never fail the transport.

use std::fmt::Display;
use std::sync::Arc;

use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    schemars,
    schemars::JsonSchema,
    tool, tool_handler, tool_router, ErrorData as McpError,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::dispatch::ActionExecutor;
use crate::error::InterpretError;
use crate::interpreter::{ActionDescriptor, CommandInterpreter, Intent, SlotKind, SlotValue};
use crate::server::error_code;

const SWAP_NOT_UNDERSTOOD: &str =
    "Could not understand the command. Please specify the amount and contract address.";

/// Input for tools taking a natural-language command.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CommandInput {
    /// Natural-language command, e.g. "swap 2 MON to 0x...".
    pub command: String,
}

/// Input for `analyze-token`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct TokenInput {
    /// Token contract address (0x followed by 40 hex digits).
    pub token_address: String,
}

/// Input for `analyze-address`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AddressInput {
    /// Wallet or contract address (0x followed by 40 hex digits).
    pub address: String,
}

/// Input for `check-twitter`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct TwitterInput {
    /// Twitter screen name, with or without a leading @.
    pub screen_name: String,
}

#[derive(Clone)]
pub struct CommandMcpServer {
    interpreter: CommandInterpreter<'static>,
    executor: Arc<dyn ActionExecutor>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl CommandMcpServer {
    pub fn new(interpreter: CommandInterpreter<'static>, executor: Arc<dyn ActionExecutor>) -> Self {
        Self {
            interpreter,
            executor,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(
        name = "interpret-command",
        description = "Interpret a natural-language command (swap, send, analyze token, analyze address, check Twitter history) and execute it."
    )]
    async fn interpret_command(
        &self,
        Parameters(input): Parameters<CommandInput>,
    ) -> Result<CallToolResult, McpError> {
        debug!("interpret-command: {:?}", input.command);
        match self.interpreter.interpret(&input.command) {
            Ok(action) => self.run(action).await,
            Err(e) => Ok(interpret_error(&e)),
        }
    }

    #[tool(
        name = "swap-mon",
        description = "Swap MON to a token using a natural-language command, e.g. \"swap 0.1 MON to 0x...\"."
    )]
    async fn swap_mon(
        &self,
        Parameters(input): Parameters<CommandInput>,
    ) -> Result<CallToolResult, McpError> {
        match self.interpreter.interpret(&input.command) {
            Ok(action) if action.intent() == Intent::Swap => self.run(action).await,
            Err(e @ InterpretError::InternalInconsistency { .. }) => Ok(interpret_error(&e)),
            _ => Ok(tool_error("not_understood", SWAP_NOT_UNDERSTOOD)),
        }
    }

    #[tool(
        name = "analyze-token",
        description = "Look up ERC-20 metadata and contract presence for a token address."
    )]
    async fn analyze_token(
        &self,
        Parameters(input): Parameters<TokenInput>,
    ) -> Result<CallToolResult, McpError> {
        match SlotKind::Address.convert(input.token_address.trim()) {
            Ok(SlotValue::Address(token_address)) => {
                self.run(ActionDescriptor::AnalyzeToken { token_address }).await
            }
            Ok(_) => Ok(tool_error("internal", "internal error")),
            Err(e) => Ok(tool_error("invalid_input", e)),
        }
    }

    #[tool(
        name = "analyze-address",
        description = "Look up balance, transaction count and contract status for an address."
    )]
    async fn analyze_address(
        &self,
        Parameters(input): Parameters<AddressInput>,
    ) -> Result<CallToolResult, McpError> {
        match SlotKind::Address.convert(input.address.trim()) {
            Ok(SlotValue::Address(address)) => {
                self.run(ActionDescriptor::AnalyzeAddress { address }).await
            }
            Ok(_) => Ok(tool_error("internal", "internal error")),
            Err(e) => Ok(tool_error("invalid_input", e)),
        }
    }

    #[tool(
        name = "check-twitter",
        description = "Show the username change history of a Twitter account via memory.lol."
    )]
    async fn check_twitter(
        &self,
        Parameters(input): Parameters<TwitterInput>,
    ) -> Result<CallToolResult, McpError> {
        match SlotKind::Handle.convert(input.screen_name.trim()) {
            Ok(SlotValue::Handle(screen_name)) => {
                self.run(ActionDescriptor::CheckTwitter { screen_name }).await
            }
            Ok(_) => Ok(tool_error("internal", "internal error")),
            Err(e) => Ok(tool_error("invalid_input", e)),
        }
    }
}

impl CommandMcpServer {
    async fn run(&self, action: ActionDescriptor) -> Result<CallToolResult, McpError> {
        match self.executor.execute(action.clone()).await {
            Ok(outcome) => {
                let body = json!({ "action": action, "result": outcome });
                let text = serde_json::to_string_pretty(&body)
                    .map_err(|e| McpError::internal_error(e.to_string(), None))?;
                Ok(CallToolResult::success(vec![Content::text(text)]))
            }
            Err(e) => {
                warn!("⚠️ {} failed: {}", action.intent(), e);
                Ok(tool_error("execution_failed", e))
            }
        }
    }
}

fn interpret_error(err: &InterpretError) -> CallToolResult {
    tool_error(error_code(err), err)
}

fn tool_error(code: &str, message: impl Display) -> CallToolResult {
    let body = json!({ "error": code, "message": message.to_string() });
    CallToolResult::error(vec![Content::text(body.to_string())])
}

#[tool_handler]
impl rmcp::ServerHandler for CommandMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "Monad command tools. Use `interpret-command` for free text such as \
                 \"swap 2 MON to 0x...\" or \"kirim 1 MON ke 0x...\", or the structured \
                 `analyze-token`, `analyze-address` and `check-twitter` tools."
                    .into(),
            ),
        }
    }
}

/// Run the MCP server on stdio transport.
pub async fn run_mcp_server(
    interpreter: CommandInterpreter<'static>,
    executor: Arc<dyn ActionExecutor>,
) -> Result<(), Box<dyn std::error::Error>> {
    use rmcp::{transport::stdio, ServiceExt};

    info!("🔌 Starting MCP server on stdio");

    let server = CommandMcpServer::new(interpreter, executor);
    let service = server.serve(stdio()).await?;
    service.waiting().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::testing::RecordingExecutor;
    use serde_json::Value;

    const ADDR: &str = "0x1111111111111111111111111111111111111111";

    fn server(executor: Arc<RecordingExecutor>) -> CommandMcpServer {
        CommandMcpServer::new(CommandInterpreter::builtin(), executor)
    }

    /// Parse the JSON text of the first content block.
    fn body(result: &CallToolResult) -> Value {
        let json = serde_json::to_value(result).unwrap();
        let text = json["content"][0]["text"].as_str().unwrap().to_string();
        serde_json::from_str(&text).unwrap()
    }

    fn command(text: &str) -> Parameters<CommandInput> {
        Parameters(CommandInput {
            command: text.to_string(),
        })
    }

    #[tokio::test]
    async fn interpret_command_dispatches_any_intent() {
        let executor = Arc::new(RecordingExecutor::default());
        let result = server(executor.clone())
            .interpret_command(command("check twitter history for @elonmusk"))
            .await
            .unwrap();

        assert!(!result.is_error.unwrap_or(false));
        assert_eq!(body(&result)["action"]["params"]["screenName"], "elonmusk");
        assert_eq!(
            executor.calls(),
            vec![ActionDescriptor::CheckTwitter {
                screen_name: "elonmusk".into()
            }]
        );
    }

    #[tokio::test]
    async fn unmatched_command_is_a_tool_error() {
        let executor = Arc::new(RecordingExecutor::default());
        let result = server(executor.clone())
            .interpret_command(command("hello world"))
            .await
            .unwrap();

        assert!(result.is_error.unwrap_or(false));
        assert_eq!(body(&result)["error"], "no_match");
        assert!(executor.calls().is_empty());
    }

    #[tokio::test]
    async fn swap_mon_rejects_other_intents() {
        let executor = Arc::new(RecordingExecutor::default());
        let srv = server(executor.clone());

        let result = srv
            .swap_mon(command(&format!("send 1 MON to {ADDR}")))
            .await
            .unwrap();
        assert!(result.is_error.unwrap_or(false));
        assert_eq!(body(&result)["message"], SWAP_NOT_UNDERSTOOD);

        let result = srv
            .swap_mon(command(&format!("tukar 0.5 MON ke {ADDR}")))
            .await
            .unwrap();
        assert!(!result.is_error.unwrap_or(false));
        assert_eq!(executor.calls().len(), 1);
    }

    #[tokio::test]
    async fn structured_inputs_are_validated() {
        let executor = Arc::new(RecordingExecutor::default());
        let srv = server(executor.clone());

        let result = srv
            .analyze_token(Parameters(TokenInput {
                token_address: "0x1234".into(),
            }))
            .await
            .unwrap();
        assert!(result.is_error.unwrap_or(false));
        assert_eq!(body(&result)["error"], "invalid_input");

        let result = srv
            .check_twitter(Parameters(TwitterInput {
                screen_name: "@jack".into(),
            }))
            .await
            .unwrap();
        assert!(!result.is_error.unwrap_or(false));
        assert_eq!(
            executor.calls(),
            vec![ActionDescriptor::CheckTwitter {
                screen_name: "jack".into()
            }]
        );
    }

    #[tokio::test]
    async fn execution_failure_is_a_tool_error() {
        let executor = Arc::new(RecordingExecutor::failing());
        let result = server(executor)
            .analyze_address(Parameters(AddressInput {
                address: ADDR.into(),
            }))
            .await
            .unwrap();
        assert!(result.is_error.unwrap_or(false));
        assert_eq!(body(&result)["error"], "execution_failed");
    }

    #[test]
    fn server_info_enables_tools() {
        let info = rmcp::ServerHandler::get_info(&server(Arc::new(RecordingExecutor::default())));
        assert!(info.capabilities.tools.is_some());
    }
}
