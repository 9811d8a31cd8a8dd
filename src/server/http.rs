// Copyright (C) 2025 Category Labs, Inc.
// SPDX-License-Identifier: GPL-3.0-or-later

//! HTTP middleware: natural-language commands and LLM-assisted prompts.

use crate::dispatch::{ActionExecutor, ExecutionOutcome};
use crate::error::{ExecResult, InterpretError};
use crate::interpreter::{ActionDescriptor, CommandInterpreter};
use crate::llm::LlmClient;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, info, warn};

const NOT_A_COMMAND: &str = "Response was not interpreted as a command";

/// Shared server state.
pub struct AppState {
    pub interpreter: CommandInterpreter<'static>,
    pub executor: Arc<dyn ActionExecutor>,
    pub llm: LlmClient,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommandRequest {
    #[serde(default)]
    pub command: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub prompt: Option<String>,
}

/// `result` of a successful command.
#[derive(Debug, Clone, Serialize)]
pub struct CommandResult {
    pub message: String,
    pub action: ActionDescriptor,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl CommandResult {
    fn new(action: ActionDescriptor, outcome: ExecutionOutcome) -> Self {
        Self {
            message: outcome.message,
            action,
            data: outcome.data,
        }
    }
}

type Reply = (StatusCode, Json<Value>);

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/command", post(handle_command))
        .route("/ask", post(handle_ask))
        .route("/health", get(health_check))
        .with_state(state)
}

/// Start the HTTP middleware.
pub async fn start_http_server(port: u16, state: Arc<AppState>) -> ExecResult<()> {
    let addr = format!("0.0.0.0:{}", port);
    info!("🌐 Starting middleware server on {}", addr);
    info!("   POST /command {{\"command\": \"swap 2 MON to 0x...\"}}");
    info!("   POST /ask     {{\"prompt\": \"your question\"}}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router(state)).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}

fn error_reply(status: StatusCode, message: impl Into<String>) -> Reply {
    (
        status,
        Json(json!({ "status": "error", "message": message.into() })),
    )
}

/// Interpret `text` and run it. Errors carry the HTTP status to use.
async fn interpret_and_execute(state: &AppState, text: &str) -> Result<CommandResult, Reply> {
    let action = state.interpreter.interpret(text).map_err(|e| match e {
        InterpretError::InternalInconsistency { .. } => {
            error_reply(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
        _ => error_reply(StatusCode::BAD_REQUEST, e.to_string()),
    })?;

    match state.executor.execute(action.clone()).await {
        Ok(outcome) => Ok(CommandResult::new(action, outcome)),
        Err(e) => {
            warn!("⚠️ {} failed: {}", action.intent(), e);
            Err(error_reply(StatusCode::BAD_REQUEST, e.to_string()))
        }
    }
}

pub async fn handle_command(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CommandRequest>,
) -> Reply {
    let Some(command) = request.command.filter(|c| !c.trim().is_empty()) else {
        return error_reply(StatusCode::BAD_REQUEST, "Command is required");
    };

    match interpret_and_execute(&state, &command).await {
        Ok(result) => (
            StatusCode::OK,
            Json(json!({ "status": "success", "result": result })),
        ),
        Err(reply) => reply,
    }
}

pub async fn handle_ask(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AskRequest>,
) -> Reply {
    let Some(prompt) = request.prompt.filter(|p| !p.trim().is_empty()) else {
        return error_reply(StatusCode::BAD_REQUEST, "Prompt is required");
    };

    let llm_response = match state.llm.ask(&prompt).await {
        Ok(text) => text,
        Err(e) => {
            error!("❌ Error querying LLM: {}", e);
            return error_reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to get response from language model",
            );
        }
    };

    let body = match interpret_and_execute(&state, &llm_response).await {
        Ok(result) => json!({
            "status": "success",
            "llmResponse": llm_response,
            "executionResult": result,
        }),
        Err(_) => json!({
            "status": "success",
            "llmResponse": llm_response,
            "note": NOT_A_COMMAND,
        }),
    };

    (StatusCode::OK, Json(body))
}
