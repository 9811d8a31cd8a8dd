// Copyright (C) 2025 Category Labs, Inc.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Monad AIO - command line entry point.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use monad_aio::config::Config;
use monad_aio::dispatch::{self, ActionExecutor};
use monad_aio::error::InterpretError;
use monad_aio::interpreter::CommandInterpreter;
use monad_aio::llm::LlmClient;
use monad_aio::server::{self, AppState};
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "monad-aio", version, about = "Natural-language commands for Monad testnet wallets")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Interpret a command, print the action and execute it
    Interpret {
        /// Command text, e.g. "swap 2 MON to 0x..."
        #[arg(required = true)]
        text: Vec<String>,

        /// Print the action without executing it
        #[arg(long)]
        dry_run: bool,
    },

    /// Read commands from stdin, one per line
    Repl,

    /// Run the HTTP middleware
    Serve {
        /// Listen port (defaults to HTTP_PORT)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Run the MCP tool server on stdio
    Mcp,

    /// List key-store wallets and their balances
    Wallets,

    /// Send MON from every wallet to every address in the address book
    Broadcast {
        /// Amount of MON per transfer
        #[arg(long)]
        amount: f64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout belongs to command output and MCP stdio.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();
    let config = Config::from_env().context("failed to load configuration")?;
    let interpreter = CommandInterpreter::builtin();
    let dispatcher = Arc::new(dispatch::connect(config.clone())?);
    let executor: Arc<dyn ActionExecutor> = dispatcher.clone();

    match cli.command {
        Command::Interpret { text, dry_run } => {
            let text = text.join(" ");
            let action = match interpreter.interpret(&text) {
                Ok(action) => action,
                Err(e) => bail!("{}", e),
            };
            println!("{}", serde_json::to_string_pretty(&action)?);

            if !dry_run {
                let outcome = executor.execute(action).await?;
                println!("{}", outcome.message);
            }
        }

        Command::Repl => {
            info!("📝 Type a command (\"exit\" to quit)");
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            loop {
                print!("> ");
                std::io::stdout().flush()?;

                let Some(line) = lines.next_line().await? else {
                    break;
                };
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if matches!(line, "exit" | "quit") {
                    break;
                }

                match interpreter.interpret(line) {
                    Ok(action) => match executor.execute(action).await {
                        Ok(outcome) => println!("{}", outcome.message),
                        Err(e) => println!("❌ {}", e),
                    },
                    Err(InterpretError::NoMatch) => {
                        println!("Command not recognized. Try \"swap 0.1 MON to 0x...\" or \"check twitter for @handle\".");
                    }
                    Err(e @ InterpretError::MalformedCapture { .. }) => println!("❌ {}", e),
                    Err(e) => error!("❌ {:?}", e),
                }
            }
        }

        Command::Serve { port } => {
            let http = reqwest::Client::builder()
                .timeout(config.http_timeout())
                .build()?;
            let state = Arc::new(AppState {
                interpreter,
                executor,
                llm: LlmClient::new(http, &config),
            });
            server::start_http_server(port.unwrap_or(config.http_port), state).await?;
        }

        Command::Mcp => {
            server::run_mcp_server(interpreter, executor)
                .await
                .map_err(|e| anyhow::anyhow!("MCP server error: {}", e))?;
        }

        Command::Wallets => {
            let wallets = dispatcher.list_wallets().await?;
            info!("👛 Found {} wallets", wallets.len());
            for wallet in wallets {
                let address = wallet.address.to_string();
                println!(
                    "{:>3}  {}  {:>24} MON  {}",
                    wallet.index,
                    address,
                    wallet.balance_mon.as_deref().unwrap_or("unknown"),
                    config.address_url(&address)
                );
            }
        }

        Command::Broadcast { amount } => {
            let outcome = dispatcher.broadcast(amount).await?;
            println!("{}", outcome.message);
        }
    }

    Ok(())
}
