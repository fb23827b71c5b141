//! Kete terminal client - composition root.
//!
//! 1. Parse CLI arguments and load configuration from TOML
//! 2. Initialize tracing (to stderr, so logs stay out of the conversation)
//! 3. Build the HTTP query client and the chat session
//! 4. Run the input/response/event loop until /quit or end of input
//!
//! The terminal plays the role of the page: it owns the result grid and
//! renders everything the session reports.

mod cli;
mod command;
mod view;

use std::sync::Arc;

use clap::Parser;
use kete_chat::{ChatSession, HttpQueryClient, PendingQuery, QueryClient, QueryError, ResultGrid};
use kete_core::config::KeteConfig;
use kete_core::types::QueryResponse;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::mpsc;

use cli::CliArgs;
use command::Command;

type Completion = (PendingQuery, Result<QueryResponse, QueryError>);

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config.
    let config_file = args.resolve_config_path();
    let mut config = KeteConfig::load_or_default(&config_file);
    args.apply_overrides(&mut config);

    // Tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.general.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting Kete v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration resolved");

    // Session.
    let client = Arc::new(HttpQueryClient::new(&config.endpoint)?);
    tracing::info!(url = %client.url(), "Query endpoint configured");

    let mut session = ChatSession::new(client, config.session.clone());
    let mut events = session.subscribe();
    let mut grid = ResultGrid::new();

    println!("{}", command::HELP);
    for message in session.transcript() {
        println!("{}", view::render_message(message));
    }

    // Responses come back from spawned request tasks through this channel.
    let (done_tx, mut done_rx) = mpsc::channel::<Completion>(4);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match command::parse(&line) {
                    Command::Submit(text) => match session.begin(&text) {
                        Ok(pending) => {
                            let client = session.client();
                            let tx = done_tx.clone();
                            tokio::spawn(async move {
                                let outcome = client.query(pending.text()).await;
                                if tx.send((pending, outcome)).await.is_err() {
                                    tracing::debug!("Front end gone; response dropped");
                                }
                            });
                        }
                        Err(e) => println!("{}", view::render_rejection(&e)),
                    },
                    Command::Close => {
                        if session.close_modal().is_none() {
                            println!("No order dialog is open.");
                        }
                    }
                    Command::Confirm => {
                        if session.confirm_order().is_none() {
                            println!("No order to confirm.");
                        }
                    }
                    Command::Results => println!("{}", view::render_grid(&grid)),
                    Command::History => println!("{}", view::render_transcript(session.transcript())),
                    Command::Help => println!("{}", command::HELP),
                    Command::Quit => break,
                    Command::Unknown(cmd) => println!("Unknown command {}. Type /help.", cmd),
                }
            }
            Some((pending, outcome)) = done_rx.recv() => {
                session.complete(pending, outcome);
            }
            event = events.recv() => match event {
                Ok(event) => {
                    grid.apply(&event);
                    if let Some(text) = view::render_event(&event) {
                        println!("{}", text);
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Renderer fell behind session events");
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    session.close();
    tracing::info!(messages = session.transcript().len(), "Kete stopped");
    Ok(())
}
