//! askdb terminal client.
//!
//! Composition root for the binary:
//! 1. Load configuration from TOML
//! 2. Build the HTTP backend and the conversation engine
//! 3. Probe the answering service and print the connection banner
//! 4. Run the prompt loop: send questions, render replies, tables, charts

mod cli;
mod render;

use std::io::{self, BufRead, Write};

use clap::Parser;
use tracing::info;

use askdb_chat::ConversationEngine;
use askdb_client::HttpBackend;
use askdb_core::config::AskdbConfig;

use cli::CliArgs;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    let default_filter = args
        .resolve_log_level()
        .unwrap_or_else(|| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();

    info!("Starting askdb v{}", env!("CARGO_PKG_VERSION"));

    let config_path = args.resolve_config_path();
    let mut config = AskdbConfig::load_or_default(&config_path);
    config.backend.base_url = args.resolve_base_url(&config.backend.base_url);
    info!(
        path = %config_path.display(),
        base_url = %config.backend.base_url,
        "Configuration loaded"
    );

    let backend = HttpBackend::new(&config.backend)?;
    let base_url = backend.base_url().to_string();
    let mut engine = ConversationEngine::new(backend);

    // Startup probe; the banner stands in for the initial connectivity event.
    let healthy = engine.check_connection().await;
    engine.take_events();
    eprint!("{}", render::banner(healthy, &base_url));

    // One-shot mode: answer a single question and exit.
    if let Some(question) = args.question.as_deref() {
        ask(&mut engine, question, &config, &base_url).await;
        return Ok(());
    }

    print!("{}", render::welcome());

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        io::stdout().flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }

        match line.trim() {
            "" => continue,
            ":quit" | ":q" => break,
            ":clear" => {
                engine.clear();
                engine.clear_memory().await;
                eprint!("{}", render::events_block(&engine.take_events(), &base_url));
                print!("{}", render::cleared());
            }
            question => ask(&mut engine, question, &config, &base_url).await,
        }
    }

    info!("askdb exiting");
    Ok(())
}

/// Send one question and print the drained events plus the answer block.
async fn ask(
    engine: &mut ConversationEngine<HttpBackend>,
    question: &str,
    config: &AskdbConfig,
    base_url: &str,
) {
    println!("{}", render::loading_line());
    engine.send(question).await;
    // Notifications and connectivity changes go to stderr; the answer itself
    // stays on stdout so one-shot output pipes cleanly.
    eprint!("{}", render::events_block(&engine.take_events(), base_url));
    if let Some(message) = engine.messages().last() {
        print!("{}", render::message_block(message, &config.display));
    }
}
