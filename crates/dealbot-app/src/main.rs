//! dealbot application binary - composition root.
//!
//! `dealbot serve` runs the mock search provider; `dealbot chat` runs the
//! terminal shopping assistant against a provider:
//! 1. Load configuration from TOML
//! 2. Open the local SQLite key-value store and restore the conversation
//! 3. Build the chat controller (HTTP provider, optional voice)
//! 4. Read commands and queries from stdin until `/quit` or EOF

mod cli;
mod render;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};

use dealbot_api::{AppState, Catalog};
use dealbot_chat::{
    ChatController, ChatError, ConversationStore, HttpSearchProvider, ScriptedRecognizer,
};
use dealbot_core::config::{expand_home, DealbotConfig};
use dealbot_core::types::{PlatformFilter, SortBy};
use dealbot_storage::{Database, SqliteKvStore};

use cli::{CliArgs, Command};

type StdinLines = Lines<BufReader<Stdin>>;

async fn run_server(
    mut config: DealbotConfig,
    host: Option<String>,
    port: Option<u16>,
    catalog: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(host) = host {
        config.server.host = host;
    }
    config.server.port = cli::resolve_port(port, config.server.port);

    let catalog_path = catalog.or_else(|| config.catalog.path.as_deref().map(expand_home));
    let catalog = Catalog::load(catalog_path.as_deref())?;
    tracing::info!(products = catalog.len(), "Catalog ready");

    dealbot_api::start_server(AppState::new(config, catalog)).await?;
    Ok(())
}

async fn prompt(out: &mut tokio::io::Stdout, text: &str) -> std::io::Result<()> {
    out.write_all(text.as_bytes()).await?;
    out.flush().await
}

/// Run one search with the typing indicator shown while it is in flight.
async fn search(
    ctrl: &mut ChatController,
    out: &mut tokio::io::Stdout,
) -> Result<(), Box<dyn std::error::Error>> {
    let ticket = match ctrl.submit() {
        Ok(t) => t,
        Err(ChatError::EmptyMessage) => return Ok(()),
        Err(e) => {
            prompt(out, &format!("! {}\n", e)).await?;
            return Ok(());
        }
    };
    prompt(out, &render::render_view(ctrl)).await?;

    let outcome = ctrl.provider().search(&ticket.query).await;
    ctrl.complete(&ticket, outcome);
    prompt(out, &render::render_view(ctrl)).await?;
    Ok(())
}

/// `/voice`: with voice enabled the next typed line stands in for the
/// recognized utterance.
async fn voice(
    ctrl: &mut ChatController,
    recognizer: Option<&ScriptedRecognizer>,
    lines: &mut StdinLines,
    out: &mut tokio::io::Stdout,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some(recognizer) = recognizer else {
        let err = ctrl.start_listening().err().unwrap_or(ChatError::VoiceUnavailable);
        prompt(out, &format!("! {}\n", err)).await?;
        return Ok(());
    };

    prompt(out, "  (listening) > ").await?;
    match lines.next_line().await? {
        Some(line) if !line.trim().is_empty() => recognizer.push(Ok(line)),
        _ => recognizer.push(Err(ChatError::Voice("no-speech".to_string()))),
    }

    match ctrl.send_voice().await {
        Ok(_) => prompt(out, &render::render_view(ctrl)).await?,
        Err(e) => prompt(out, &format!("! {}\n", e)).await?,
    }
    Ok(())
}

async fn run_chat(
    mut config: DealbotConfig,
    provider_url: Option<String>,
    data_dir: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(url) = provider_url {
        config.provider.base_url = url;
    }
    if let Some(dir) = data_dir {
        config.general.data_dir = dir.to_string_lossy().to_string();
    }

    let data_dir = expand_home(&config.general.data_dir);
    if let Err(e) = std::fs::create_dir_all(&data_dir) {
        tracing::error!(path = %data_dir.display(), error = %e, "Failed to create data directory");
        return Err(e.into());
    }

    let db_path = config.database_path();
    let db = Arc::new(Database::new(&db_path)?);
    tracing::info!(path = %db_path.display(), "SQLite database opened");

    let store = ConversationStore::load(
        Arc::new(SqliteKvStore::new(db)),
        config.storage.history_key.clone(),
    );
    let provider = Arc::new(HttpSearchProvider::from_config(&config.provider)?);
    tracing::info!(provider = %provider.base_url(), "Search provider configured");

    let mut ctrl = ChatController::new(store, provider);
    let recognizer = if config.voice.enabled {
        let recognizer = Arc::new(ScriptedRecognizer::default());
        ctrl = ctrl.with_voice(recognizer.clone(), config.voice.language.clone());
        Some(recognizer)
    } else {
        None
    };

    let mut out = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    prompt(&mut out, &format!("{}\n\n", render::HELP)).await?;
    prompt(&mut out, &render::render_view(&ctrl)).await?;

    loop {
        prompt(&mut out, "> ").await?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();

        let mut words = line.split_whitespace();
        match words.next() {
            Some("/quit") | Some("/exit") => break,
            Some("/help") => prompt(&mut out, &format!("{}\n", render::HELP)).await?,
            Some("/history") => prompt(&mut out, &render::render_view(&ctrl)).await?,
            Some("/filter") => match words.next().unwrap_or("all").parse::<PlatformFilter>() {
                Ok(filter) => {
                    ctrl.set_filter(filter);
                    prompt(&mut out, &render::render_view(&ctrl)).await?;
                }
                Err(e) => prompt(&mut out, &format!("! {}\n", e)).await?,
            },
            Some("/sort") => match words.next().unwrap_or("none").parse::<SortBy>() {
                Ok(sort) => {
                    ctrl.set_sort(sort);
                    prompt(&mut out, &render::render_view(&ctrl)).await?;
                }
                Err(e) => prompt(&mut out, &format!("! {}\n", e)).await?,
            },
            Some("/voice") => {
                voice(&mut ctrl, recognizer.as_deref(), &mut lines, &mut out).await?
            }
            Some(cmd) if cmd.starts_with('/') => {
                prompt(&mut out, &format!("! unknown command {}\n", cmd)).await?
            }
            Some(_) => {
                ctrl.set_input(line);
                search(&mut ctrl, &mut out).await?;
            }
            None => {}
        }
    }

    tracing::info!(messages = ctrl.messages().len(), "Chat session ended");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config.
    let config_file = args.resolve_config_path();
    let config = DealbotConfig::load_or_default(&config_file);

    // Tracing.
    let level = args.resolve_log_level(&config.general.log_level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&level)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting dealbot v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration loaded");

    match args.command {
        Command::Serve {
            host,
            port,
            catalog,
        } => run_server(config, host, port, catalog).await,
        Command::Chat {
            provider_url,
            data_dir,
        } => run_chat(config, provider_url, data_dir).await,
    }
}
