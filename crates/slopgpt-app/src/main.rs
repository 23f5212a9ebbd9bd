//! SlopGPT binary - composition root.
//!
//! `serve` wires configuration, the text generator, the conversation
//! service, and lead intake into the HTTP API. `chat` drives a
//! [`ChatSession`] against a running server from the terminal.

mod cli;

use std::error::Error;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};

use slopgpt_api::routes;
use slopgpt_api::state::AppState;
use slopgpt_chat::{
    AnthropicClient, ChatBackend, ChatSession, ConversationService, HttpBackend, SendOutcome,
    SubmitOutcome,
};
use slopgpt_core::config::ChatConfig;
use slopgpt_core::{LeadRecord, SlopConfig};
use slopgpt_lead::LeadIntake;

use cli::{CliArgs, Command};

type AppResult<T> = Result<T, Box<dyn Error>>;

#[tokio::main]
async fn main() -> AppResult<()> {
    let args = CliArgs::parse();
    init_tracing(args.log_level.as_deref());

    let config_file = args.resolve_config_path();

    match args.command() {
        Command::Init { force } => init_config(&config_file, force),
        command => {
            let mut config = SlopConfig::load_or_default(&config_file);
            config.apply_env();
            args.apply_overrides(&mut config);
            tracing::debug!(path = %config_file.display(), "Configuration loaded");

            match command {
                Command::Chat { url } => run_chat(&url, &config.chat).await,
                _ => serve(config).await,
            }
        }
    }
}

/// `--log-level` wins over `RUST_LOG`; the default is `info`.
fn init_tracing(level: Option<&str>) {
    let filter = match level {
        Some(level) => tracing_subscriber::EnvFilter::new(level),
        None => tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn init_config(path: &Path, force: bool) -> AppResult<()> {
    if path.exists() && !force {
        tracing::error!(path = %path.display(), "Config file exists; pass --force to overwrite");
        return Err(format!("{} already exists", path.display()).into());
    }
    SlopConfig::default().save(path)?;
    tracing::info!(path = %path.display(), "Default configuration written");
    Ok(())
}

// =============================================================================
// Server
// =============================================================================

async fn serve(config: SlopConfig) -> AppResult<()> {
    tracing::info!("Starting SlopGPT v{}", env!("CARGO_PKG_VERSION"));

    if config.chat.api_key.is_empty() {
        tracing::warn!(
            "No API key configured; chat requests will fail until ANTHROPIC_API_KEY is set"
        );
    }

    let generator = AnthropicClient::new(&config.chat)?;
    tracing::info!(model = %generator.model(), "Text generator ready");
    let conversation = ConversationService::new(Arc::new(generator), &config.chat);

    let intake = LeadIntake::from_config(&config.lead)?;

    let server = config.server.clone();
    let state = AppState::new(config, conversation, intake);
    routes::start_server(&server, state).await?;
    Ok(())
}

// =============================================================================
// Terminal chat
// =============================================================================

async fn run_chat(url: &str, config: &ChatConfig) -> AppResult<()> {
    let backend = HttpBackend::new(url, Duration::from_secs(config.request_timeout_secs))?;
    let mut session = ChatSession::new(backend, config);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    print_last(&session);
    println!("(type /quit to leave)");

    loop {
        let Some(input) = prompt(&mut lines, "> ").await? else {
            break;
        };
        if input.trim() == "/quit" {
            break;
        }

        match session.send(&input).await {
            SendOutcome::Ignored => continue,
            SendOutcome::Fallback => print_last(&session),
            SendOutcome::Replied { contact_form_after } => {
                print_last(&session);
                if let Some(delay) = contact_form_after {
                    tokio::time::sleep(delay).await;
                    session.open_contact_form();
                    contact_form(&mut session, &mut lines).await?;
                }
            }
        }
    }

    Ok(())
}

/// Collect contact details until a lead is accepted or the visitor skips.
async fn contact_form<B: ChatBackend>(
    session: &mut ChatSession<B>,
    lines: &mut Lines<BufReader<Stdin>>,
) -> AppResult<()> {
    println!("\nLet's get you connected with our team (leave name blank to skip).");

    while session.is_form_open() {
        let name = prompt(lines, "Name: ").await?.unwrap_or_default();
        if name.trim().is_empty() {
            session.dismiss_contact_form();
            break;
        }
        let email = prompt(lines, "Email: ").await?.unwrap_or_default();
        let phone = prompt(lines, "Phone (optional): ").await?.unwrap_or_default();

        let mut form = LeadRecord::new(name.trim(), email.trim());
        if !phone.trim().is_empty() {
            form.phone = Some(phone.trim().to_string());
        }

        match session.submit_lead(form).await {
            SubmitOutcome::Accepted(_) => print_last(session),
            SubmitOutcome::MissingFields => println!("Name and email are required."),
            SubmitOutcome::Failed => println!("That didn't go through. Try again?"),
        }
    }
    Ok(())
}

async fn prompt(lines: &mut Lines<BufReader<Stdin>>, label: &str) -> AppResult<Option<String>> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(label.as_bytes()).await?;
    stdout.flush().await?;
    Ok(lines.next_line().await?)
}

fn print_last<B: ChatBackend>(session: &ChatSession<B>) {
    if let Some(turn) = session.transcript().last() {
        println!("\nSlopGPT: {}\n", turn.content);
    }
}
