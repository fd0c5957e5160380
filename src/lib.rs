pub mod cli;
pub mod config;
pub mod db;
pub mod domain;
pub mod entities;
pub mod models;
pub mod services;
pub mod state;

use anyhow::{Context, bail};
use clap::{CommandFactory, Parser};
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::console::Console;
use cli::shell::{prompt_login, run_session};
use cli::{Cli, Commands};
pub use config::Config;
use domain::Role;
use models::NewCollaborator;
use state::AppState;

/// Drives `future` to completion, then shuts the runtime down without waiting
/// for blocking tasks. A stdin read abandoned on Ctrl+C is one of those.
pub fn block_on_detached<F: Future>(runtime: tokio::runtime::Runtime, future: F) -> F::Output {
    let output = runtime.block_on(future);
    runtime.shutdown_background();
    output
}

pub async fn run(config: Config) -> anyhow::Result<()> {
    config.validate()?;

    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    // Console output belongs to the shell; logs go to stderr.
    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Init) => cmd_init(),
        Some(Commands::Login) => cmd_login(config).await,
        Some(Commands::Bootstrap { username, role }) => cmd_bootstrap(config, username, role).await,
        Some(Commands::Status) => cmd_status(config).await,
        Some(Commands::Disconnect) => cmd_disconnect(config).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    }
}

fn cmd_init() -> anyhow::Result<()> {
    if Config::create_default_if_missing()? {
        println!("✓ Created config.toml");
    } else {
        println!("config.toml already exists");
    }
    Ok(())
}

async fn cmd_login(config: Config) -> anyhow::Result<()> {
    let state = AppState::new(config).await?;
    let mut console = Console::stdio();

    match prompt_login(&state, &mut console).await? {
        Some(session) => run_session(&state, session, &mut console).await,
        None => bail!("Login failed"),
    }
}

async fn cmd_bootstrap(config: Config, username: String, role: Role) -> anyhow::Result<()> {
    let state = AppState::new(config).await?;
    let mut console = Console::stdio();

    let password = console.prompt_required("Password: ").await?;
    let confirmation = console.prompt_required("Repeat password: ").await?;
    if password != confirmation {
        bail!("Passwords do not match");
    }

    let created = state
        .collaborators
        .bootstrap(NewCollaborator {
            username,
            password,
            role,
        })
        .await?;

    info!("Bootstrapped collaborator {}", created.username);
    console
        .println(format!(
            "✓ Created {} ({}). Log in with `epicrm login`.",
            created.username, created.role
        ))
        .await
}

async fn cmd_status(config: Config) -> anyhow::Result<()> {
    let state = AppState::new(config).await?;
    state.store.ping().await.context("Database is unreachable")?;

    match state.auth.current_connected().await? {
        Some((id, role)) => {
            let collaborator = state.collaborators.get(id).await?;
            println!("{} ({}) is connected", collaborator.username, role);
            if let Some(last_seen) = collaborator.last_seen_at {
                println!("Last activity: {last_seen}");
            }
        }
        None => println!("Nobody is connected"),
    }
    Ok(())
}

async fn cmd_disconnect(config: Config) -> anyhow::Result<()> {
    let state = AppState::new(config).await?;
    state.auth.disconnect().await?;
    println!("✓ Session flag cleared");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[test]
    fn unanswered_blocking_read_does_not_hold_the_process() {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .unwrap();
        let (tx, rx) = std::sync::mpsc::channel::<()>();
        let started = Instant::now();

        let outcome = block_on_detached(runtime, async move {
            // Like a console read nobody answers.
            let read = tokio::task::spawn_blocking(move || rx.recv());
            tokio::select! {
                _ = read => "read",
                () = tokio::time::sleep(Duration::from_millis(50)) => "interrupted",
            }
        });

        assert_eq!(outcome, "interrupted");
        assert!(started.elapsed() < Duration::from_secs(5));
        drop(tx);
    }
}
