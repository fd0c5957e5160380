//! Interactive shell run on behalf of one logged-in collaborator.
//!
//! The shell owns the session for its whole lifetime: whether the command
//! loop ends on `quit`, end of input, an interrupt or a storage failure, the
//! connected flag is released before [`run_session`] returns. The one
//! exception is a flag another collaborator has taken over in the meantime.

use anyhow::Result;
use clap::Parser;
use tracing::{error, info, warn};

use crate::cli::commands::{
    run_client_command, run_collaborator_command, run_contract_command, run_event_command,
};
use crate::cli::console::Console;
use crate::cli::{ShellCommand, ShellLine};
use crate::domain::Session;
use crate::services::{
    AuthError, ClientError, CollaboratorError, ContractError, EventError,
};
use crate::state::AppState;

pub const PROMPT: &str = "epicrm> ";
pub const MAX_LOGIN_ATTEMPTS: usize = 3;

/// Asks for credentials until a login succeeds or the attempts run out.
///
/// Returns `None` when every attempt failed or another collaborator holds the
/// session.
pub async fn prompt_login(state: &AppState, console: &mut Console) -> Result<Option<Session>> {
    for _ in 0..MAX_LOGIN_ATTEMPTS {
        let username = console.prompt_required("Username: ").await?;
        let password = console.prompt_required("Password: ").await?;

        match state.auth.authenticate(&username, &password).await {
            Ok(session) => return Ok(Some(session)),
            Err(AuthError::InvalidCredentials) => {
                console.println("Authentication failed.").await?;
            }
            Err(AuthError::SessionActive(holder)) => {
                console
                    .println(format!(
                        "{holder} is already connected. Try again once they log out."
                    ))
                    .await?;
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        }
    }

    console.println("Too many failed attempts.").await?;
    Ok(None)
}

/// Runs the shell for `session` and releases the connected flag afterwards.
pub async fn run_session(state: &AppState, session: Session, console: &mut Console) -> Result<()> {
    info!("{} opened a session as {}", session.username, session.role);

    let outcome = tokio::select! {
        result = command_loop(state, &session, console) => result,
        signal = tokio::signal::ctrl_c() => {
            match signal {
                Ok(()) => info!("Interrupt received, closing session"),
                Err(e) => error!("Error listening for interrupt: {}", e),
            }
            Ok(())
        }
    };

    let released = state.auth.release(&session).await;
    if let Err(e) = &released {
        error!("Failed to release session of {}: {}", session.username, e);
    }

    outcome?;
    released?;
    Ok(())
}

async fn command_loop(state: &AppState, session: &Session, console: &mut Console) -> Result<()> {
    console
        .println(format!(
            "Welcome {}. Type 'help' for commands, 'quit' to leave.",
            session.username
        ))
        .await?;

    loop {
        console.write(PROMPT).await?;
        let Some(line) = console.read_line().await? else {
            console.println("").await?;
            return Ok(());
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let parsed = match ShellLine::try_parse_from(line.split_whitespace()) {
            Ok(parsed) => parsed,
            Err(err) => {
                console.write(&err.render().to_string()).await?;
                continue;
            }
        };

        match state.auth.touch(session).await {
            Ok(()) => {}
            Err(AuthError::Unauthorized) => {
                console
                    .println("Your session was closed elsewhere. Log in again.")
                    .await?;
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        }

        let result = match parsed.command {
            ShellCommand::Quit => {
                console.println("Goodbye.").await?;
                return Ok(());
            }
            ShellCommand::Whoami => {
                console
                    .println(format!("{} ({})", session.username, session.role))
                    .await
            }
            ShellCommand::Clients { command } => {
                run_client_command(state, session, console, command).await
            }
            ShellCommand::Contracts { command } => {
                run_contract_command(state, session, console, command).await
            }
            ShellCommand::Events { command } => {
                run_event_command(state, session, console, command).await
            }
            ShellCommand::Collaborators { command } => {
                run_collaborator_command(state, session, console, command).await
            }
        };

        if let Err(e) = result {
            if is_fatal(&e) {
                error!("Storage failure, closing session: {:#}", e);
                return Err(e);
            }
            warn!("Command failed: {}", e);
            console.println(format!("Error: {e}")).await?;
        }
    }
}

/// Storage failures end the session; everything else is reported and the
/// shell keeps going.
fn is_fatal(err: &anyhow::Error) -> bool {
    err.downcast_ref::<sea_orm::DbErr>().is_some()
        || matches!(err.downcast_ref::<AuthError>(), Some(AuthError::Database(_)))
        || matches!(
            err.downcast_ref::<CollaboratorError>(),
            Some(CollaboratorError::Database(_))
        )
        || matches!(err.downcast_ref::<ClientError>(), Some(ClientError::Database(_)))
        || matches!(
            err.downcast_ref::<ContractError>(),
            Some(ContractError::Database(_))
        )
        || matches!(err.downcast_ref::<EventError>(), Some(EventError::Database(_)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_are_not_fatal() {
        let err = anyhow::Error::from(ClientError::NotFound(4));
        assert!(!is_fatal(&err));
        let err = anyhow::Error::from(EventError::Forbidden("nope".to_string()));
        assert!(!is_fatal(&err));
    }

    #[test]
    fn storage_errors_are_fatal() {
        let err = anyhow::Error::from(ContractError::Database("disk I/O error".to_string()));
        assert!(is_fatal(&err));
        let err = anyhow::Error::from(sea_orm::DbErr::Custom("gone".to_string()))
            .context("Failed to load client");
        assert!(is_fatal(&err));
    }
}
