//! Collaborator command handlers

use anyhow::Result;

use crate::cli::CollaboratorCommands;
use crate::cli::console::Console;
use crate::cli::table::Table;
use crate::domain::{Role, Session};
use crate::models::{Collaborator, CollaboratorUpdate, NewCollaborator};
use crate::state::AppState;

pub async fn run_collaborator_command(
    state: &AppState,
    session: &Session,
    console: &mut Console,
    command: CollaboratorCommands,
) -> Result<()> {
    match command {
        CollaboratorCommands::List { username } => {
            let collaborators = state
                .collaborators
                .list(session, username.as_deref())
                .await?;
            print_collaborators(console, &collaborators).await
        }
        CollaboratorCommands::Commercials => {
            let commercials = state.collaborators.list_commercials().await?;
            print_collaborators(console, &commercials).await
        }
        CollaboratorCommands::Add => {
            let input = NewCollaborator {
                username: console.prompt_required("Username: ").await?,
                password: console.prompt_required("Password: ").await?,
                role: console
                    .prompt_parsed("Role (commercial/support/management): ")
                    .await?,
            };
            let created = state.collaborators.create(session, input).await?;
            console
                .println(format!(
                    "✓ Collaborator {} created (ID: {})",
                    created.username, created.id
                ))
                .await
        }
        CollaboratorCommands::Edit { username } => {
            let current = state
                .collaborators
                .list(session, Some(&username))
                .await?
                .into_iter()
                .next()
                .ok_or_else(|| anyhow::anyhow!("Collaborator not found: {username}"))?;
            console
                .println("Enter new values (leave blank to keep the current one):")
                .await?;
            let changes = CollaboratorUpdate {
                username: console.prompt_optional("Username", &current.username).await?,
                role: console
                    .prompt_parsed_optional::<Role>("Role", current.role.as_str())
                    .await?,
            };
            let updated = state
                .collaborators
                .update(session, &username, changes)
                .await?;
            console
                .println(format!("✓ Collaborator {} updated", updated.username))
                .await
        }
        CollaboratorCommands::Password { username } => {
            let password = console.prompt_required("New password: ").await?;
            state
                .collaborators
                .reset_password(session, &username, &password)
                .await?;
            console
                .println(format!("✓ Password of {username} reset"))
                .await
        }
        CollaboratorCommands::Delete { username } => {
            if !console.confirm(&format!("Delete collaborator {username}?")).await? {
                return console.println("Cancelled.").await;
            }
            state.collaborators.delete(session, &username).await?;
            console
                .println(format!("✓ Collaborator {username} deleted"))
                .await
        }
    }
}

async fn print_collaborators(console: &mut Console, collaborators: &[Collaborator]) -> Result<()> {
    if collaborators.is_empty() {
        return console.println("No collaborators found.").await;
    }

    let mut table = Table::new(&["ID", "Username", "Role", "Connected", "Created"]);
    for c in collaborators {
        table.add_row(vec![
            c.id.to_string(),
            c.username.clone(),
            c.role.to_string(),
            if c.is_connected { "●" } else { "" }.to_string(),
            c.created_at.clone(),
        ]);
    }

    console
        .println(format!("Collaborators ({} total)", table.len()))
        .await?;
    console.write(&table.to_string()).await
}
