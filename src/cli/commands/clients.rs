//! Client command handlers

use anyhow::Result;

use crate::cli::ClientCommands;
use crate::cli::console::Console;
use crate::cli::table::Table;
use crate::domain::Session;
use crate::models::{Client, ClientUpdate, NewClient};
use crate::state::AppState;

pub async fn run_client_command(
    state: &AppState,
    session: &Session,
    console: &mut Console,
    command: ClientCommands,
) -> Result<()> {
    match command {
        ClientCommands::List { mine } => {
            let clients = if mine {
                state.clients.list_mine(session).await?
            } else {
                state.clients.list_all().await?
            };
            let title = if mine { "Your clients" } else { "Clients" };
            print_clients(state, console, title, &clients).await
        }
        ClientCommands::Show { id } => {
            let client = state.clients.get(id).await?;
            print_clients(state, console, "Client", std::slice::from_ref(&client)).await
        }
        ClientCommands::Add => cmd_add_client(state, session, console).await,
        ClientCommands::Edit { id } => cmd_edit_client(state, session, console, id).await,
    }
}

async fn cmd_add_client(state: &AppState, session: &Session, console: &mut Console) -> Result<()> {
    let input = NewClient {
        full_name: console.prompt_required("Full name: ").await?,
        email: console.prompt_required("Email: ").await?,
        phone: console.prompt("Phone: ").await?,
        company_name: console.prompt("Company: ").await?,
    };

    let client = state.clients.create(session, input).await?;
    console
        .println(format!("✓ Client added (ID: {})", client.id))
        .await
}

async fn cmd_edit_client(
    state: &AppState,
    session: &Session,
    console: &mut Console,
    id: i32,
) -> Result<()> {
    let current = state.clients.get(id).await?;
    console
        .println("Enter new values (leave blank to keep the current one):")
        .await?;

    let changes = ClientUpdate {
        full_name: console.prompt_optional("Full name", &current.full_name).await?,
        email: console.prompt_optional("Email", &current.email).await?,
        phone: console.prompt_optional("Phone", &current.phone).await?,
        company_name: console
            .prompt_optional("Company", &current.company_name)
            .await?,
    };

    let client = state.clients.update(session, id, changes).await?;
    console
        .println(format!("✓ Client {} updated", client.id))
        .await
}

async fn print_clients(
    state: &AppState,
    console: &mut Console,
    title: &str,
    clients: &[Client],
) -> Result<()> {
    if clients.is_empty() {
        return console.println("No clients found.").await;
    }

    let mut table = Table::new(&[
        "ID",
        "Full name",
        "Email",
        "Phone",
        "Company",
        "Created",
        "Last contact",
        "Commercial",
    ]);
    for client in clients {
        let commercial = state.collaborators.display_name(client.commercial_id).await?;
        table.add_row(vec![
            client.id.to_string(),
            client.full_name.clone(),
            client.email.clone(),
            client.phone.clone(),
            client.company_name.clone(),
            client.created_at.clone(),
            client.last_contact_at.clone(),
            commercial,
        ]);
    }

    console
        .println(format!("{title} ({} total)", table.len()))
        .await?;
    console.write(&table.to_string()).await
}
