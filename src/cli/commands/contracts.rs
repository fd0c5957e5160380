//! Contract command handlers

use anyhow::Result;

use crate::cli::ContractCommands;
use crate::cli::console::Console;
use crate::cli::table::Table;
use crate::domain::Session;
use crate::models::{Amount, Contract, ContractFilter, ContractUpdate, NewContract};
use crate::state::AppState;

pub async fn run_contract_command(
    state: &AppState,
    session: &Session,
    console: &mut Console,
    command: ContractCommands,
) -> Result<()> {
    match command {
        ContractCommands::List { unsigned, unpaid } => {
            let filter = if unsigned {
                ContractFilter::Unsigned
            } else if unpaid {
                ContractFilter::Unpaid
            } else {
                ContractFilter::All
            };
            let contracts = state.contracts.list(filter).await?;
            print_contracts(state, console, &contracts).await
        }
        ContractCommands::Show { id } => {
            let contract = state.contracts.get(id).await?;
            print_contracts(state, console, std::slice::from_ref(&contract)).await
        }
        ContractCommands::Add { client_id } => {
            cmd_add_contract(state, session, console, client_id).await
        }
        ContractCommands::Edit { id } => cmd_edit_contract(state, session, console, id).await,
    }
}

fn yes_no(value: bool) -> &'static str {
    if value { "Yes" } else { "No" }
}

fn parse_yes_no(answer: &str) -> Option<bool> {
    match answer.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

async fn cmd_add_contract(
    state: &AppState,
    session: &Session,
    console: &mut Console,
    client_id: i32,
) -> Result<()> {
    let client = state.clients.get(client_id).await?;
    console
        .println(format!("New contract for {} ({})", client.full_name, client.company_name))
        .await?;

    let total_amount: Amount = console.prompt_parsed("Total amount: ").await?;
    let amount_due: Amount = console.prompt_parsed("Amount due: ").await?;
    let signed = console.confirm("Signed").await?;

    let contract = state
        .contracts
        .create(
            session,
            NewContract {
                client_id,
                total_amount,
                amount_due,
                signed,
            },
        )
        .await?;
    console
        .println(format!("✓ Contract created (ID: {})", contract.id))
        .await
}

async fn cmd_edit_contract(
    state: &AppState,
    session: &Session,
    console: &mut Console,
    id: i32,
) -> Result<()> {
    let current = state.contracts.get(id).await?;
    console
        .println("Enter new values (leave blank to keep the current one):")
        .await?;

    let total_amount = console
        .prompt_parsed_optional("Total amount", &current.total_amount.to_string())
        .await?;
    let amount_due = console
        .prompt_parsed_optional("Amount due", &current.amount_due.to_string())
        .await?;
    let signed = loop {
        match console
            .prompt_optional("Signed (y/n)", yes_no(current.signed))
            .await?
        {
            None => break None,
            Some(answer) => match parse_yes_no(&answer) {
                Some(value) => break Some(value),
                None => console.println("Please answer y or n.").await?,
            },
        }
    };

    let changes = ContractUpdate {
        total_amount,
        amount_due,
        signed,
    };
    let contract = state.contracts.update(session, id, changes).await?;
    console
        .println(format!("✓ Contract {} updated", contract.id))
        .await
}

async fn print_contracts(
    state: &AppState,
    console: &mut Console,
    contracts: &[Contract],
) -> Result<()> {
    if contracts.is_empty() {
        return console.println("No contracts found.").await;
    }

    let mut table = Table::new(&[
        "ID",
        "Client",
        "Commercial",
        "Total",
        "Due",
        "Created",
        "Signed",
    ]);
    for contract in contracts {
        let commercial = state
            .collaborators
            .display_name(contract.commercial_id)
            .await?;
        table.add_row(vec![
            contract.id.to_string(),
            contract.client_id.to_string(),
            commercial,
            contract.total_amount.to_string(),
            contract.amount_due.to_string(),
            contract.created_at.clone(),
            yes_no(contract.signed).to_string(),
        ]);
    }

    console
        .println(format!("Contracts ({} total)", table.len()))
        .await?;
    console.write(&table.to_string()).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yes_no_answers() {
        assert_eq!(parse_yes_no(" Yes "), Some(true));
        assert_eq!(parse_yes_no("n"), Some(false));
        assert_eq!(parse_yes_no("maybe"), None);
    }
}
