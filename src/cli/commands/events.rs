//! Event command handlers

use anyhow::Result;
use chrono::NaiveDateTime;

use crate::cli::console::Console;
use crate::cli::table::Table;
use crate::cli::{EventCommands, EventListArgs};
use crate::domain::Session;
use crate::models::event::{format_event_time, parse_event_time};
use crate::models::{Event, EventFilter, EventUpdate, NewEvent};
use crate::services::EventError;
use crate::state::AppState;

pub async fn run_event_command(
    state: &AppState,
    session: &Session,
    console: &mut Console,
    command: EventCommands,
) -> Result<()> {
    match command {
        EventCommands::List(args) => {
            let events = if args.mine {
                state.events.list_mine(session).await?
            } else {
                state.events.list(filter_from_args(&args)).await?
            };
            print_events(state, console, &events).await
        }
        EventCommands::Show { id } => {
            let event = state.events.get(id).await?;
            print_events(state, console, std::slice::from_ref(&event)).await?;
            if !event.notes.is_empty() {
                console.println(format!("Notes: {}", event.notes)).await?;
            }
            Ok(())
        }
        EventCommands::Add { contract_id } => {
            cmd_add_event(state, session, console, contract_id).await
        }
        EventCommands::Edit { id } => cmd_edit_event(state, session, console, id).await,
        EventCommands::Assign { id, support } => {
            let collaborator = state
                .store
                .get_collaborator_by_username(&support)
                .await?
                .ok_or_else(|| EventError::Validation(format!("Unknown collaborator: {support}")))?;
            let changes = EventUpdate {
                support_id: Some(Some(collaborator.id.value())),
                ..Default::default()
            };
            let event = state.events.update(session, id, changes).await?;
            console
                .println(format!("✓ Event {} assigned to {}", event.id, collaborator.username))
                .await
        }
        EventCommands::Delete { id } => {
            if !console.confirm(&format!("Delete event {id}?")).await? {
                return console.println("Cancelled.").await;
            }
            state.events.delete(session, id).await?;
            console.println(format!("✓ Event {id} deleted")).await
        }
    }
}

fn filter_from_args(args: &EventListArgs) -> EventFilter {
    if args.past {
        EventFilter::Past
    } else if args.future {
        EventFilter::Future
    } else if let Some(date) = args.date {
        EventFilter::OnDate(date)
    } else if args.unassigned {
        EventFilter::Unassigned
    } else {
        EventFilter::All
    }
}

async fn prompt_time(console: &mut Console, label: &str) -> Result<NaiveDateTime> {
    loop {
        let answer = console.prompt_required(label).await?;
        match parse_event_time(&answer) {
            Ok(time) => return Ok(time),
            Err(e) => console.println(format!("{e}")).await?,
        }
    }
}

async fn prompt_time_optional(
    console: &mut Console,
    label: &str,
    current: &NaiveDateTime,
) -> Result<Option<NaiveDateTime>> {
    loop {
        let Some(answer) = console
            .prompt_optional(label, &format_event_time(current))
            .await?
        else {
            return Ok(None);
        };
        match parse_event_time(&answer) {
            Ok(time) => return Ok(Some(time)),
            Err(e) => console.println(format!("{e}")).await?,
        }
    }
}

async fn cmd_add_event(
    state: &AppState,
    session: &Session,
    console: &mut Console,
    contract_id: i32,
) -> Result<()> {
    let input = NewEvent {
        contract_id,
        start_at: prompt_time(console, "Start (YYYY-MM-DD HH:MM): ").await?,
        end_at: prompt_time(console, "End (YYYY-MM-DD HH:MM): ").await?,
        location: console.prompt_required("Location: ").await?,
        attendees: console.prompt_parsed("Attendees: ").await?,
        notes: console.prompt("Notes: ").await?,
    };

    let event = state.events.create(session, input).await?;
    console
        .println(format!("✓ Event created (ID: {})", event.id))
        .await
}

async fn cmd_edit_event(
    state: &AppState,
    session: &Session,
    console: &mut Console,
    id: i32,
) -> Result<()> {
    let current = state.events.get(id).await?;
    console
        .println("Enter new values (leave blank to keep the current one):")
        .await?;

    let changes = EventUpdate {
        start_at: prompt_time_optional(console, "Start", &current.start_at).await?,
        end_at: prompt_time_optional(console, "End", &current.end_at).await?,
        support_id: None,
        location: console.prompt_optional("Location", &current.location).await?,
        attendees: console
            .prompt_parsed_optional("Attendees", &current.attendees.to_string())
            .await?,
        notes: console.prompt_optional("Notes", &current.notes).await?,
    };

    let event = state.events.update(session, id, changes).await?;
    console.println(format!("✓ Event {} updated", event.id)).await
}

async fn print_events(state: &AppState, console: &mut Console, events: &[Event]) -> Result<()> {
    if events.is_empty() {
        return console.println("No events found.").await;
    }

    let mut table = Table::new(&[
        "ID",
        "Contract",
        "Client",
        "Start",
        "End",
        "Support",
        "Location",
        "Attendees",
    ]);
    for event in events {
        let support = match event.support_id {
            Some(_) => state.collaborators.display_name(event.support_id).await?,
            None => "-".to_string(),
        };
        table.add_row(vec![
            event.id.to_string(),
            event.contract_id.to_string(),
            event.client_name.clone(),
            format_event_time(&event.start_at),
            format_event_time(&event.end_at),
            support,
            event.location.clone(),
            event.attendees.to_string(),
        ]);
    }

    console
        .println(format!("Events ({} total)", table.len()))
        .await?;
    console.write(&table.to_string()).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_args_map_to_filters() {
        let args = EventListArgs {
            future: true,
            ..Default::default()
        };
        assert_eq!(filter_from_args(&args), EventFilter::Future);
        assert_eq!(filter_from_args(&EventListArgs::default()), EventFilter::All);
    }
}
