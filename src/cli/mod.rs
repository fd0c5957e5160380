//! CLI module - process arguments and the interactive shell grammar.
//!
//! Both levels are parsed with clap: [`Cli`] for the process, [`ShellLine`]
//! for each line typed at the `epicrm>` prompt.

pub mod commands;
pub mod console;
pub mod shell;
pub mod table;

use clap::{Args, Parser, Subcommand};

use crate::domain::Role;

/// epicrm - client relationship management for an events company
#[derive(Parser)]
#[command(name = "epicrm")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in and open the interactive shell
    Login,

    /// Create the first collaborator of an empty database
    Bootstrap {
        /// Username of the new collaborator
        username: String,
        /// Role of the new collaborator
        #[arg(long, default_value = "management")]
        role: Role,
    },

    /// Show which collaborator is connected
    Status,

    /// Clear a connected flag left behind by a crashed session
    Disconnect,

    /// Create default config file
    #[command(alias = "--init")]
    Init,
}

/// One command typed in the interactive shell.
#[derive(Parser, Debug)]
#[command(name = "epicrm>", no_binary_name = true, disable_version_flag = true)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: ShellCommand,
}

#[derive(Subcommand, Debug)]
pub enum ShellCommand {
    /// Manage clients
    #[command(alias = "client")]
    Clients {
        #[command(subcommand)]
        command: ClientCommands,
    },

    /// Manage contracts
    #[command(alias = "contract")]
    Contracts {
        #[command(subcommand)]
        command: ContractCommands,
    },

    /// Manage events
    #[command(alias = "event")]
    Events {
        #[command(subcommand)]
        command: EventCommands,
    },

    /// Manage collaborators (management)
    #[command(alias = "collaborator", alias = "staff")]
    Collaborators {
        #[command(subcommand)]
        command: CollaboratorCommands,
    },

    /// Show the logged-in collaborator
    Whoami,

    /// Log out and leave the shell
    #[command(alias = "exit", alias = "logout")]
    Quit,
}

#[derive(Subcommand, Debug)]
pub enum ClientCommands {
    /// List clients
    #[command(alias = "ls")]
    List {
        /// Only clients you are the commercial contact for
        #[arg(long)]
        mine: bool,
    },
    /// Show one client
    Show { id: i32 },
    /// Add a client (commercial)
    Add,
    /// Edit a client (its commercial or management)
    Edit { id: i32 },
}

#[derive(Subcommand, Debug)]
pub enum ContractCommands {
    /// List contracts
    #[command(alias = "ls")]
    List {
        /// Only contracts not yet signed
        #[arg(long, conflicts_with = "unpaid")]
        unsigned: bool,
        /// Only contracts with an amount still due
        #[arg(long)]
        unpaid: bool,
    },
    /// Show one contract
    Show { id: i32 },
    /// Create a contract for a client (management)
    Add {
        /// Client the contract is for
        client_id: i32,
    },
    /// Edit amounts or signature
    Edit { id: i32 },
}

#[derive(Args, Debug, Default)]
#[group(multiple = false)]
pub struct EventListArgs {
    /// Only events assigned to you
    #[arg(long)]
    pub mine: bool,
    /// Only events that already started
    #[arg(long)]
    pub past: bool,
    /// Only events starting from now on
    #[arg(long)]
    pub future: bool,
    /// Only events starting on this day (YYYY-MM-DD)
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub date: Option<chrono::NaiveDate>,
    /// Only events without a support collaborator
    #[arg(long)]
    pub unassigned: bool,
}

#[derive(Subcommand, Debug)]
pub enum EventCommands {
    /// List events ordered by start
    #[command(alias = "ls")]
    List(EventListArgs),
    /// Show one event
    Show { id: i32 },
    /// Create an event for a signed contract (commercial)
    Add {
        /// Contract the event belongs to
        contract_id: i32,
    },
    /// Edit an event
    Edit { id: i32 },
    /// Assign a support collaborator (management)
    Assign {
        id: i32,
        /// Username of the support collaborator
        support: String,
    },
    /// Delete an event (management)
    #[command(alias = "rm")]
    Delete { id: i32 },
}

#[derive(Subcommand, Debug)]
pub enum CollaboratorCommands {
    /// List collaborators, optionally a single username
    #[command(alias = "ls")]
    List { username: Option<String> },
    /// List commercials
    Commercials,
    /// Create a collaborator
    Add,
    /// Change username or role
    Edit { username: String },
    /// Reset a password
    Password { username: String },
    /// Delete a collaborator
    #[command(alias = "rm")]
    Delete { username: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Result<ShellLine, clap::Error> {
        ShellLine::try_parse_from(line.split_whitespace())
    }

    #[test]
    fn parses_event_filters() {
        let parsed = parse("events list --date 2026-05-01").unwrap();
        let ShellCommand::Events {
            command: EventCommands::List(args),
        } = parsed.command
        else {
            panic!("unexpected command");
        };
        assert_eq!(args.date, chrono::NaiveDate::from_ymd_opt(2026, 5, 1));
    }

    #[test]
    fn event_filters_are_exclusive() {
        assert!(parse("events list --past --future").is_err());
    }

    #[test]
    fn aliases_resolve() {
        assert!(matches!(parse("exit").unwrap().command, ShellCommand::Quit));
        assert!(matches!(
            parse("client ls --mine").unwrap().command,
            ShellCommand::Clients {
                command: ClientCommands::List { mine: true }
            }
        ));
    }

    #[test]
    fn help_is_reported_as_display_help() {
        let err = parse("help").unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn process_cli_parses_bootstrap_role() {
        let cli = Cli::try_parse_from(["epicrm", "bootstrap", "alice", "--role", "commercial"])
            .unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Bootstrap {
                role: Role::Commercial,
                ..
            })
        ));
    }
}
