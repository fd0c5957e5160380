//! The interactive shell always releases the session it was given.

use epicrm::cli::console::Console;
use epicrm::cli::shell::{prompt_login, run_session};
use epicrm::config::Config;
use epicrm::domain::Role;
use epicrm::services::credentials;
use epicrm::state::AppState;
use sea_orm::ConnectionTrait;
use tokio::io::{AsyncReadExt, DuplexStream};

async fn spawn_state() -> AppState {
    let db_path =
        std::env::temp_dir().join(format!("epicrm-shell-test-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", db_path.display());

    let state = AppState::new(config)
        .await
        .expect("failed to create app state");

    let derived = credentials::derive("pw123");
    state
        .store
        .create_collaborator("alice", derived.hash, derived.salt, Role::Commercial)
        .await
        .expect("failed to seed collaborator");
    state
}

fn console_with(input: &str) -> (Console, DuplexStream) {
    let (writer, reader) = tokio::io::duplex(256 * 1024);
    let input = std::io::Cursor::new(input.as_bytes().to_vec());
    (Console::new(input, writer), reader)
}

async fn output_of(console: Console, mut reader: DuplexStream) -> String {
    drop(console);
    let mut output = String::new();
    reader.read_to_string(&mut output).await.unwrap();
    output
}

#[tokio::test]
async fn session_is_released_at_end_of_input() {
    let state = spawn_state().await;
    let (mut console, reader) = console_with("alice\npw123\nwhoami\nclients list\n");

    let session = prompt_login(&state, &mut console)
        .await
        .unwrap()
        .expect("login should succeed");
    assert!(state.auth.current_connected().await.unwrap().is_some());

    run_session(&state, session, &mut console).await.unwrap();
    assert!(state.auth.current_connected().await.unwrap().is_none());

    let output = output_of(console, reader).await;
    assert!(output.contains("alice (commercial)"));
    assert!(output.contains("No clients found."));
}

#[tokio::test]
async fn quit_releases_the_session() {
    let state = spawn_state().await;
    let (mut console, reader) = console_with("alice\npw123\nquit\nwhoami\n");

    let session = prompt_login(&state, &mut console).await.unwrap().unwrap();
    run_session(&state, session, &mut console).await.unwrap();
    assert!(state.auth.current_connected().await.unwrap().is_none());

    let output = output_of(console, reader).await;
    assert!(output.contains("Goodbye."));
    assert!(!output.contains("alice (commercial)"));
}

#[tokio::test]
async fn command_errors_keep_the_shell_running() {
    let state = spawn_state().await;
    let (mut console, reader) =
        console_with("alice\npw123\nclients show 42\nbogus\ncollaborators list\nwhoami\n");

    let session = prompt_login(&state, &mut console).await.unwrap().unwrap();
    run_session(&state, session, &mut console).await.unwrap();

    let output = output_of(console, reader).await;
    assert!(output.contains("Error: Client not found: 42"));
    assert!(output.contains("Error: Forbidden"));
    assert!(output.contains("alice (commercial)"));
}

#[tokio::test]
async fn failed_logins_do_not_connect_anyone() {
    let state = spawn_state().await;
    let (mut console, reader) = console_with("alice\nbad\nnouser\npw123\nalice\nworse\n");

    let session = prompt_login(&state, &mut console).await.unwrap();
    assert!(session.is_none());
    assert!(state.auth.current_connected().await.unwrap().is_none());

    let output = output_of(console, reader).await;
    assert_eq!(output.matches("Authentication failed.").count(), 3);
}

#[tokio::test]
async fn shell_ends_when_the_session_was_taken_over() {
    let state = spawn_state().await;
    let derived = credentials::derive("secret");
    let bob = state
        .store
        .create_collaborator("bob", derived.hash, derived.salt, Role::Support)
        .await
        .unwrap();

    let (mut console, reader) = console_with("alice\npw123\nwhoami\n");
    let session = prompt_login(&state, &mut console).await.unwrap().unwrap();

    state.auth.disconnect().await.unwrap();
    state.auth.authenticate("bob", "secret").await.unwrap();

    run_session(&state, session, &mut console).await.unwrap();
    assert_eq!(
        state.auth.current_connected().await.unwrap(),
        Some((bob.id, Role::Support))
    );

    let output = output_of(console, reader).await;
    assert!(output.contains("Your session was closed elsewhere."));
    assert!(!output.contains("alice (commercial)"));
}

#[tokio::test]
async fn storage_failure_ends_the_shell_and_releases() {
    let state = spawn_state().await;
    let (mut console, _reader) = console_with("alice\npw123\nevents list\nwhoami\n");

    let session = prompt_login(&state, &mut console).await.unwrap().unwrap();

    state
        .store
        .conn
        .execute_unprepared("DROP TABLE events")
        .await
        .unwrap();

    let result = run_session(&state, session, &mut console).await;
    assert!(result.is_err());
    assert!(state.auth.current_connected().await.unwrap().is_none());
}
