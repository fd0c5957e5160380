//! Login, exclusivity and release of the connected session.

use chrono::{Duration, Utc};
use epicrm::config::Config;
use epicrm::db::timestamp;
use epicrm::domain::{CollaboratorId, Role};
use epicrm::entities::{collaborators, prelude::Collaborators};
use epicrm::services::AuthError;
use epicrm::services::credentials;
use epicrm::state::AppState;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};

async fn spawn_state() -> AppState {
    let db_path =
        std::env::temp_dir().join(format!("epicrm-auth-test-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", db_path.display());

    AppState::new(config)
        .await
        .expect("failed to create app state")
}

async fn seed(state: &AppState, username: &str, password: &str, role: Role) -> CollaboratorId {
    let derived = credentials::derive(password);
    state
        .store
        .create_collaborator(username, derived.hash, derived.salt, role)
        .await
        .expect("failed to seed collaborator")
        .id
}

async fn connected_count(state: &AppState) -> usize {
    state
        .store
        .list_collaborators(None)
        .await
        .unwrap()
        .iter()
        .filter(|c| c.is_connected)
        .count()
}

#[tokio::test]
async fn unknown_username_is_rejected() {
    let state = spawn_state().await;
    seed(&state, "alice", "pw123", Role::Commercial).await;

    let err = state.auth.authenticate("nouser", "pw123").await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));
    assert_eq!(connected_count(&state).await, 0);
    assert!(state.auth.current_connected().await.unwrap().is_none());
}

#[tokio::test]
async fn wrong_password_leaves_collaborator_disconnected() {
    let state = spawn_state().await;
    seed(&state, "alice", "pw123", Role::Commercial).await;

    let err = state.auth.authenticate("alice", "wrong").await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));
    assert_eq!(err.to_string(), "Authentication failed");

    let alice = state
        .store
        .get_collaborator_by_username("alice")
        .await
        .unwrap()
        .unwrap();
    assert!(!alice.is_connected);
}

#[tokio::test]
async fn alice_logs_in_and_out() {
    let state = spawn_state().await;
    let id = seed(&state, "alice", "pw123", Role::Commercial).await;

    let session = state.auth.authenticate("alice", "pw123").await.unwrap();
    assert_eq!(session.collaborator_id, id);
    assert_eq!(session.username, "alice");
    assert_eq!(session.role, Role::Commercial);

    assert_eq!(
        state.auth.current_connected().await.unwrap(),
        Some((id, Role::Commercial))
    );

    let alice = state.store.get_collaborator(id).await.unwrap().unwrap();
    assert!(alice.is_connected);
    assert!(alice.last_seen_at.is_some());

    state.auth.disconnect().await.unwrap();
    assert!(state.auth.current_connected().await.unwrap().is_none());
    assert_eq!(connected_count(&state).await, 0);
}

#[tokio::test]
async fn second_login_waits_for_the_first_to_leave() {
    let state = spawn_state().await;
    seed(&state, "alice", "pw123", Role::Commercial).await;
    let bob = seed(&state, "bob", "secret", Role::Support).await;

    state.auth.authenticate("alice", "pw123").await.unwrap();

    let err = state.auth.authenticate("bob", "secret").await.unwrap_err();
    match err {
        AuthError::SessionActive(holder) => assert_eq!(holder, "alice"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(connected_count(&state).await, 1);

    state.auth.disconnect().await.unwrap();

    let session = state.auth.authenticate("bob", "secret").await.unwrap();
    assert_eq!(session.collaborator_id, bob);
    assert_eq!(
        state.auth.current_connected().await.unwrap(),
        Some((bob, Role::Support))
    );
}

#[tokio::test]
async fn same_collaborator_can_log_in_again() {
    let state = spawn_state().await;
    seed(&state, "alice", "pw123", Role::Commercial).await;

    state.auth.authenticate("alice", "pw123").await.unwrap();
    state.auth.authenticate("alice", "pw123").await.unwrap();
    assert_eq!(connected_count(&state).await, 1);
}

#[tokio::test]
async fn stale_session_is_reclaimed() {
    let state = spawn_state().await;
    let alice = seed(&state, "alice", "pw123", Role::Commercial).await;
    seed(&state, "bob", "secret", Role::Support).await;

    state.auth.authenticate("alice", "pw123").await.unwrap();

    // Simulate a process killed ten hours ago.
    let row = Collaborators::find_by_id(alice.value())
        .one(&state.store.conn)
        .await
        .unwrap()
        .unwrap();
    let mut active: collaborators::ActiveModel = row.into();
    active.last_seen_at = Set(Some(timestamp(Utc::now() - Duration::hours(10))));
    active.update(&state.store.conn).await.unwrap();

    let session = state.auth.authenticate("bob", "secret").await.unwrap();
    assert_eq!(session.username, "bob");
    assert_eq!(connected_count(&state).await, 1);

    let alice = state.store.get_collaborator(alice).await.unwrap().unwrap();
    assert!(!alice.is_connected);
}

#[tokio::test]
async fn touch_keeps_session_fresh() {
    let state = spawn_state().await;
    let id = seed(&state, "alice", "pw123", Role::Commercial).await;

    let session = state.auth.authenticate("alice", "pw123").await.unwrap();
    let before = state
        .store
        .get_collaborator(id)
        .await
        .unwrap()
        .unwrap()
        .last_seen_at;

    state.auth.touch(&session).await.unwrap();
    let after = state
        .store
        .get_collaborator(id)
        .await
        .unwrap()
        .unwrap()
        .last_seen_at;

    assert!(after.is_some());
    assert!(after >= before);
}

#[tokio::test]
async fn release_only_clears_its_own_flag() {
    let state = spawn_state().await;
    let alice = seed(&state, "alice", "pw123", Role::Commercial).await;
    let bob = seed(&state, "bob", "secret", Role::Support).await;

    let alice_session = state.auth.authenticate("alice", "pw123").await.unwrap();

    // Alice's flag goes stale and bob reclaims it.
    let row = Collaborators::find_by_id(alice.value())
        .one(&state.store.conn)
        .await
        .unwrap()
        .unwrap();
    let mut active: collaborators::ActiveModel = row.into();
    active.last_seen_at = Set(Some(timestamp(Utc::now() - Duration::hours(10))));
    active.update(&state.store.conn).await.unwrap();
    let bob_session = state.auth.authenticate("bob", "secret").await.unwrap();

    assert!(!state.auth.release(&alice_session).await.unwrap());
    assert_eq!(
        state.auth.current_connected().await.unwrap(),
        Some((bob, Role::Support))
    );

    assert!(state.auth.release(&bob_session).await.unwrap());
    assert!(state.auth.current_connected().await.unwrap().is_none());
}
