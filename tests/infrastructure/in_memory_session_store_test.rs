use std::sync::Arc;
use std::time::Duration;

use chemimaster::application::ports::{SessionStore, SessionStoreError};
use chemimaster::domain::{ChatTurn, Session, SessionId};
use chemimaster::infrastructure::persistence::InMemorySessionStore;

#[tokio::test]
async fn given_created_session_when_fetched_then_returned() {
    let store = InMemorySessionStore::new();
    let session = Session::new();

    store.create(&session).await.unwrap();
    let fetched = store.get(session.id).await.unwrap();

    assert_eq!(fetched.map(|s| s.id), Some(session.id));
}

#[tokio::test]
async fn given_unknown_id_when_fetched_then_none() {
    let store = InMemorySessionStore::new();

    assert!(store.get(SessionId::new()).await.unwrap().is_none());
}

#[tokio::test]
async fn given_duplicate_id_when_creating_then_constraint_violation() {
    let store = InMemorySessionStore::new();
    let session = Session::new();
    store.create(&session).await.unwrap();

    let result = store.create(&session).await;

    assert!(matches!(
        result,
        Err(SessionStoreError::ConstraintViolation(_))
    ));
}

#[tokio::test]
async fn given_update_when_applied_then_result_returned_and_visible() {
    let store = InMemorySessionStore::new();
    let session = Session::new();
    store.create(&session).await.unwrap();

    let updated = store
        .update(
            session.id,
            Box::new(|session: &mut Session| {
                session.authenticate();
                session.history.push_user("What is entropy?");
            }),
        )
        .await
        .unwrap();

    assert!(updated.authenticated);
    let fetched = store.get(session.id).await.unwrap().unwrap();
    assert!(fetched.authenticated);
    assert_eq!(fetched.history.len(), 1);
}

#[tokio::test]
async fn given_unknown_session_when_updated_then_not_found() {
    let store = InMemorySessionStore::new();

    let result = store
        .update(SessionId::new(), Box::new(|session: &mut Session| session.logout()))
        .await;

    assert!(matches!(result, Err(SessionStoreError::NotFound(_))));
}

#[tokio::test]
async fn given_two_sessions_when_one_updated_then_other_untouched() {
    let store = InMemorySessionStore::new();
    let first = Session::new();
    let second = Session::new();
    store.create(&first).await.unwrap();
    store.create(&second).await.unwrap();

    store
        .update(first.id, Box::new(|session: &mut Session| session.authenticate()))
        .await
        .unwrap();

    let other = store.get(second.id).await.unwrap().unwrap();
    assert!(!other.authenticated);
    assert_eq!(store.len().await, 2);
}

#[tokio::test]
async fn given_concurrent_appends_when_updating_same_session_then_none_lost() {
    let store = Arc::new(InMemorySessionStore::new());
    let session = Session::new();
    store.create(&session).await.unwrap();

    let tasks: Vec<_> = (0..20)
        .map(|i| {
            let store = Arc::clone(&store);
            let id = session.id;
            tokio::spawn(async move {
                store
                    .update(
                        id,
                        Box::new(move |session: &mut Session| {
                            session.history.push(ChatTurn::user(format!("q{}", i)));
                        }),
                    )
                    .await
                    .unwrap();
            })
        })
        .collect();
    for task in tasks {
        task.await.unwrap();
    }

    let stored = store.get(session.id).await.unwrap().unwrap();
    assert_eq!(stored.history.len(), 20);
}

#[tokio::test]
async fn given_idle_session_when_ttl_elapsed_then_gone() {
    let store = InMemorySessionStore::with_limits(Duration::from_millis(20), 100);
    let session = Session::new();
    store.create(&session).await.unwrap();

    tokio::time::sleep(Duration::from_millis(60)).await;

    assert!(store.get(session.id).await.unwrap().is_none());
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn given_idle_sessions_when_new_session_created_then_expired_ones_swept() {
    let store = InMemorySessionStore::with_limits(Duration::from_millis(20), 100);
    for _ in 0..5 {
        store.create(&Session::new()).await.unwrap();
    }

    tokio::time::sleep(Duration::from_millis(60)).await;
    store.create(&Session::new()).await.unwrap();

    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn given_store_at_capacity_when_creating_then_least_recently_used_evicted() {
    let store = InMemorySessionStore::with_limits(Duration::from_secs(3600), 2);
    let first = Session::new();
    let second = Session::new();
    let third = Session::new();
    store.create(&first).await.unwrap();
    tokio::time::sleep(Duration::from_millis(5)).await;
    store.create(&second).await.unwrap();
    tokio::time::sleep(Duration::from_millis(5)).await;
    store.get(first.id).await.unwrap();

    store.create(&third).await.unwrap();

    assert_eq!(store.len().await, 2);
    assert!(store.get(first.id).await.unwrap().is_some());
    assert!(store.get(second.id).await.unwrap().is_none());
    assert!(store.get(third.id).await.unwrap().is_some());
}

#[tokio::test]
async fn given_session_when_removed_then_gone() {
    let store = InMemorySessionStore::new();
    let session = Session::new();
    store.create(&session).await.unwrap();

    assert!(store.remove(session.id).await.unwrap());
    assert!(!store.remove(session.id).await.unwrap());
    assert!(store.is_empty().await);
}
