//! Integration tests for the initialization state machine.
//!
//! All tests use zero-delay retry policies so the bounded loops run
//! without real sleeps.

mod common;

use airatlas_lib::{Error, InitState, RetryPolicy, Supervisor};

#[tokio::test]
async fn seeded_store_reaches_ready() {
    let airports = common::sample_airports();
    let (_guard, path) = common::temp_store(&airports);

    let mut supervisor = Supervisor::new(&path, RetryPolicy::immediate(3, 3));
    assert_eq!(supervisor.state(), InitState::Connecting);

    let dataset = supervisor.run().await.unwrap();
    assert_eq!(supervisor.state(), InitState::Ready);
    assert_eq!(dataset.len(), airports.len());
}

#[tokio::test]
async fn missing_store_fails_after_connect_budget() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope").join("airports.db");

    let mut supervisor = Supervisor::new(&missing, RetryPolicy::immediate(4, 2));
    match supervisor.run().await {
        Err(Error::InitTimedOut { phase, attempts }) => {
            assert_eq!(phase, "connecting");
            assert_eq!(attempts, 4);
        }
        other => panic!("unexpected result: {other:?}"),
    }
    assert_eq!(supervisor.state(), InitState::Failed);
}

#[tokio::test]
async fn empty_table_fails_after_data_budget() {
    let (_guard, path) = common::empty_store();

    let mut supervisor = Supervisor::new(&path, RetryPolicy::immediate(2, 5));
    match supervisor.run().await {
        Err(Error::InitTimedOut { phase, attempts }) => {
            assert_eq!(phase, "awaiting data");
            assert_eq!(attempts, 5);
        }
        other => panic!("unexpected result: {other:?}"),
    }
    assert_eq!(supervisor.state(), InitState::Failed);
}

#[tokio::test(flavor = "multi_thread")]
async fn initialization_completes_on_a_spawned_task() {
    // The service runs the supervisor on a background task while the HTTP
    // listener starts, so the whole run must be spawnable.
    let airports = common::sample_airports();
    let (_guard, path) = common::temp_store(&airports);

    let handle = tokio::spawn(async move {
        let mut supervisor = Supervisor::new(&path, RetryPolicy::immediate(3, 3));
        let dataset = supervisor.run().await?;
        Ok::<_, Error>((supervisor.state(), dataset.len()))
    });

    let (state, count) = handle.await.unwrap().unwrap();
    assert_eq!(state, InitState::Ready);
    assert_eq!(count, airports.len());
}

#[tokio::test]
async fn table_created_by_racing_ingestion_is_picked_up() {
    // The table does not exist when the supervisor connects; a later retry
    // must find the rows the ingestion job inserted in the meantime.
    let (_guard, path) = common::bare_store();

    let seed_path = path.clone();
    let seeder = std::thread::spawn(move || {
        std::thread::sleep(std::time::Duration::from_millis(50));
        common::seed_store(&seed_path, &common::sample_airports());
    });

    let policy = RetryPolicy {
        connect_attempts: 2,
        connect_delay: std::time::Duration::ZERO,
        data_attempts: 100,
        data_delay: std::time::Duration::from_millis(10),
    };
    let mut supervisor = Supervisor::new(&path, policy);
    let dataset = supervisor.run().await.unwrap();
    seeder.join().unwrap();

    assert_eq!(supervisor.state(), InitState::Ready);
    assert_eq!(dataset.len(), 4);
}

#[test]
fn default_policy_matches_deployment_budgets() {
    let policy = RetryPolicy::default();
    assert_eq!(policy.connect_attempts, 10);
    assert_eq!(policy.data_attempts, 20);
    assert_eq!(policy.connect_delay.as_secs(), 5);
    assert_eq!(policy.data_delay.as_secs(), 5);
}
