use anachain_sdk::CounterState;
use anachain_testing::TestFixture;
use std::time::Duration;
use tokio::time::timeout;

/// Test the ordering guarantee while a transaction is awaiting confirmation
///
/// Should test:
/// - The account's entry is pending (and stale) while the send is in flight
/// - The previous value stays readable without blocking
/// - A fetch started during the mutation only resolves with a value read
///   after confirmation
#[tokio::test]
async fn test_pending_during_mutation() {
    let test = TestFixture::new();
    let account = test.initialize_account().await;

    test.ledger.hold_sends();

    let mutation = {
        let account = account.clone();
        tokio::spawn(async move { account.increment().await })
    };

    timeout(Duration::from_secs(5), async {
        while test.ledger.parked_sends() == 0 {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("Increment never reached the ledger");

    let snapshot = account.snapshot();
    assert!(snapshot.is_pending());
    assert!(snapshot.is_stale());
    assert_eq!(snapshot.value, Some(CounterState { count: 0 }));
    assert!(test.program.accounts().is_pending());

    let reader = {
        let account = account.clone();
        tokio::spawn(async move { account.fetch().await })
    };
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
    assert!(!reader.is_finished());

    test.ledger.release_sends();

    mutation.await.unwrap().expect("Increment failed");
    assert_eq!(
        reader.await.unwrap().unwrap(),
        Some(CounterState { count: 1 })
    );
    assert!(!account.snapshot().is_stale());

    println!("✅ Reads during a mutation wait for the post-confirmation value");
}

/// With refetch-before-resolve disabled a fetch right after the mutation still sees the new value
#[tokio::test]
async fn test_fetch_after_mutation_without_awaiting_refetch() {
    let test = TestFixture::with_config(anachain_client::ClientConfig {
        await_refetch: false,
        ..Default::default()
    });
    let account = test.initialize_account().await;

    for expected in 1..=3 {
        account.increment().await.unwrap();
        assert_eq!(
            account.fetch().await.unwrap(),
            Some(CounterState { count: expected })
        );
    }

    println!("✅ Post-confirmation fetch never sees an older value");
}
