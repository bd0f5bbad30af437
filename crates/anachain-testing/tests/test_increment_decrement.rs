use anachain_sdk::CounterState;
use anachain_testing::{demand_rejection, TestFixture};

/// Test n increments followed by m <= n decrements
///
/// Should test:
/// - Each confirmed mutation is visible to the next fetch
/// - Final count is n - m
#[tokio::test]
async fn test_increment_decrement() {
    let test = TestFixture::new();

    for (n, m) in [(0u8, 0u8), (1, 1), (5, 3), (10, 0)] {
        let account = test.initialize_account().await;

        for i in 1..=n {
            account.increment().await.unwrap();
            assert_eq!(account.fetch().await.unwrap(), Some(CounterState { count: i }));
        }
        for _ in 0..m {
            account.decrement().await.unwrap();
        }

        assert_eq!(
            account.fetch().await.unwrap(),
            Some(CounterState { count: n - m }),
            "{n} increments, {m} decrements"
        );
    }

    println!("✅ Counts match increments minus decrements");
}

/// Decrementing below zero is refused and leaves the cached count alone
#[tokio::test]
async fn test_decrement_underflow_is_rejected() {
    let test = TestFixture::new();
    let account = test.initialize_account().await;

    demand_rejection(account.decrement().await, "out of range");

    let snapshot = account.snapshot();
    assert!(!snapshot.is_stale());
    assert_eq!(snapshot.value, Some(CounterState { count: 0 }));
    assert_eq!(account.refetch().await.unwrap(), Some(CounterState { count: 0 }));

    println!("✅ Underflow rejected");
}

/// Incrementing past the state's width is refused
#[tokio::test]
async fn test_increment_overflow_is_rejected() {
    let test = TestFixture::new();
    let account = test.initialize_account().await;

    account.set(u8::MAX).await.unwrap();
    demand_rejection(account.increment().await, "out of range");

    assert_eq!(
        account.fetch().await.unwrap(),
        Some(CounterState { count: u8::MAX })
    );

    println!("✅ Overflow rejected");
}
