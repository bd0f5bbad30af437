use anachain_client::AnachainAccount;
use anachain_sdk::AnachainInstruction;
use anachain_testing::{Notice, TestFixture};

async fn count(account: &AnachainAccount) -> Option<u8> {
    account
        .fetch()
        .await
        .expect("Failed to fetch account")
        .map(|state| state.count)
}

/// End-to-end: initialize -> increment -> increment -> decrement -> set(42) -> close
///
/// Should test:
/// - Counts observed after each step are 0, 1, 2, 1, 42 and then not found
/// - One confirmation notice per step, in order
#[tokio::test]
async fn test_counter_lifecycle() {
    let test = TestFixture::new();
    let account = test.initialize_account().await;

    let mut observed = vec![count(&account).await];

    account.increment().await.unwrap();
    observed.push(count(&account).await);
    account.increment().await.unwrap();
    observed.push(count(&account).await);
    account.decrement().await.unwrap();
    observed.push(count(&account).await);
    account.set(42).await.unwrap();
    observed.push(count(&account).await);
    account.close().await.unwrap();
    observed.push(count(&account).await);

    assert_eq!(
        observed,
        vec![Some(0), Some(1), Some(2), Some(1), Some(42), None]
    );

    let instructions: Vec<_> = test
        .notifier
        .notices()
        .into_iter()
        .map(|notice| match notice {
            Notice::Confirmed(confirmation) => confirmation.instruction,
            failed @ Notice::Failed { .. } => panic!("Unexpected failure notice: {failed:?}"),
        })
        .collect();
    assert_eq!(
        instructions,
        vec![
            AnachainInstruction::Initialize,
            AnachainInstruction::Increment,
            AnachainInstruction::Increment,
            AnachainInstruction::Decrement,
            AnachainInstruction::Set { value: 42 },
            AnachainInstruction::Close,
        ]
    );

    println!("✅ Lifecycle observed 0, 1, 2, 1, 42, not found");
}
