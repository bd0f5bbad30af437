use anachain_client::{ClientError, EntryStatus};
use anachain_sdk::CounterState;
use anachain_testing::TestFixture;
use solana_sdk::{account::Account, pubkey::Pubkey};

fn program_owned(test: &TestFixture, data: Vec<u8>) -> Account {
    Account {
        lamports: 1_000_000,
        data,
        owner: *test.program.program_id(),
        executable: false,
        rent_epoch: 0,
    }
}

/// Test that malformed account data fails only the read that touches it
///
/// Should test:
/// - Wrong discriminator is a decoding error naming the address
/// - Other accounts still read fine
/// - The failed entry is marked failed, others stay fresh
#[tokio::test]
async fn test_decoding_error_isolated() {
    let test = TestFixture::new();
    let healthy = test.initialize_account().await;

    let corrupt_address = Pubkey::new_unique();
    test.ledger
        .write_account(corrupt_address, program_owned(&test, vec![7; CounterState::LEN]));
    let corrupt = test.program.account(corrupt_address);

    match corrupt.fetch().await {
        Err(ClientError::Decoding { address, .. }) => assert_eq!(address, corrupt_address),
        other => panic!("Expected decoding error, got {other:?}"),
    }

    assert_eq!(healthy.fetch().await.unwrap(), Some(CounterState { count: 0 }));
    assert!(matches!(corrupt.snapshot().status, EntryStatus::Failed(_)));
    assert!(matches!(healthy.snapshot().status, EntryStatus::Fresh));

    // Wrong discriminator is filtered out of the listing
    assert_eq!(test.program.refetch_all().await.unwrap().len(), 1);

    println!("✅ Decoding failure isolated to its own account");
}

/// A truncated counter passes the listing filter and fails the whole listing
#[tokio::test]
async fn test_truncated_account_fails_listing() {
    let test = TestFixture::new();
    let healthy = test.initialize_account().await;

    let truncated_address = Pubkey::new_unique();
    test.ledger.write_account(
        truncated_address,
        program_owned(&test, CounterState::discriminator().to_vec()),
    );

    match test.program.refetch_all().await {
        Err(ClientError::Decoding { address, .. }) => assert_eq!(address, truncated_address),
        other => panic!("Expected decoding error, got {other:?}"),
    }

    assert_eq!(healthy.refetch().await.unwrap(), Some(CounterState { count: 0 }));

    println!("✅ Truncated account reported by address");
}

/// An account owned by another program is not a counter
#[tokio::test]
async fn test_foreign_owner_is_decoding_error() {
    let test = TestFixture::new();

    let address = Pubkey::new_unique();
    test.ledger.write_account(
        address,
        Account {
            lamports: 1_000_000,
            data: CounterState { count: 3 }.to_account_data().unwrap(),
            owner: Pubkey::new_unique(),
            executable: false,
            rent_epoch: 0,
        },
    );

    assert!(matches!(
        test.program.account(address).fetch().await,
        Err(ClientError::Decoding { .. })
    ));

    println!("✅ Foreign-owned account rejected");
}
