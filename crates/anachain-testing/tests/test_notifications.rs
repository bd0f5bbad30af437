use anachain_sdk::AnachainInstruction;
use anachain_testing::{Notice, TestFixture, LAMPORTS_PER_SIGNATURE};
use solana_sdk::{
    account::Account,
    signature::{Keypair, Signer},
    system_program,
};

/// Test the notices sent for confirmed and failed mutations
///
/// Should test:
/// - Confirmations carry the cluster and an explorer link for it
/// - Failures carry the operation, account and reason
#[tokio::test]
async fn test_notifications() {
    let test = TestFixture::new();
    let account = test.initialize_account().await;

    let confirmation = account.set(3).await.unwrap();
    let url = confirmation.explorer_url();
    assert!(url.contains(&confirmation.signature.to_string()));
    assert!(url.contains("?cluster=custom&customUrl="));

    // Enough for the fee, not for rent
    let broke = TestFixture::new();
    broke.ledger.write_account(
        broke.payer_address(),
        Account {
            lamports: 2 * LAMPORTS_PER_SIGNATURE,
            data: vec![],
            owner: system_program::ID,
            executable: false,
            rent_epoch: 0,
        },
    );
    let keypair = Keypair::new();
    assert!(broke.program.initialize(&keypair).await.is_err());

    match broke.notifier.last() {
        Some(Notice::Failed {
            instruction,
            account,
            error,
        }) => {
            assert_eq!(instruction, AnachainInstruction::Initialize);
            assert_eq!(account, keypair.pubkey());
            assert!(error.contains("rent"), "unexpected reason: {error}");
        }
        other => panic!("Expected failure notice, got {other:?}"),
    }
    assert_eq!(broke.ledger.balance(&broke.payer_address()), 2 * LAMPORTS_PER_SIGNATURE);

    println!("✅ Notices delivered");
}
