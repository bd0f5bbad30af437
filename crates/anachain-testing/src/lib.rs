mod mock_ledger;
mod recording_notifier;
mod test_fixture;

pub use {
    anachain_client::{ClientError, ClientResult},
    mock_ledger::{MockLedger, LAMPORTS_PER_SIGNATURE},
    recording_notifier::{Notice, RecordingNotifier},
    test_fixture::TestFixture,
};

/// Standard test constants
pub const TEST_PAYER_LAMPORTS: u64 = 10_000_000_000; // 10 SOL

/// Assert that `result` is a ledger rejection whose reason contains `expected`
pub fn demand_rejection<T: std::fmt::Debug>(result: ClientResult<T>, expected: &str) {
    match result {
        Err(ClientError::RejectedTransaction(reason)) => assert!(
            reason.contains(expected),
            "Expected rejection containing {expected:?}, got {reason:?}"
        ),
        other => panic!("Expected rejected transaction ({expected}), got {other:?}"),
    }
}
