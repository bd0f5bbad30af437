use {
    anachain_client::{ClientError, Confirmation, Notifier},
    anachain_sdk::AnachainInstruction,
    solana_sdk::pubkey::Pubkey,
    std::sync::{Mutex, MutexGuard, PoisonError},
};

#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Confirmed(Confirmation),
    Failed {
        instruction: AnachainInstruction,
        account: Pubkey,
        error: String,
    },
}

/// Notifier that keeps every notice for later inspection
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.lock().clone()
    }

    pub fn last(&self) -> Option<Notice> {
        self.lock().last().cloned()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Notice>> {
        self.notices.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Notifier for RecordingNotifier {
    fn transaction_confirmed(&self, confirmation: &Confirmation) {
        self.lock().push(Notice::Confirmed(confirmation.clone()));
    }

    fn transaction_failed(
        &self,
        instruction: &AnachainInstruction,
        account: &Pubkey,
        error: &ClientError,
    ) {
        self.lock().push(Notice::Failed {
            instruction: *instruction,
            account: *account,
            error: error.to_string(),
        });
    }
}
