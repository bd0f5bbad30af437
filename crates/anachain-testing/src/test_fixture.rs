use {
    crate::{MockLedger, RecordingNotifier, TEST_PAYER_LAMPORTS},
    anachain_client::{AnachainAccount, AnachainProgram, ClientConfig},
    anachain_sdk::{program_id_for, Cluster},
    solana_sdk::{
        pubkey::Pubkey,
        signature::{Keypair, Signer},
    },
    std::sync::Arc,
};

/// A funded payer and a program handle wired to a [`MockLedger`]
pub struct TestFixture {
    pub ledger: Arc<MockLedger>,
    pub payer: Arc<Keypair>,
    pub notifier: Arc<RecordingNotifier>,
    pub program: Arc<AnachainProgram>,
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl TestFixture {
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    pub fn with_config(config: ClientConfig) -> Self {
        let cluster = Cluster::Localnet;
        let program_id = config
            .program_id_override
            .unwrap_or_else(|| program_id_for(&cluster));

        let ledger = Arc::new(MockLedger::new(program_id));
        let payer = Arc::new(Keypair::new());
        ledger.airdrop(&payer.pubkey(), TEST_PAYER_LAMPORTS);

        let notifier = Arc::new(RecordingNotifier::default());
        let program = Arc::new(AnachainProgram::with_notifier(
            cluster,
            ledger.clone(),
            payer.clone(),
            config,
            notifier.clone(),
        ));

        Self {
            ledger,
            payer,
            notifier,
            program,
        }
    }

    pub fn payer_address(&self) -> Pubkey {
        self.payer.pubkey()
    }

    pub fn payer_balance(&self) -> u64 {
        self.ledger.balance(&self.payer.pubkey())
    }

    /// Initialize a fresh counter and return its handle
    pub async fn initialize_account(&self) -> AnachainAccount {
        let keypair = Keypair::new();
        self.program
            .initialize(&keypair)
            .await
            .unwrap_or_else(|e| panic!("Failed to initialize account {}: {e}", keypair.pubkey()));
        self.program.account(keypair.pubkey())
    }

    /// Handle for an address that was never initialized
    pub fn unknown_account(&self) -> AnachainAccount {
        self.program.account(Pubkey::new_unique())
    }
}
