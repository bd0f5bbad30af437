use {
    anachain_client::{Ledger, LedgerError, LedgerResult},
    anachain_sdk::{AnachainInstruction, CounterState},
    async_trait::async_trait,
    solana_sdk::{
        account::Account,
        bpf_loader_upgradeable,
        hash::Hash,
        instruction::CompiledInstruction,
        message::Message,
        pubkey::Pubkey,
        rent::Rent,
        signature::Signature,
        transaction::Transaction,
    },
    std::{
        collections::{HashMap, HashSet},
        sync::{
            atomic::{AtomicUsize, Ordering},
            Mutex, MutexGuard, PoisonError,
        },
    },
    tokio::sync::watch,
};

/// Fee charged per signature, as on mainnet
pub const LAMPORTS_PER_SIGNATURE: u64 = 5_000;

#[derive(Default)]
struct LedgerState {
    accounts: HashMap<Pubkey, Account>,
    blockhashes: HashSet<Hash>,
    processed: HashSet<Signature>,
    unreachable: bool,
    fail_next_send: Option<LedgerError>,
    max_value: Option<u8>,
    get_account_calls: usize,
    confirmed_transactions: usize,
}

/// In-process ledger running the Anachain counter program.
///
/// Transactions are verified and executed atomically against an account map,
/// with the same account and signer requirements as the deployed program.
/// Faults (unreachable endpoint, rejected send, held confirmations) can be
/// injected per test.
pub struct MockLedger {
    program_id: Pubkey,
    state: Mutex<LedgerState>,
    hold: watch::Sender<bool>,
    parked_sends: AtomicUsize,
}

impl MockLedger {
    pub fn new(program_id: Pubkey) -> Self {
        let (hold, _) = watch::channel(false);
        Self {
            program_id,
            state: Mutex::new(LedgerState::default()),
            hold,
            parked_sends: AtomicUsize::new(0),
        }
    }

    pub fn program_id(&self) -> &Pubkey {
        &self.program_id
    }

    pub fn airdrop(&self, to: &Pubkey, lamports: u64) {
        let mut state = self.state();
        let account = state.accounts.entry(*to).or_insert_with(|| Account {
            lamports: 0,
            data: vec![],
            owner: solana_sdk::system_program::ID,
            executable: false,
            rent_epoch: 0,
        });
        account.lamports += lamports;
    }

    pub fn account(&self, address: &Pubkey) -> Option<Account> {
        self.state().accounts.get(address).cloned()
    }

    /// Overwrite an account directly, bypassing the program
    pub fn write_account(&self, address: Pubkey, account: Account) {
        self.state().accounts.insert(address, account);
    }

    pub fn balance(&self, address: &Pubkey) -> u64 {
        self.state()
            .accounts
            .get(address)
            .map_or(0, |account| account.lamports)
    }

    /// Place an executable account at the program id
    pub fn deploy_program(&self) {
        self.write_account(
            self.program_id,
            Account {
                lamports: 1_141_440,
                data: vec![0; 36],
                owner: bpf_loader_upgradeable::ID,
                executable: true,
                rent_epoch: 0,
            },
        );
    }

    /// Every call fails with `Unreachable` while set
    pub fn set_unreachable(&self, unreachable: bool) {
        self.state().unreachable = unreachable;
    }

    /// The next `send_and_confirm` fails with `error` without executing anything
    pub fn fail_next_send(&self, error: LedgerError) {
        self.state().fail_next_send = Some(error);
    }

    /// Largest value the program accepts for `set` (defaults to `u8::MAX`)
    pub fn set_max_value(&self, max_value: u8) {
        self.state().max_value = Some(max_value);
    }

    /// Park every `send_and_confirm` until [`Self::release_sends`]
    pub fn hold_sends(&self) {
        self.hold.send_replace(true);
    }

    pub fn release_sends(&self) {
        self.hold.send_replace(false);
    }

    /// Number of sends currently parked by [`Self::hold_sends`]
    pub fn parked_sends(&self) -> usize {
        self.parked_sends.load(Ordering::SeqCst)
    }

    pub fn get_account_calls(&self) -> usize {
        self.state().get_account_calls
    }

    pub fn confirmed_transactions(&self) -> usize {
        self.state().confirmed_transactions
    }

    fn state(&self) -> MutexGuard<'_, LedgerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_reachable(state: &LedgerState) -> LedgerResult<()> {
        if state.unreachable {
            return Err(LedgerError::Unreachable(
                "error sending request: connection refused".to_string(),
            ));
        }
        Ok(())
    }

    async fn wait_until_released(&self) {
        let mut hold = self.hold.subscribe();
        if !*hold.borrow() {
            return;
        }

        self.parked_sends.fetch_add(1, Ordering::SeqCst);
        let _ = hold.wait_for(|held| !*held).await;
        self.parked_sends.fetch_sub(1, Ordering::SeqCst);
    }

    fn process_transaction(
        &self,
        state: &mut LedgerState,
        transaction: &Transaction,
    ) -> LedgerResult<Signature> {
        let message = &transaction.message;

        let signature = *transaction
            .signatures
            .first()
            .ok_or_else(|| rejected("Transaction has no signatures"))?;

        if !state.blockhashes.contains(&message.recent_blockhash) {
            return Err(rejected("Blockhash not found"));
        }
        if state.processed.contains(&signature) {
            return Err(rejected("This transaction has already been processed"));
        }
        transaction
            .verify()
            .map_err(|_| rejected("Transaction did not pass signature verification"))?;

        let fee_payer = *message
            .account_keys
            .first()
            .ok_or_else(|| rejected("Transaction has no fee payer"))?;

        // Execute against a copy so a failing instruction leaves nothing behind
        let mut accounts = state.accounts.clone();

        let fee = LAMPORTS_PER_SIGNATURE * transaction.signatures.len() as u64;
        let payer_account = accounts
            .get_mut(&fee_payer)
            .filter(|account| account.lamports >= fee)
            .ok_or_else(|| rejected("Insufficient funds for fee"))?;
        payer_account.lamports -= fee;

        let max_value = state.max_value.unwrap_or(u8::MAX);
        for (index, instruction) in message.instructions.iter().enumerate() {
            self.execute_instruction(&mut accounts, message, instruction, max_value)
                .map_err(|reason| {
                    rejected(&format!("Error processing Instruction {index}: {reason}"))
                })?;
        }

        state.accounts = accounts;
        state.processed.insert(signature);
        state.confirmed_transactions += 1;

        Ok(signature)
    }

    fn execute_instruction(
        &self,
        accounts: &mut HashMap<Pubkey, Account>,
        message: &Message,
        instruction: &CompiledInstruction,
        max_value: u8,
    ) -> Result<(), String> {
        let program_id = message
            .account_keys
            .get(instruction.program_id_index as usize)
            .ok_or("invalid program index")?;
        if *program_id != self.program_id {
            return Err(format!("unsupported program {program_id}"));
        }

        let ix = AnachainInstruction::try_from_data(&instruction.data)
            .map_err(|_| "custom program error: 0x65 (InstructionFallbackNotFound)")?;

        // (address, is_signer) of the instruction's n-th account
        let account_at = |n: usize| -> Result<(Pubkey, bool), String> {
            let index = *instruction
                .accounts
                .get(n)
                .ok_or("not enough account keys given to the instruction")?
                as usize;
            let address = *message
                .account_keys
                .get(index)
                .ok_or("invalid account index")?;
            Ok((address, message.is_signer(index)))
        };

        match ix {
            AnachainInstruction::Initialize => {
                let (payer, payer_signed) = account_at(0)?;
                let (anachain, anachain_signed) = account_at(1)?;
                if !payer_signed || !anachain_signed {
                    return Err("missing required signature for instruction".to_string());
                }
                if accounts
                    .get(&anachain)
                    .is_some_and(|account| account.lamports > 0 || !account.data.is_empty())
                {
                    return Err(format!("account {anachain} already in use"));
                }

                let rent = Rent::default().minimum_balance(CounterState::LEN);
                let payer_account = accounts
                    .get_mut(&payer)
                    .filter(|account| account.lamports >= rent)
                    .ok_or("insufficient lamports for rent")?;
                payer_account.lamports -= rent;

                let data = CounterState::default()
                    .to_account_data()
                    .map_err(|e| e.to_string())?;
                accounts.insert(
                    anachain,
                    Account {
                        lamports: rent,
                        data,
                        owner: self.program_id,
                        executable: false,
                        rent_epoch: 0,
                    },
                );
            }
            AnachainInstruction::Increment
            | AnachainInstruction::Decrement
            | AnachainInstruction::Set { .. } => {
                let (anachain, _) = account_at(0)?;
                let account = accounts
                    .get_mut(&anachain)
                    .filter(|account| account.owner == self.program_id)
                    .ok_or("custom program error: 0xbc4 (AccountNotInitialized)")?;
                let mut state = CounterState::try_from_account_data(&account.data)
                    .map_err(|_| "custom program error: 0xbba (AccountDidNotDeserialize)")?;

                state.count = match ix {
                    AnachainInstruction::Increment => state.count.checked_add(1),
                    AnachainInstruction::Decrement => state.count.checked_sub(1),
                    AnachainInstruction::Set { value } => (value <= max_value).then_some(value),
                    _ => None,
                }
                .ok_or("custom program error: 0x1770 (value out of range)")?;

                account.data = state.to_account_data().map_err(|e| e.to_string())?;
            }
            AnachainInstruction::Close => {
                let (payer, payer_signed) = account_at(0)?;
                let (anachain, _) = account_at(1)?;
                if !payer_signed {
                    return Err("missing required signature for instruction".to_string());
                }

                let closed = accounts
                    .remove(&anachain)
                    .filter(|account| account.owner == self.program_id)
                    .ok_or("custom program error: 0xbc4 (AccountNotInitialized)")?;
                let payer_account = accounts
                    .get_mut(&payer)
                    .ok_or("payer account not found")?;
                payer_account.lamports += closed.lamports;
            }
        }

        Ok(())
    }
}

fn rejected(reason: &str) -> LedgerError {
    LedgerError::Rejected(reason.to_string())
}

#[async_trait]
impl Ledger for MockLedger {
    async fn get_account(&self, address: &Pubkey) -> LedgerResult<Option<Account>> {
        let mut state = self.state();
        Self::check_reachable(&state)?;
        state.get_account_calls += 1;
        Ok(state.accounts.get(address).cloned())
    }

    async fn get_program_accounts(
        &self,
        program_id: &Pubkey,
        discriminator: &[u8],
    ) -> LedgerResult<Vec<(Pubkey, Account)>> {
        let state = self.state();
        Self::check_reachable(&state)?;
        Ok(state
            .accounts
            .iter()
            .filter(|(_, account)| {
                account.owner == *program_id && account.data.starts_with(discriminator)
            })
            .map(|(address, account)| (*address, account.clone()))
            .collect())
    }

    async fn latest_blockhash(&self) -> LedgerResult<Hash> {
        let mut state = self.state();
        Self::check_reachable(&state)?;
        let blockhash = Hash::new_unique();
        state.blockhashes.insert(blockhash);
        Ok(blockhash)
    }

    async fn send_and_confirm(&self, transaction: &Transaction) -> LedgerResult<Signature> {
        {
            let mut state = self.state();
            Self::check_reachable(&state)?;
            if let Some(error) = state.fail_next_send.take() {
                return Err(error);
            }
        }

        self.wait_until_released().await;

        let mut state = self.state();
        Self::check_reachable(&state)?;
        self.process_transaction(&mut state, transaction)
    }
}
