use crate::{account_discriminator, SdkError, SdkResult, DISCRIMINATOR_LEN};
use borsh::{BorshDeserialize, BorshSerialize};

/// On-chain state of one Anachain counter account.
///
/// Account data is laid out the way Anchor lays out `#[account]` structs:
/// an 8 byte discriminator followed by the borsh encoded fields.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CounterState {
    pub count: u8,
}

impl CounterState {
    /// Anchor account name, used for the account discriminator
    pub const ACCOUNT_NAME: &'static str = "Anachain";

    /// Total account size including the discriminator
    pub const LEN: usize = DISCRIMINATOR_LEN + 1;

    pub fn discriminator() -> [u8; DISCRIMINATOR_LEN] {
        account_discriminator(Self::ACCOUNT_NAME)
    }

    /// Decode raw account data, checking the discriminator first.
    pub fn try_from_account_data(data: &[u8]) -> SdkResult<Self> {
        if data.len() < Self::LEN {
            return Err(SdkError::AccountDataTooShort {
                len: data.len(),
                required: Self::LEN,
            });
        }

        let expected = Self::discriminator();
        let mut found = [0u8; DISCRIMINATOR_LEN];
        found.copy_from_slice(&data[..DISCRIMINATOR_LEN]);
        if found != expected {
            return Err(SdkError::DiscriminatorMismatch { expected, found });
        }

        // Anchor tolerates trailing bytes (realloc padding), so do we
        let state = Self::deserialize(&mut &data[DISCRIMINATOR_LEN..])?;
        Ok(state)
    }

    /// Encode as account data (discriminator + fields)
    pub fn to_account_data(&self) -> SdkResult<Vec<u8>> {
        let mut data = Vec::with_capacity(Self::LEN);
        data.extend_from_slice(&Self::discriminator());
        self.serialize(&mut data)?;
        Ok(data)
    }
}
