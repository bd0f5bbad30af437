use crate::{instruction_discriminator, SdkError, SdkResult, DISCRIMINATOR_LEN};
use borsh::{BorshDeserialize, BorshSerialize};
use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
    system_program::ID as SYSTEM_PROGRAM_ID,
};
use std::fmt;

/// The five mutating instructions exposed by the Anachain program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnachainInstruction {
    Initialize,
    Increment,
    Decrement,
    Set { value: u8 },
    Close,
}

#[derive(BorshSerialize, BorshDeserialize)]
struct SetArgs {
    value: u8,
}

impl AnachainInstruction {
    /// Instruction name as declared in the program (and the IDL)
    pub fn name(&self) -> &'static str {
        match self {
            AnachainInstruction::Initialize => "initialize",
            AnachainInstruction::Increment => "increment",
            AnachainInstruction::Decrement => "decrement",
            AnachainInstruction::Set { .. } => "set",
            AnachainInstruction::Close => "close",
        }
    }

    pub fn discriminator(&self) -> [u8; DISCRIMINATOR_LEN] {
        instruction_discriminator(self.name())
    }

    /// Serialize to instruction data (discriminator + borsh args)
    pub fn data(&self) -> SdkResult<Vec<u8>> {
        let mut data = self.discriminator().to_vec();
        if let AnachainInstruction::Set { value } = self {
            SetArgs { value: *value }.serialize(&mut data)?;
        }
        Ok(data)
    }

    /// Parse instruction data produced by [`AnachainInstruction::data`].
    pub fn try_from_data(data: &[u8]) -> SdkResult<Self> {
        if data.len() < DISCRIMINATOR_LEN {
            return Err(SdkError::InstructionDataTooShort(data.len()));
        }

        let mut discriminator = [0u8; DISCRIMINATOR_LEN];
        discriminator.copy_from_slice(&data[..DISCRIMINATOR_LEN]);
        let args = &data[DISCRIMINATOR_LEN..];

        let instruction = [
            AnachainInstruction::Initialize,
            AnachainInstruction::Increment,
            AnachainInstruction::Decrement,
            AnachainInstruction::Set { value: 0 },
            AnachainInstruction::Close,
        ]
        .into_iter()
        .find(|candidate| candidate.discriminator() == discriminator)
        .ok_or(SdkError::UnknownInstruction(discriminator))?;

        match instruction {
            AnachainInstruction::Set { .. } => {
                let SetArgs { value } = SetArgs::deserialize(&mut &args[..])?;
                Ok(AnachainInstruction::Set { value })
            }
            other => Ok(other),
        }
    }
}

impl fmt::Display for AnachainInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnachainInstruction::Set { value } => write!(f, "set({value})"),
            other => write!(f, "{}", other.name()),
        }
    }
}

/// `initialize`: the new account must co-sign alongside the payer.
pub fn build_initialize_ix(
    program_id: &Pubkey,
    payer: &Pubkey,
    anachain: &Pubkey,
) -> SdkResult<Instruction> {
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*payer, true),
            AccountMeta::new(*anachain, true),
            AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
        ],
        data: AnachainInstruction::Initialize.data()?,
    })
}

pub fn build_increment_ix(program_id: &Pubkey, anachain: &Pubkey) -> SdkResult<Instruction> {
    build_update_ix(program_id, anachain, AnachainInstruction::Increment)
}

pub fn build_decrement_ix(program_id: &Pubkey, anachain: &Pubkey) -> SdkResult<Instruction> {
    build_update_ix(program_id, anachain, AnachainInstruction::Decrement)
}

pub fn build_set_ix(program_id: &Pubkey, anachain: &Pubkey, value: u8) -> SdkResult<Instruction> {
    build_update_ix(program_id, anachain, AnachainInstruction::Set { value })
}

/// `close`: rent is returned to `payer`, who must sign.
pub fn build_close_ix(
    program_id: &Pubkey,
    payer: &Pubkey,
    anachain: &Pubkey,
) -> SdkResult<Instruction> {
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*payer, true),
            AccountMeta::new(*anachain, false),
        ],
        data: AnachainInstruction::Close.data()?,
    })
}

/// Build whichever instruction `instruction` names, bound to `anachain`.
pub fn build_instruction(
    program_id: &Pubkey,
    payer: &Pubkey,
    anachain: &Pubkey,
    instruction: &AnachainInstruction,
) -> SdkResult<Instruction> {
    match instruction {
        AnachainInstruction::Initialize => build_initialize_ix(program_id, payer, anachain),
        AnachainInstruction::Close => build_close_ix(program_id, payer, anachain),
        update => build_update_ix(program_id, anachain, *update),
    }
}

// increment / decrement / set share one account list
fn build_update_ix(
    program_id: &Pubkey,
    anachain: &Pubkey,
    instruction: AnachainInstruction,
) -> SdkResult<Instruction> {
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![AccountMeta::new(*anachain, false)],
        data: instruction.data()?,
    })
}
