/*!
# Anachain SDK

Everything needed to talk to the Anachain counter program without touching the network:

- **Program ids**: the deployed address for each [`Cluster`]
- **Account layout**: decoding [`CounterState`] from raw account data
- **Instruction builders**: one `build_*_ix` function per program instruction

All functions here are pure. RPC, signing and caching live in `anachain-client`.
*/

mod discriminator;
mod error;
mod instruction_builders;
mod program_ids;
mod state;

pub use discriminator::{account_discriminator, instruction_discriminator, DISCRIMINATOR_LEN};
pub use error::{SdkError, SdkResult};
pub use instruction_builders::*;
pub use program_ids::{
    deployed_program_id, program_id_for, Cluster, ANACHAIN_DEVNET_PROGRAM_ID, ANACHAIN_PROGRAM_ID,
};
pub use state::CounterState;
