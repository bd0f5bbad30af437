use sha2::{Digest, Sha256};

pub const DISCRIMINATOR_LEN: usize = 8;

/// First 8 bytes of `SHA256("global:{name}")`, Anchor's instruction discriminator.
pub fn instruction_discriminator(name: &str) -> [u8; DISCRIMINATOR_LEN] {
    hash_prefix(&format!("global:{name}"))
}

/// First 8 bytes of `SHA256("account:{name}")`, Anchor's account discriminator.
pub fn account_discriminator(name: &str) -> [u8; DISCRIMINATOR_LEN] {
    hash_prefix(&format!("account:{name}"))
}

fn hash_prefix(preimage: &str) -> [u8; DISCRIMINATOR_LEN] {
    let digest = Sha256::digest(preimage.as_bytes());
    let mut discriminator = [0u8; DISCRIMINATOR_LEN];
    discriminator.copy_from_slice(&digest[..DISCRIMINATOR_LEN]);
    discriminator
}
