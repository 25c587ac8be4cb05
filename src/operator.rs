//! Operator signing identity, derived from a configured mnemonic.

use std::fmt;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use ed25519_dalek::{Keypair, PublicKey, SecretKey, Signer};
use sha2::{Digest, Sha256};

use crate::types::Address;

/// The signing account authorized to perform assign/unassign calls.
/// Immutable configuration, shared read-only across concurrent submissions.
#[derive(Clone)]
pub struct Operator {
    keypair: Arc<Keypair>,
    address: Address,
}

impl Operator {
    /// Derive the keypair from a mnemonic phrase. Whitespace is normalized
    /// so the same phrase always yields the same account.
    pub fn from_mnemonic(mnemonic: &str) -> Result<Self> {
        let words: Vec<&str> = mnemonic.split_whitespace().collect();
        if words.is_empty() {
            bail!("operator mnemonic is empty");
        }
        let seed: [u8; 32] = Sha256::digest(words.join(" ").as_bytes()).into();

        let secret = SecretKey::from_bytes(&seed).context("deriving operator secret key")?;
        let public = PublicKey::from(&secret);
        let address = Address::new(public.to_bytes());

        Ok(Self { keypair: Arc::new(Keypair { secret, public }), address })
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Sign raw transaction bytes; hex-encoded detached signature.
    pub fn sign(&self, bytes: &[u8]) -> String {
        hex::encode(self.keypair.sign(bytes).to_bytes())
    }
}

impl fmt::Debug for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operator").field("address", &self.address).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::{Signature, Verifier};

    const MNEMONIC: &str = "abandon ability able about above absent absorb abstract";

    #[test]
    fn same_mnemonic_same_account() {
        let a = Operator::from_mnemonic(MNEMONIC).unwrap();
        let b = Operator::from_mnemonic(&format!("  {}  ", MNEMONIC.replace(' ', "  "))).unwrap();
        assert_eq!(a.address(), b.address());
    }

    #[test]
    fn empty_mnemonic_is_rejected() {
        assert!(Operator::from_mnemonic("   ").is_err());
    }

    #[test]
    fn signatures_verify_against_the_address() {
        let operator = Operator::from_mnemonic(MNEMONIC).unwrap();
        let message = b"group payload";
        let sig_bytes = hex::decode(operator.sign(message)).unwrap();

        let public = PublicKey::from_bytes(operator.address().as_bytes()).unwrap();
        let signature = Signature::from_bytes(&sig_bytes).unwrap();
        assert!(public.verify(message, &signature).is_ok());
    }
}
