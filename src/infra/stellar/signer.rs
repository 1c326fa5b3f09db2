//! Keypair signer bound to a network passphrase.
//!
//! Holds the funding identity and signs on its behalf; raw key bytes never
//! leave the identity.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::sync::Arc;

use crate::app::funding::FundingIdentity;
use crate::domain::{AppError, DecoratedSignature, SignerError, TransactionSigner};

/// Network id: SHA-256 of the passphrase. Prefixes every transaction signature payload.
#[must_use]
pub fn network_id(passphrase: &str) -> [u8; 32] {
    Sha256::digest(passphrase.as_bytes()).into()
}

/// Signs with a local Ed25519 key, the way a node-side wallet signer does.
pub struct KeypairSigner {
    identity: Arc<FundingIdentity>,
    network_passphrase: String,
    network_id: [u8; 32],
}

impl KeypairSigner {
    #[must_use]
    pub fn new(identity: Arc<FundingIdentity>, network_passphrase: &str) -> Self {
        Self {
            identity,
            network_passphrase: network_passphrase.to_string(),
            network_id: network_id(network_passphrase),
        }
    }

    /// Hash that Stellar signs for a transaction: `sha256(network_id || tagged_tx)`.
    #[must_use]
    pub fn transaction_hash(&self, tagged_transaction: &[u8]) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(self.network_id);
        hasher.update(tagged_transaction);
        hasher.finalize().into()
    }
}

#[async_trait]
impl TransactionSigner for KeypairSigner {
    fn public_key(&self) -> String {
        self.identity.public_key().to_string()
    }

    fn network_passphrase(&self) -> &str {
        &self.network_passphrase
    }

    async fn sign_transaction(
        &self,
        tagged_transaction: &[u8],
    ) -> Result<DecoratedSignature, AppError> {
        if tagged_transaction.is_empty() {
            return Err(SignerError::InvalidPayload("empty transaction".to_string()).into());
        }
        let hash = self.transaction_hash(tagged_transaction);
        Ok(DecoratedSignature {
            hint: self.identity.signature_hint(),
            signature: self.identity.sign(&hash),
        })
    }

    async fn sign_auth_entry(&self, preimage: &[u8]) -> Result<[u8; 64], AppError> {
        if preimage.is_empty() {
            return Err(SignerError::InvalidPayload("empty auth entry preimage".to_string()).into());
        }
        let hash: [u8; 32] = Sha256::digest(preimage).into();
        Ok(self.identity.sign(&hash))
    }
}
