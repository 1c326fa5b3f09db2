//! Domain traits defining contracts for external systems.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::error::AppError;
use super::types::{Account, DecoratedSignature};

/// Network operations the funding identity depends on.
#[async_trait]
pub trait NetworkClient: Send + Sync {
    /// Look up an account by its `G...` id. Missing accounts are an error.
    async fn get_account(&self, public_key: &str) -> Result<Account, AppError>;

    /// Ask the network faucet to create and fund the account.
    async fn request_airdrop(&self, public_key: &str) -> Result<(), AppError>;
}

/// Signing capability handed to wallet clients.
#[async_trait]
pub trait TransactionSigner: Send + Sync {
    /// `G...` id of the signing key.
    fn public_key(&self) -> String;

    /// Passphrase of the network signatures are bound to.
    fn network_passphrase(&self) -> &str;

    /// Sign a tagged transaction (envelope type followed by transaction XDR).
    async fn sign_transaction(&self, tagged_transaction: &[u8])
    -> Result<DecoratedSignature, AppError>;

    /// Sign a Soroban authorization entry preimage (XDR).
    async fn sign_auth_entry(&self, preimage: &[u8]) -> Result<[u8; 64], AppError>;
}

/// Source of wall-clock time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
