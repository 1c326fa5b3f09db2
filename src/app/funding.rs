//! Hour-bucketed funding identity.
//!
//! Every process started within the same UTC hour derives the same Ed25519
//! key from `sha256(epoch_millis(hour_start))`, so development and test
//! deployments share one funding account without distributing a secret.
//! On first derivation the account is funded opportunistically: a detached
//! task checks whether it exists and, if the lookup fails for any reason,
//! asks the faucet once. Nothing about that attempt reaches the caller.

use chrono::{DateTime, Utc};
use ed25519_dalek::{Signer, SigningKey, VerifyingKey};
use sha2::{Digest, Sha256};
use std::fmt;
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument};

use crate::domain::strkey;
use crate::domain::{Clock, FundingOutcome, NetworkClient, TimeBucket};

/// Ed25519 keypair derived from a [`TimeBucket`].
pub struct FundingIdentity {
    bucket: TimeBucket,
    signing_key: SigningKey,
    public_key: String,
}

impl FundingIdentity {
    /// Derive the identity for the hour containing `now`. Infallible.
    #[must_use]
    pub fn derive(now: DateTime<Utc>) -> Self {
        Self::for_bucket(TimeBucket::containing(now))
    }

    #[must_use]
    pub fn for_bucket(bucket: TimeBucket) -> Self {
        let seed: [u8; 32] = Sha256::digest(bucket.digest_input().as_bytes()).into();
        let signing_key = SigningKey::from_bytes(&seed);
        let public_key = strkey::encode_public_key(signing_key.verifying_key().as_bytes());
        Self {
            bucket,
            signing_key,
            public_key,
        }
    }

    #[must_use]
    pub fn bucket(&self) -> TimeBucket {
        self.bucket
    }

    /// `G...` account id.
    #[must_use]
    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    #[must_use]
    pub fn verifying_key(&self) -> VerifyingKey {
        self.signing_key.verifying_key()
    }

    /// The 32-byte seed the key was built from.
    #[must_use]
    pub fn seed(&self) -> [u8; 32] {
        self.signing_key.to_bytes()
    }

    /// Seed in Stellar secret strkey form (`S...`).
    #[must_use]
    pub fn secret_strkey(&self) -> String {
        stellar_strkey::ed25519::PrivateKey(self.seed()).to_string()
    }

    /// Last four bytes of the public key.
    #[must_use]
    pub fn signature_hint(&self) -> [u8; 4] {
        let bytes = self.signing_key.verifying_key().to_bytes();
        [bytes[28], bytes[29], bytes[30], bytes[31]]
    }

    #[must_use]
    pub fn sign(&self, message: &[u8]) -> [u8; 64] {
        self.signing_key.sign(message).to_bytes()
    }
}

impl fmt::Debug for FundingIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FundingIdentity")
            .field("bucket", &self.bucket.start())
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}

/// Check the account and fall back to a single airdrop request.
///
/// The outcome is informational only; it is never turned into an error.
#[instrument(skip(network))]
pub async fn ensure_funded(network: &dyn NetworkClient, public_key: &str) -> FundingOutcome {
    match network.get_account(public_key).await {
        Ok(account) => {
            debug!(sequence = account.sequence, "Funding account already exists");
            FundingOutcome::AlreadyFunded
        }
        Err(lookup_error) => {
            debug!(error = %lookup_error, "Funding account lookup failed, requesting airdrop");
            match network.request_airdrop(public_key).await {
                Ok(()) => FundingOutcome::Funded,
                Err(e) => FundingOutcome::Failed(e.to_string()),
            }
        }
    }
}

/// Run [`ensure_funded`] as a detached task. Awaiting the handle is optional.
pub fn spawn_funding(
    network: Arc<dyn NetworkClient>,
    public_key: String,
) -> JoinHandle<FundingOutcome> {
    tokio::spawn(async move {
        let outcome = ensure_funded(network.as_ref(), &public_key).await;
        debug!(account = %public_key, outcome = ?outcome, "Funding attempt finished");
        outcome
    })
}

/// Derives the funding identity once per process and kicks off funding.
///
/// Later calls return the memoized identity even after the wall clock has
/// moved into another hour; a process never switches identities.
pub struct FundingIdentityProvider {
    network: Arc<dyn NetworkClient>,
    clock: Arc<dyn Clock>,
    identity: OnceCell<Arc<FundingIdentity>>,
    funding_task: Mutex<Option<JoinHandle<FundingOutcome>>>,
}

impl FundingIdentityProvider {
    #[must_use]
    pub fn new(network: Arc<dyn NetworkClient>, clock: Arc<dyn Clock>) -> Self {
        Self {
            network,
            clock,
            identity: OnceCell::new(),
            funding_task: Mutex::new(None),
        }
    }

    /// The process funding identity.
    pub async fn identity(&self) -> Arc<FundingIdentity> {
        let identity = self
            .identity
            .get_or_init(|| async {
                let identity = Arc::new(FundingIdentity::derive(self.clock.now()));
                info!(
                    public_key = %identity.public_key(),
                    valid_until = %identity.bucket().expires_at(),
                    "Derived funding identity"
                );
                let handle = spawn_funding(
                    Arc::clone(&self.network),
                    identity.public_key().to_string(),
                );
                *self.funding_task.lock().await = Some(handle);
                identity
            })
            .await;
        Arc::clone(identity)
    }

    /// Whether the identity has been derived yet.
    #[must_use]
    pub fn is_derived(&self) -> bool {
        self.identity.initialized()
    }

    /// Take the handle of the background funding attempt, if one was started
    /// and nobody took it yet. Dropping the handle leaves the task running.
    pub async fn take_funding_task(&self) -> Option<JoinHandle<FundingOutcome>> {
        self.funding_task.lock().await.take()
    }
}
