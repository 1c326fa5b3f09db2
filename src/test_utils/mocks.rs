//! Mock implementations for testing.
//!
//! These mocks provide in-memory implementations of domain traits
//! that can be configured to simulate various scenarios including
//! success, failure, and edge cases.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::domain::{Account, AppError, Clock, NetworkClient, NetworkError};

/// Configuration for mock behavior.
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    /// If true, operations will fail.
    pub should_fail: bool,
    /// Custom error message for failures.
    pub error_message: Option<String>,
    /// Simulated latency in milliseconds.
    pub latency_ms: Option<u64>,
}

impl MockConfig {
    /// Creates a config that always succeeds.
    #[must_use]
    pub fn success() -> Self {
        Self::default()
    }

    /// Creates a config that always fails.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            should_fail: true,
            error_message: Some(message.into()),
            latency_ms: None,
        }
    }

    /// Adds simulated latency.
    #[must_use]
    pub fn with_latency(mut self, ms: u64) -> Self {
        self.latency_ms = Some(ms);
        self
    }
}

/// Mock network client for testing.
///
/// Accounts live in an in-memory map. By default every lookup misses and
/// every airdrop succeeds, creating the account with sequence 0.
///
/// # Example
///
/// ```
/// use passkey_wallet_bootstrap::test_utils::MockNetworkClient;
///
/// // Lookups succeed, no airdrop will be needed
/// let funded = MockNetworkClient::new().with_existing_account();
///
/// // Lookups miss and the faucet is down
/// let broken = MockNetworkClient::new().with_failing_airdrop("faucet down");
/// ```
pub struct MockNetworkClient {
    accounts: Arc<Mutex<HashMap<String, Account>>>,
    airdrop_config: MockConfig,
    lookup_config: MockConfig,
    every_account_exists: AtomicBool,
    lookups: AtomicU64,
    airdrops: AtomicU64,
    funded: Arc<Mutex<Vec<String>>>,
}

impl MockNetworkClient {
    /// Creates a new mock with default (success) configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            accounts: Arc::new(Mutex::new(HashMap::new())),
            airdrop_config: MockConfig::success(),
            lookup_config: MockConfig::success(),
            every_account_exists: AtomicBool::new(false),
            lookups: AtomicU64::new(0),
            airdrops: AtomicU64::new(0),
            funded: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Every lookup finds an account.
    #[must_use]
    pub fn with_existing_account(self) -> Self {
        self.every_account_exists.store(true, Ordering::Relaxed);
        self
    }

    /// Airdrop requests fail with the given message.
    #[must_use]
    pub fn with_failing_airdrop(mut self, message: impl Into<String>) -> Self {
        self.airdrop_config = MockConfig::failure(message);
        self
    }

    /// Lookups fail with a connection error instead of a miss.
    #[must_use]
    pub fn with_unreachable_rpc(mut self, message: impl Into<String>) -> Self {
        self.lookup_config = MockConfig::failure(message);
        self
    }

    /// Delays airdrop responses.
    #[must_use]
    pub fn with_airdrop_latency(mut self, ms: u64) -> Self {
        self.airdrop_config = self.airdrop_config.with_latency(ms);
        self
    }

    /// Number of `get_account` calls.
    pub fn account_lookups(&self) -> u64 {
        self.lookups.load(Ordering::Relaxed)
    }

    /// Number of `request_airdrop` calls.
    pub fn airdrop_requests(&self) -> u64 {
        self.airdrops.load(Ordering::Relaxed)
    }

    /// Accounts successfully funded, in request order.
    pub fn funded_accounts(&self) -> Vec<String> {
        self.funded.lock().unwrap().clone()
    }

    async fn simulate_latency(config: &MockConfig) {
        if let Some(ms) = config.latency_ms {
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }
    }

    fn failure_message(config: &MockConfig, default: &str) -> Option<String> {
        config.should_fail.then(|| {
            config
                .error_message
                .clone()
                .unwrap_or_else(|| default.to_string())
        })
    }
}

impl Default for MockNetworkClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NetworkClient for MockNetworkClient {
    async fn get_account(&self, public_key: &str) -> Result<Account, AppError> {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        Self::simulate_latency(&self.lookup_config).await;

        if let Some(msg) = Self::failure_message(&self.lookup_config, "Mock RPC error") {
            return Err(AppError::Network(NetworkError::Connection(msg)));
        }
        if self.every_account_exists.load(Ordering::Relaxed) {
            return Ok(Account::new(public_key.to_string(), 1));
        }

        let accounts = self.accounts.lock().unwrap();
        accounts
            .get(public_key)
            .cloned()
            .ok_or_else(|| AppError::Network(NetworkError::AccountNotFound(public_key.to_string())))
    }

    async fn request_airdrop(&self, public_key: &str) -> Result<(), AppError> {
        self.airdrops.fetch_add(1, Ordering::Relaxed);
        Self::simulate_latency(&self.airdrop_config).await;

        if let Some(msg) = Self::failure_message(&self.airdrop_config, "Mock friendbot error") {
            return Err(AppError::Network(NetworkError::FriendbotUnavailable(msg)));
        }

        self.accounts
            .lock()
            .unwrap()
            .insert(public_key.to_string(), Account::new(public_key.to_string(), 0));
        self.funded.lock().unwrap().push(public_key.to_string());
        Ok(())
    }
}

/// Clock pinned to a settable instant.
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    #[must_use]
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap() = now;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}
