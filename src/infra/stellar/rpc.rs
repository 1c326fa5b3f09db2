//! Soroban JSON-RPC client.
//!
//! Covers the slice of the RPC surface the bootstrap needs: account lookup
//! through `getLedgerEntries`, network discovery through `getNetwork`, and
//! friendbot funding on networks that advertise one.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::domain::strkey;
use crate::domain::{Account, AppError, NetworkClient, NetworkError};

/// Friendbot answers this when the account it was asked to create already exists.
const ALREADY_EXISTS_MARKER: &str = "createAccountAlreadyExist";

/// Configuration for the RPC client
#[derive(Debug, Clone)]
pub struct RpcClientConfig {
    pub timeout: Duration,
}

impl Default for RpcClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
        }
    }
}

/// Soroban RPC client
pub struct SorobanRpcClient {
    http_client: Client,
    rpc_url: String,
    next_id: AtomicU64,
}

#[derive(Debug, Serialize)]
struct JsonRpcRequest<T: Serialize> {
    jsonrpc: &'static str,
    id: u64,
    method: String,
    params: T,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse<T> {
    result: Option<T>,
    error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct LedgerEntry {
    xdr: String,
}

#[derive(Debug, Deserialize)]
struct LedgerEntriesResult {
    #[serde(default)]
    entries: Option<Vec<LedgerEntry>>,
}

/// Result of `getNetwork`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInfo {
    pub passphrase: String,
    #[serde(default)]
    pub friendbot_url: Option<String>,
    #[serde(default)]
    pub protocol_version: Option<u32>,
}

impl SorobanRpcClient {
    /// Create a new RPC client with custom configuration
    pub fn new(rpc_url: &str, config: RpcClientConfig) -> Result<Self, AppError> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Network(NetworkError::Connection(e.to_string())))?;
        info!(rpc_url = %rpc_url, "Created Soroban RPC client");
        Ok(Self {
            http_client,
            rpc_url: rpc_url.to_string(),
            next_id: AtomicU64::new(1),
        })
    }

    /// Create a new RPC client with default configuration
    pub fn with_defaults(rpc_url: &str) -> Result<Self, AppError> {
        Self::new(rpc_url, RpcClientConfig::default())
    }

    #[must_use]
    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    /// Execute a single RPC call. Failures are returned as-is, never retried.
    async fn rpc_call<P: Serialize, R: for<'de> Deserialize<'de>>(
        &self,
        method: &str,
        params: P,
    ) -> Result<R, AppError> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method: method.to_string(),
            params,
        };

        let response = self
            .http_client
            .post(&self.rpc_url)
            .json(&request)
            .send()
            .await
            .map_err(NetworkError::from)?;

        let rpc_response: JsonRpcResponse<R> = response
            .json()
            .await
            .map_err(|e| NetworkError::RpcError(e.to_string()))?;

        if let Some(error) = rpc_response.error {
            return Err(NetworkError::RpcError(format!("{}: {}", error.code, error.message)).into());
        }

        rpc_response
            .result
            .ok_or_else(|| NetworkError::RpcError("Empty response".to_string()).into())
    }

    /// Discover network metadata, including the friendbot URL on test networks.
    #[instrument(skip(self))]
    pub async fn get_network(&self) -> Result<NetworkInfo, AppError> {
        self.rpc_call("getNetwork", serde_json::json!({})).await
    }
}

#[async_trait]
impl NetworkClient for SorobanRpcClient {
    #[instrument(skip(self))]
    async fn get_account(&self, public_key: &str) -> Result<Account, AppError> {
        let key = strkey::decode_public_key(public_key)
            .ok_or_else(|| NetworkError::InvalidAccountId(public_key.to_string()))?;
        let ledger_key = BASE64.encode(account_ledger_key(&key));

        let result: LedgerEntriesResult = self
            .rpc_call("getLedgerEntries", serde_json::json!({ "keys": [ledger_key] }))
            .await?;

        let entry = result
            .entries
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or_else(|| NetworkError::AccountNotFound(public_key.to_string()))?;

        let sequence = parse_account_sequence(&entry.xdr)?;
        debug!(account = %public_key, sequence = sequence, "Loaded account");
        Ok(Account::new(public_key.to_string(), sequence))
    }

    #[instrument(skip(self))]
    async fn request_airdrop(&self, public_key: &str) -> Result<(), AppError> {
        let network = self.get_network().await?;
        let friendbot_url = network.friendbot_url.ok_or_else(|| {
            NetworkError::FriendbotUnavailable(format!(
                "network '{}' does not advertise a friendbot",
                network.passphrase
            ))
        })?;

        let response = self
            .http_client
            .get(&friendbot_url)
            .query(&[("addr", public_key)])
            .send()
            .await
            .map_err(NetworkError::from)?;

        let status = response.status();
        if status.is_success() {
            info!(account = %public_key, "Friendbot funded account");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        if body.contains(ALREADY_EXISTS_MARKER) {
            debug!(account = %public_key, "Friendbot reports account already exists");
            return Ok(());
        }

        warn!(account = %public_key, status = %status, "Friendbot request rejected");
        Err(NetworkError::FriendbotUnavailable(format!("{status}: {body}")).into())
    }
}

/// XDR `LedgerKey` for an account: `ACCOUNT` discriminant, then an ed25519 `AccountID`.
fn account_ledger_key(public_key: &[u8; 32]) -> Vec<u8> {
    let mut key = Vec::with_capacity(40);
    key.extend_from_slice(&0i32.to_be_bytes()); // LedgerEntryType::Account
    key.extend_from_slice(&0i32.to_be_bytes()); // PublicKeyType::Ed25519
    key.extend_from_slice(public_key);
    key
}

/// Pull `seqNum` out of a base64 `LedgerEntryData` holding an `AccountEntry`.
///
/// Layout: type (4) | accountID (4 + 32) | balance (8) | seqNum (8) | ...
fn parse_account_sequence(entry_xdr: &str) -> Result<i64, NetworkError> {
    const SEQUENCE_OFFSET: usize = 4 + 36 + 8;

    let bytes = BASE64
        .decode(entry_xdr)
        .map_err(|e| NetworkError::MalformedEntry(e.to_string()))?;

    let entry_type = bytes
        .get(..4)
        .map(|b| i32::from_be_bytes([b[0], b[1], b[2], b[3]]))
        .ok_or_else(|| {
            NetworkError::MalformedEntry("entry shorter than its type tag".to_string())
        })?;
    if entry_type != 0 {
        return Err(NetworkError::MalformedEntry(format!(
            "expected account entry, got type {entry_type}"
        )));
    }

    let sequence: [u8; 8] = bytes
        .get(SEQUENCE_OFFSET..SEQUENCE_OFFSET + 8)
        .and_then(|b| b.try_into().ok())
        .ok_or_else(|| {
            NetworkError::MalformedEntry(format!(
                "account entry is {} bytes, too short for a sequence number",
                bytes.len()
            ))
        })?;
    Ok(i64::from_be_bytes(sequence))
}

#[cfg(test)]
pub(crate) fn encode_account_entry(public_key: &[u8; 32], balance: i64, sequence: i64) -> String {
    let mut entry = Vec::new();
    entry.extend_from_slice(&0i32.to_be_bytes());
    entry.extend_from_slice(&0i32.to_be_bytes());
    entry.extend_from_slice(public_key);
    entry.extend_from_slice(&balance.to_be_bytes());
    entry.extend_from_slice(&sequence.to_be_bytes());
    // numSubEntries, inflationDest (absent), flags, homeDomain, thresholds, signers, ext
    entry.extend_from_slice(&[0u8; 4 + 4 + 4 + 4 + 4 + 4 + 4]);
    BASE64.encode(entry)
}
