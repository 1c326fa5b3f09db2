//! Client handles for the passkey wallet stack.
//!
//! Each handle carries the configuration its service needs and exposes an
//! explicit capability surface. Wallet contract semantics and passkey
//! verification live in the services behind these handles.

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument};

use crate::domain::strkey;
use crate::domain::{AppError, ConfigError, NetworkClient, NetworkError};

use super::signer::network_id;

/// Smart-wallet client: deploys and drives passkey wallets built from one wasm hash.
pub struct WalletClient {
    network: Arc<dyn NetworkClient>,
    rpc_url: String,
    network_passphrase: String,
    wallet_wasm_hash: [u8; 32],
}

impl WalletClient {
    pub fn new(
        network: Arc<dyn NetworkClient>,
        rpc_url: &str,
        network_passphrase: &str,
        wallet_wasm_hash: &str,
    ) -> Result<Self, ConfigError> {
        let wallet_wasm_hash = parse_wasm_hash(wallet_wasm_hash)?;
        Ok(Self {
            network,
            rpc_url: rpc_url.to_string(),
            network_passphrase: network_passphrase.to_string(),
            wallet_wasm_hash,
        })
    }

    #[must_use]
    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    #[must_use]
    pub fn network_passphrase(&self) -> &str {
        &self.network_passphrase
    }

    #[must_use]
    pub fn network_id(&self) -> [u8; 32] {
        network_id(&self.network_passphrase)
    }

    #[must_use]
    pub fn wallet_wasm_hash(&self) -> [u8; 32] {
        self.wallet_wasm_hash
    }

    /// Network the wallet operates against.
    #[must_use]
    pub fn network(&self) -> Arc<dyn NetworkClient> {
        Arc::clone(&self.network)
    }
}

impl fmt::Debug for WalletClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletClient")
            .field("rpc_url", &self.rpc_url)
            .field("network_passphrase", &self.network_passphrase)
            .field("wallet_wasm_hash", &hex::encode(self.wallet_wasm_hash))
            .finish_non_exhaustive()
    }
}

fn parse_wasm_hash(value: &str) -> Result<[u8; 32], ConfigError> {
    let invalid = |message: String| ConfigError::InvalidValue {
        key: "WALLET_WASM_HASH".to_string(),
        message,
    };
    let bytes = hex::decode(value).map_err(|e| invalid(e.to_string()))?;
    bytes
        .try_into()
        .map_err(|v: Vec<u8>| invalid(format!("expected 32 bytes, got {}", v.len())))
}

/// Indexer credentials used to look up wallet signers.
pub struct MercuryConfig {
    pub project_name: String,
    pub url: String,
    pub jwt: SecretString,
}

/// Signing-server client: relays signed transactions through Launchtube and
/// resolves wallet signers through Mercury.
pub struct PasskeyServerClient {
    http_client: Client,
    launchtube_url: String,
    launchtube_jwt: SecretString,
    mercury: MercuryConfig,
}

impl PasskeyServerClient {
    pub fn new(
        launchtube_url: &str,
        launchtube_jwt: SecretString,
        mercury: MercuryConfig,
        timeout: Duration,
    ) -> Result<Self, AppError> {
        if launchtube_jwt.expose_secret().is_empty() {
            return Err(ConfigError::MissingEnvVar("LAUNCHTUBE_JWT".to_string()).into());
        }
        if mercury.jwt.expose_secret().is_empty() {
            return Err(ConfigError::MissingEnvVar("MERCURY_JWT".to_string()).into());
        }
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Network(NetworkError::Connection(e.to_string())))?;
        info!(
            launchtube_url = %launchtube_url,
            mercury_project = %mercury.project_name,
            "Created passkey server client"
        );
        Ok(Self {
            http_client,
            launchtube_url: launchtube_url.to_string(),
            launchtube_jwt,
            mercury,
        })
    }

    #[must_use]
    pub fn launchtube_url(&self) -> &str {
        &self.launchtube_url
    }

    #[must_use]
    pub fn mercury_project_name(&self) -> &str {
        &self.mercury.project_name
    }

    #[must_use]
    pub fn mercury_url(&self) -> &str {
        &self.mercury.url
    }

    /// Submit a signed transaction envelope (base64 XDR) to Launchtube.
    #[instrument(skip(self, xdr), fields(xdr_len = xdr.len()))]
    pub async fn send_transaction(&self, xdr: &str) -> Result<serde_json::Value, AppError> {
        let response = self
            .http_client
            .post(&self.launchtube_url)
            .bearer_auth(self.launchtube_jwt.expose_secret())
            .form(&[("xdr", xdr)])
            .send()
            .await
            .map_err(NetworkError::from)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NetworkError::RpcError(format!("launchtube {status}: {body}")).into());
        }

        response
            .json()
            .await
            .map_err(|e| NetworkError::RpcError(e.to_string()).into())
    }
}

impl fmt::Debug for PasskeyServerClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasskeyServerClient")
            .field("launchtube_url", &self.launchtube_url)
            .field("mercury_project", &self.mercury.project_name)
            .field("mercury_url", &self.mercury.url)
            .finish_non_exhaustive()
    }
}

/// Stellar Asset Contract client factory.
pub struct TokenClient {
    network: Arc<dyn NetworkClient>,
    rpc_url: String,
    network_passphrase: String,
}

impl TokenClient {
    #[must_use]
    pub fn new(network: Arc<dyn NetworkClient>, rpc_url: &str, network_passphrase: &str) -> Self {
        Self {
            network,
            rpc_url: rpc_url.to_string(),
            network_passphrase: network_passphrase.to_string(),
        }
    }

    #[must_use]
    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    /// Handle for one asset contract, identified by its `C...` id.
    pub fn contract(&self, contract_id: &str) -> Result<TokenContract, ConfigError> {
        let contract_bytes = strkey::decode_contract_id("NATIVE_CONTRACT_ID", contract_id)?;
        Ok(TokenContract {
            network: Arc::clone(&self.network),
            contract_id: contract_id.to_string(),
            contract_bytes,
            network_passphrase: self.network_passphrase.clone(),
        })
    }
}

impl fmt::Debug for TokenClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenClient")
            .field("rpc_url", &self.rpc_url)
            .field("network_passphrase", &self.network_passphrase)
            .finish_non_exhaustive()
    }
}

/// A single Stellar Asset Contract.
pub struct TokenContract {
    network: Arc<dyn NetworkClient>,
    contract_id: String,
    contract_bytes: [u8; 32],
    network_passphrase: String,
}

impl TokenContract {
    #[must_use]
    pub fn contract_id(&self) -> &str {
        &self.contract_id
    }

    #[must_use]
    pub fn contract_bytes(&self) -> [u8; 32] {
        self.contract_bytes
    }

    #[must_use]
    pub fn network_passphrase(&self) -> &str {
        &self.network_passphrase
    }

    #[must_use]
    pub fn network(&self) -> Arc<dyn NetworkClient> {
        Arc::clone(&self.network)
    }
}

impl fmt::Debug for TokenContract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenContract")
            .field("contract_id", &self.contract_id)
            .finish_non_exhaustive()
    }
}
