//! Environment-sourced configuration.

use secrecy::SecretString;
use std::time::Duration;
use validator::Validate;

use crate::domain::ConfigError;

const DEFAULT_RPC_TIMEOUT_SECS: u64 = 30;

/// Everything needed to build the wallet client bundle.
///
/// Tokens are held as secrets and never appear in `Debug` output.
#[derive(Debug, Validate)]
pub struct WalletConfig {
    #[validate(url)]
    pub rpc_url: String,
    #[validate(length(min = 1))]
    pub network_passphrase: String,
    #[validate(length(equal = 64))]
    pub wallet_wasm_hash: String,
    #[validate(url)]
    pub launchtube_url: String,
    pub launchtube_jwt: SecretString,
    #[validate(length(min = 1))]
    pub mercury_project_name: String,
    #[validate(url)]
    pub mercury_url: String,
    pub mercury_jwt: SecretString,
    #[validate(length(min = 1))]
    pub native_contract_id: String,
    pub rpc_timeout: Duration,
}

impl WalletConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`. Blank values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
        };

        let rpc_timeout = match lookup("RPC_TIMEOUT_SECS").filter(|v| !v.trim().is_empty()) {
            Some(raw) => parse_timeout(raw.trim())?,
            None => Duration::from_secs(DEFAULT_RPC_TIMEOUT_SECS),
        };

        let config = Self {
            rpc_url: require("RPC_URL")?,
            network_passphrase: require("NETWORK_PASSPHRASE")?,
            wallet_wasm_hash: require("WALLET_WASM_HASH")?,
            launchtube_url: require("LAUNCHTUBE_URL")?,
            launchtube_jwt: SecretString::from(require("LAUNCHTUBE_JWT")?),
            mercury_project_name: require("MERCURY_PROJECT_NAME")?,
            mercury_url: require("MERCURY_URL")?,
            mercury_jwt: SecretString::from(require("MERCURY_JWT")?),
            native_contract_id: require("NATIVE_CONTRACT_ID")?,
            rpc_timeout,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Whole seconds, at least one.
fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    let invalid = |message: String| ConfigError::InvalidValue {
        key: "RPC_TIMEOUT_SECS".to_string(),
        message,
    };
    match raw.parse::<u64>() {
        Ok(0) => Err(invalid("timeout must be at least one second".to_string())),
        Ok(secs) => Ok(Duration::from_secs(secs)),
        Err(e) => Err(invalid(e.to_string())),
    }
}

#[cfg(test)]
pub(crate) fn test_env() -> std::collections::HashMap<&'static str, String> {
    [
        ("RPC_URL", "https://soroban-testnet.stellar.org"),
        ("NETWORK_PASSPHRASE", "Test SDF Network ; September 2015"),
        (
            "WALLET_WASM_HASH",
            "ecd990f0b45ca6817149b6175f79b32efb442f35731985a084131e8265c4cd90",
        ),
        ("LAUNCHTUBE_URL", "https://testnet.launchtube.xyz"),
        ("LAUNCHTUBE_JWT", "launchtube-token"),
        ("MERCURY_PROJECT_NAME", "smart-wallets"),
        ("MERCURY_URL", "https://api.mercurydata.app"),
        ("MERCURY_JWT", "mercury-token"),
        (
            "NATIVE_CONTRACT_ID",
            "CAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAABSC4",
        ),
    ]
    .into_iter()
    .map(|(k, v)| (k, v.to_string()))
    .collect()
}
