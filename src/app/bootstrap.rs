//! Wallet client bootstrap.
//!
//! [`initialize`] waits for the funding identity and builds every client
//! handle from one validated [`WalletConfig`]. The resulting
//! [`WalletContext`] is meant to be passed to whatever needs it; [`install`]
//! and [`context`] offer a process-wide slot for code that cannot take it as
//! a parameter.

use secrecy::{ExposeSecret, SecretString};
use std::sync::{Arc, OnceLock};
use tracing::{info, instrument};
use validator::Validate;

use crate::domain::{AppError, NetworkClient, TransactionSigner};
use crate::infra::stellar::{
    KeypairSigner, MercuryConfig, PasskeyServerClient, TokenClient, TokenContract, WalletClient,
};

use super::config::WalletConfig;
use super::funding::FundingIdentityProvider;

static CONTEXT: OnceLock<WalletContext> = OnceLock::new();

/// Client handles shared by the rest of the application.
pub struct WalletContext {
    /// `G...` id of the funding account.
    pub fund_public_key: String,
    /// Signs on behalf of the funding account.
    pub fund_signer: Arc<dyn TransactionSigner>,
    /// Passkey smart-wallet client.
    pub wallet: WalletClient,
    /// Relay and indexer client.
    pub server: PasskeyServerClient,
    /// Asset contract client factory.
    pub sac: TokenClient,
    /// Native asset contract.
    pub native: TokenContract,
}

/// Build the client bundle.
///
/// Configuration is validated before the identity is awaited, so a bad
/// environment fails without deriving or funding anything.
///
/// # Errors
///
/// Returns an `AppError::Config` if any value is missing or malformed, and
/// an `AppError::Network` if an HTTP client cannot be constructed.
#[instrument(skip_all)]
pub async fn initialize(
    config: &WalletConfig,
    network: Arc<dyn NetworkClient>,
    provider: &FundingIdentityProvider,
) -> Result<WalletContext, AppError> {
    config.validate()?;

    let wallet = WalletClient::new(
        Arc::clone(&network),
        &config.rpc_url,
        &config.network_passphrase,
        &config.wallet_wasm_hash,
    )?;
    let sac = TokenClient::new(
        Arc::clone(&network),
        &config.rpc_url,
        &config.network_passphrase,
    );
    let native = sac.contract(&config.native_contract_id)?;
    let server = PasskeyServerClient::new(
        &config.launchtube_url,
        copy_secret(&config.launchtube_jwt),
        MercuryConfig {
            project_name: config.mercury_project_name.clone(),
            url: config.mercury_url.clone(),
            jwt: copy_secret(&config.mercury_jwt),
        },
        config.rpc_timeout,
    )?;

    let identity = provider.identity().await;
    let fund_signer: Arc<dyn TransactionSigner> = Arc::new(KeypairSigner::new(
        Arc::clone(&identity),
        &config.network_passphrase,
    ));

    info!(
        fund_public_key = %identity.public_key(),
        native_contract = %native.contract_id(),
        "Wallet clients initialized"
    );

    Ok(WalletContext {
        fund_public_key: identity.public_key().to_string(),
        fund_signer,
        wallet,
        server,
        sac,
        native,
    })
}

fn copy_secret(secret: &SecretString) -> SecretString {
    SecretString::from(secret.expose_secret().to_string())
}

/// Store `context` in the process-wide slot.
///
/// # Errors
///
/// Returns `AppError::AlreadyInitialized` if a context was installed before.
pub fn install(context: WalletContext) -> Result<&'static WalletContext, AppError> {
    CONTEXT
        .set(context)
        .map_err(|_| AppError::AlreadyInitialized)?;
    context_ref()
}

/// The installed context.
///
/// # Errors
///
/// Returns `AppError::NotInitialized` until [`install`] succeeds.
pub fn context() -> Result<&'static WalletContext, AppError> {
    context_ref()
}

fn context_ref() -> Result<&'static WalletContext, AppError> {
    CONTEXT.get().ok_or(AppError::NotInitialized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::config::test_env;
    use crate::domain::ConfigError;
    use crate::test_utils::{FixedClock, MockNetworkClient};
    use chrono::{TimeZone, Utc};

    fn provider(network: Arc<MockNetworkClient>) -> FundingIdentityProvider {
        let clock = Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 20, 0).unwrap(),
        ));
        FundingIdentityProvider::new(network, clock)
    }

    fn config() -> WalletConfig {
        let env = test_env();
        WalletConfig::from_lookup(|key| env.get(key).cloned()).unwrap()
    }

    #[tokio::test]
    async fn test_initialize_builds_every_handle() {
        let network = Arc::new(MockNetworkClient::new());
        let provider = provider(Arc::clone(&network));

        let ctx = initialize(&config(), network.clone(), &provider)
            .await
            .unwrap();

        assert_eq!(
            ctx.fund_public_key,
            "GBVCDSA5LFMQCV2UY72IXRMQYCRN4IQFIWVUFFLYQYBWP64RYCMYX6CT"
        );
        assert_eq!(ctx.fund_signer.public_key(), ctx.fund_public_key);
        assert_eq!(
            ctx.fund_signer.network_passphrase(),
            "Test SDF Network ; September 2015"
        );
        assert_eq!(ctx.wallet.rpc_url(), "https://soroban-testnet.stellar.org");
        assert_eq!(ctx.server.mercury_project_name(), "smart-wallets");
        assert_eq!(ctx.native.contract_bytes(), [0u8; 32]);
    }

    #[tokio::test]
    async fn test_invalid_config_fails_before_deriving() {
        let network = Arc::new(MockNetworkClient::new());
        let provider = provider(Arc::clone(&network));
        let mut config = config();
        config.native_contract_id = "not-a-contract".to_string();

        let result = initialize(&config, network.clone(), &provider).await;

        assert!(matches!(
            result,
            Err(AppError::Config(ConfigError::InvalidValue { .. }))
        ));
        assert!(!provider.is_derived());
        assert_eq!(network.account_lookups(), 0);
    }

    #[tokio::test]
    async fn test_emptied_field_fails_validation() {
        let network = Arc::new(MockNetworkClient::new());
        let provider = provider(Arc::clone(&network));
        let mut config = config();
        config.network_passphrase = String::new();

        let result = initialize(&config, network, &provider).await;
        assert!(matches!(
            result,
            Err(AppError::Config(ConfigError::Validation(_)))
        ));
    }
}
