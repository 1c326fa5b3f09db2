//! The process-wide context slot. Kept in its own test binary so no other
//! test can install a context first.

use std::sync::Arc;

use chrono::{TimeZone, Utc};

use passkey_wallet_bootstrap::app::{self, FundingIdentityProvider, WalletConfig};
use passkey_wallet_bootstrap::domain::AppError;
use passkey_wallet_bootstrap::test_utils::{FixedClock, MockNetworkClient};

fn lookup(key: &str) -> Option<String> {
    let value = match key {
        "RPC_URL" => "https://soroban-testnet.stellar.org",
        "NETWORK_PASSPHRASE" => "Test SDF Network ; September 2015",
        "WALLET_WASM_HASH" => "ecd990f0b45ca6817149b6175f79b32efb442f35731985a084131e8265c4cd90",
        "LAUNCHTUBE_URL" => "https://testnet.launchtube.xyz",
        "LAUNCHTUBE_JWT" => "launchtube-token",
        "MERCURY_PROJECT_NAME" => "smart-wallets",
        "MERCURY_URL" => "https://api.mercurydata.app",
        "MERCURY_JWT" => "mercury-token",
        "NATIVE_CONTRACT_ID" => "CAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAABSC4",
        _ => return None,
    };
    Some(value.to_string())
}

#[tokio::test]
async fn test_context_lifecycle() {
    assert!(matches!(app::context(), Err(AppError::NotInitialized)));

    let network = Arc::new(MockNetworkClient::new().with_existing_account());
    let clock = Arc::new(FixedClock::new(
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    ));
    let provider = FundingIdentityProvider::new(network.clone(), clock);
    let config = WalletConfig::from_lookup(lookup).unwrap();

    let ctx = app::initialize(&config, network.clone(), &provider)
        .await
        .unwrap();
    let installed = app::install(ctx).unwrap();
    let fetched = app::context().unwrap();
    assert!(std::ptr::eq(installed, fetched));
    assert_eq!(
        fetched.fund_public_key,
        "GBVCDSA5LFMQCV2UY72IXRMQYCRN4IQFIWVUFFLYQYBWP64RYCMYX6CT"
    );

    let again = app::initialize(&config, network, &provider).await.unwrap();
    assert!(matches!(app::install(again), Err(AppError::AlreadyInitialized)));
    assert!(std::ptr::eq(app::context().unwrap(), installed));
}
