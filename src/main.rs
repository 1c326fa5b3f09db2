use std::env;
use std::sync::Arc;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use tracing::info;

use passkey_wallet_bootstrap::app::{self, FundingIdentityProvider, WalletConfig};
use passkey_wallet_bootstrap::domain::SystemClock;
use passkey_wallet_bootstrap::infra::observability::{LogFormat, init_tracing};
use passkey_wallet_bootstrap::infra::{RpcClientConfig, SorobanRpcClient};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let log_format = LogFormat::from_env_value(env::var("LOG_FORMAT").ok().as_deref());
    init_tracing(log_format).context("failed to install tracing subscriber")?;

    let config = WalletConfig::from_env().context("invalid wallet configuration")?;

    let rpc = Arc::new(SorobanRpcClient::new(
        &config.rpc_url,
        RpcClientConfig {
            timeout: config.rpc_timeout,
        },
    )?);
    let provider = FundingIdentityProvider::new(rpc.clone(), Arc::new(SystemClock));

    let ctx = app::initialize(&config, rpc, &provider).await?;
    let ctx = app::install(ctx)?;

    info!(
        fund_public_key = %ctx.fund_public_key,
        launchtube = %ctx.server.launchtube_url(),
        native = %ctx.native.contract_id(),
        "Wallet bootstrap complete"
    );

    // Funding is best-effort; its outcome is logged by the task and otherwise ignored.
    if let Some(funding) = provider.take_funding_task().await {
        let _ = funding.await;
    }

    Ok(())
}
