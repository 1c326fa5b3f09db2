//! Passkey Wallet Bootstrap
//!
//! Builds the client handles a passkey smart-wallet application needs on
//! Stellar, around a funding account whose key is derived from the current
//! hour so every process started in that hour shares it.
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               Application Layer              │
//! │  Config, funding identity, client bootstrap  │
//! ├─────────────────────────────────────────────┤
//! │                 Domain Layer                 │
//! │      Traits, types, errors, key encoding     │
//! ├─────────────────────────────────────────────┤
//! │             Infrastructure Layer             │
//! │  Soroban RPC, signer, wallet/relay/token     │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Key Features
//!
//! - **Deterministic funding key**: `sha256(epoch_millis(hour_start))` seeds an Ed25519 key
//! - **Best-effort funding**: a detached task checks the account and asks friendbot once
//! - **Trait-based abstraction**: network, signer, and clock sit behind traits
//! - **Error handling**: layered error types, only configuration errors are fatal
//! - **Logging**: Structured logging with `tracing`
//! - **Security**: Tokens held with the `secrecy` crate
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use passkey_wallet_bootstrap::app::{FundingIdentityProvider, WalletConfig, initialize};
//! use passkey_wallet_bootstrap::domain::SystemClock;
//! use passkey_wallet_bootstrap::infra::SorobanRpcClient;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = WalletConfig::from_env()?;
//!     let rpc = Arc::new(SorobanRpcClient::with_defaults(&config.rpc_url)?);
//!     let provider = FundingIdentityProvider::new(rpc.clone(), Arc::new(SystemClock));
//!
//!     let ctx = initialize(&config, rpc, &provider).await?;
//!     println!("funding account: {}", ctx.fund_public_key);
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod domain;
pub mod infra;

// Test utilities are available in tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
