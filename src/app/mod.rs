//! Application layer: configuration, the funding identity, and the client bootstrap.

pub mod bootstrap;
pub mod config;
pub mod funding;

pub use bootstrap::{WalletContext, context, initialize, install};
pub use config::WalletConfig;
pub use funding::{FundingIdentity, FundingIdentityProvider, ensure_funded, spawn_funding};
