//! Infrastructure layer implementations.

pub mod observability;
pub mod stellar;

pub use stellar::{
    KeypairSigner, PasskeyServerClient, RpcClientConfig, SorobanRpcClient, TokenClient,
    TokenContract, WalletClient,
};
