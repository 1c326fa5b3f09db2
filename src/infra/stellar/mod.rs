//! Stellar network client implementations.

pub mod clients;
pub mod rpc;
pub mod signer;

pub use clients::{MercuryConfig, PasskeyServerClient, TokenClient, TokenContract, WalletClient};
pub use rpc::{NetworkInfo, RpcClientConfig, SorobanRpcClient};
pub use signer::{KeypairSigner, network_id};
