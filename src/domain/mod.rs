//! Domain layer containing core types, traits, and error definitions.

pub mod error;
pub mod strkey;
pub mod traits;
pub mod types;

pub use error::{AppError, ConfigError, NetworkError, SignerError};
pub use traits::{Clock, NetworkClient, SystemClock, TransactionSigner};
pub use types::{Account, DecoratedSignature, FundingOutcome, PublicKeyString, TimeBucket};
