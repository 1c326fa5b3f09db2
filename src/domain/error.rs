//! Application error types with proper error chaining.

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum NetworkError {
    #[error("Connection failed: {0}")]
    Connection(String),
    #[error("RPC call failed: {0}")]
    RpcError(String),
    #[error("Account not found: {0}")]
    AccountNotFound(String),
    #[error("Invalid account id: {0}")]
    InvalidAccountId(String),
    #[error("Friendbot unavailable: {0}")]
    FriendbotUnavailable(String),
    #[error("Malformed ledger entry: {0}")]
    MalformedEntry(String),
    #[error("Timeout: {0}")]
    Timeout(String),
}

#[derive(Error, Debug, Clone)]
pub enum SignerError {
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
    #[error("Validation failed: {0}")]
    Validation(String),
}

impl From<validator::ValidationErrors> for ConfigError {
    fn from(err: validator::ValidationErrors) -> Self {
        ConfigError::Validation(err.to_string())
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Network(#[from] NetworkError),
    #[error(transparent)]
    Signer(#[from] SignerError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Wallet context not initialized")]
    NotInitialized,
    #[error("Wallet context already initialized")]
    AlreadyInitialized,
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Config(ConfigError::from(err))
    }
}

impl From<reqwest::Error> for NetworkError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            NetworkError::Timeout(err.to_string())
        } else if err.is_connect() {
            NetworkError::Connection(err.to_string())
        } else {
            NetworkError::RpcError(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_conversion() {
        use validator::Validate;

        #[derive(Validate)]
        struct TestStruct {
            #[validate(url)]
            val: String,
        }

        let s = TestStruct {
            val: "not a url".to_string(),
        };
        let err = s.validate().unwrap_err();
        let app_err = AppError::from(err);

        assert!(matches!(
            app_err,
            AppError::Config(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_network_error_display() {
        let err = NetworkError::Connection("refused".to_string());
        assert_eq!(err.to_string(), "Connection failed: refused");

        let err = NetworkError::RpcError("-32601: method not found".to_string());
        assert_eq!(err.to_string(), "RPC call failed: -32601: method not found");

        let err = NetworkError::AccountNotFound("GABC".to_string());
        assert_eq!(err.to_string(), "Account not found: GABC");

        let err = NetworkError::InvalidAccountId("XYZ".to_string());
        assert_eq!(err.to_string(), "Invalid account id: XYZ");

        let err = NetworkError::FriendbotUnavailable("no friendbot".to_string());
        assert_eq!(err.to_string(), "Friendbot unavailable: no friendbot");

        let err = NetworkError::MalformedEntry("short".to_string());
        assert_eq!(err.to_string(), "Malformed ledger entry: short");

        let err = NetworkError::Timeout("30s".to_string());
        assert_eq!(err.to_string(), "Timeout: 30s");
    }

    #[test]
    fn test_signer_error_display() {
        let err = SignerError::InvalidPayload("empty".to_string());
        assert_eq!(err.to_string(), "Invalid payload: empty");
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::MissingEnvVar("RPC_URL".to_string());
        assert_eq!(err.to_string(), "Missing environment variable: RPC_URL");

        let err = ConfigError::InvalidValue {
            key: "WALLET_WASM_HASH".to_string(),
            message: "expected 32 bytes".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid value for 'WALLET_WASM_HASH': expected 32 bytes"
        );
    }

    #[test]
    fn test_app_error_display() {
        assert_eq!(
            AppError::NotInitialized.to_string(),
            "Wallet context not initialized"
        );
        assert_eq!(
            AppError::AlreadyInitialized.to_string(),
            "Wallet context already initialized"
        );
    }

    #[test]
    fn test_app_error_is_transparent_for_sources() {
        let app_err: AppError = NetworkError::Timeout("10s".to_string()).into();
        assert!(matches!(
            app_err,
            AppError::Network(NetworkError::Timeout(_))
        ));
        assert_eq!(app_err.to_string(), "Timeout: 10s");

        let app_err: AppError = ConfigError::MissingEnvVar("KEY".to_string()).into();
        assert!(matches!(
            app_err,
            AppError::Config(ConfigError::MissingEnvVar(_))
        ));

        let app_err: AppError = SignerError::InvalidPayload("empty".to_string()).into();
        assert!(matches!(
            app_err,
            AppError::Signer(SignerError::InvalidPayload(_))
        ));
    }
}
