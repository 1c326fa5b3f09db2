//! Stellar strkey helpers (`G...` accounts, `C...` contracts).

use stellar_strkey::Contract;
use stellar_strkey::ed25519::PublicKey;

use super::error::ConfigError;

/// Encode a raw Ed25519 public key as a `G...` account id.
#[must_use]
pub fn encode_public_key(bytes: &[u8; 32]) -> String {
    PublicKey(*bytes).to_string()
}

/// Decode a `G...` account id into its raw key bytes.
pub fn decode_public_key(value: &str) -> Option<[u8; 32]> {
    PublicKey::from_string(value).ok().map(|key| key.0)
}

/// Account id of the all-zero public key, used as a simulation placeholder.
#[must_use]
pub fn mock_public_key() -> String {
    encode_public_key(&[0u8; 32])
}

/// Decode a `C...` contract id, reporting failures against the config key it came from.
pub fn decode_contract_id(key: &str, value: &str) -> Result<[u8; 32], ConfigError> {
    Contract::from_string(value)
        .map(|contract| contract.0)
        .map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("'{value}' is not a contract strkey"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_key_encoding() {
        assert_eq!(
            mock_public_key(),
            "GAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAWHF"
        );
    }

    #[test]
    fn test_public_key_round_trip() {
        let bytes = [42u8; 32];
        let encoded = encode_public_key(&bytes);
        assert!(encoded.starts_with('G'));
        assert_eq!(encoded.len(), 56);
        assert_eq!(decode_public_key(&encoded), Some(bytes));
    }

    #[test]
    fn test_generated_keys_round_trip() {
        use ed25519_dalek::SigningKey;
        use rand::rngs::OsRng;

        for _ in 0..16 {
            let key = SigningKey::generate(&mut OsRng);
            let bytes = key.verifying_key().to_bytes();
            assert_eq!(decode_public_key(&encode_public_key(&bytes)), Some(bytes));
        }
    }

    #[test]
    fn test_decode_public_key_rejects_garbage() {
        assert_eq!(decode_public_key("not-a-key"), None);
        // Contract ids are not account ids.
        assert_eq!(
            decode_public_key("CAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAABSC4"),
            None
        );
    }

    #[test]
    fn test_decode_contract_id() {
        let bytes = decode_contract_id(
            "NATIVE_CONTRACT_ID",
            "CAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAABSC4",
        )
        .unwrap();
        assert_eq!(bytes, [0u8; 32]);

        let err = decode_contract_id("NATIVE_CONTRACT_ID", &mock_public_key()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { ref key, .. } if key == "NATIVE_CONTRACT_ID"
        ));
    }
}
