use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::strkey;

/// Stellar public identifier in strkey form (`G...`).
pub type PublicKeyString = String;

const HOUR_MILLIS: i64 = 60 * 60 * 1000;

/// Wall-clock time truncated to the start of its hour.
///
/// The bucket is the only input of the funding identity derivation, so two
/// processes started within the same UTC hour reconstruct the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimeBucket {
    start_millis: i64,
}

impl TimeBucket {
    /// The bucket containing `instant`.
    ///
    /// Truncation happens in UTC, not the host's local zone, so hosts in
    /// half-hour offsets still land on the same bucket.
    #[must_use]
    pub fn containing(instant: DateTime<Utc>) -> Self {
        let millis = instant.timestamp_millis();
        Self {
            start_millis: millis.div_euclid(HOUR_MILLIS) * HOUR_MILLIS,
        }
    }

    /// Epoch milliseconds of the hour start.
    #[must_use]
    pub fn epoch_millis(&self) -> i64 {
        self.start_millis
    }

    /// Start of the hour as a timestamp.
    #[must_use]
    pub fn start(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.start_millis).unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// First instant that no longer belongs to this bucket.
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.start_millis.saturating_add(HOUR_MILLIS))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Bytes fed to the digest: the decimal epoch-millisecond value as UTF-8.
    #[must_use]
    pub fn digest_input(&self) -> String {
        self.start_millis.to_string()
    }
}

/// An account as observed on the network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub account_id: PublicKeyString,
    pub sequence: i64,
}

impl Account {
    pub fn new(account_id: PublicKeyString, sequence: i64) -> Self {
        Self {
            account_id,
            sequence,
        }
    }

    /// Placeholder source account for simulations: all-zero key, sequence 0.
    #[must_use]
    pub fn mock_source() -> Self {
        Self::new(strkey::mock_public_key(), 0)
    }

    /// Sequence number the next transaction from this account must carry.
    #[must_use]
    pub fn next_sequence(&self) -> i64 {
        self.sequence.saturating_add(1)
    }
}

/// Signature plus the key hint Stellar envelopes carry next to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoratedSignature {
    /// Last four bytes of the signer's public key.
    pub hint: [u8; 4],
    pub signature: [u8; 64],
}

impl DecoratedSignature {
    /// XDR form: `opaque hint[4]` followed by `opaque signature<64>`.
    #[must_use]
    pub fn to_xdr(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(4 + 4 + 64);
        out.extend_from_slice(&self.hint);
        out.extend_from_slice(&(self.signature.len() as u32).to_be_bytes());
        out.extend_from_slice(&self.signature);
        out
    }

    #[must_use]
    pub fn to_xdr_base64(&self) -> String {
        BASE64.encode(self.to_xdr())
    }
}

/// What the background funding attempt observed.
///
/// Never returned to callers of the identity provider; it exists so the
/// detached task has a value to log and tests have something to await.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FundingOutcome {
    /// The account already existed.
    AlreadyFunded,
    /// The lookup failed and the airdrop request succeeded.
    Funded,
    /// The lookup failed and so did the airdrop request.
    Failed(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_time_bucket_truncates_to_hour() {
        let instant = Utc
            .with_ymd_and_hms(2024, 1, 1, 0, 37, 12)
            .unwrap()
            .checked_add_signed(chrono::TimeDelta::milliseconds(345))
            .unwrap();
        let bucket = TimeBucket::containing(instant);

        assert_eq!(bucket.epoch_millis(), 1_704_067_200_000);
        assert_eq!(bucket.digest_input(), "1704067200000");
        assert_eq!(
            bucket.start(),
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_time_bucket_boundaries() {
        let start = Utc.with_ymd_and_hms(2024, 6, 15, 13, 0, 0).unwrap();
        let last = Utc.with_ymd_and_hms(2024, 6, 15, 13, 59, 59).unwrap();
        let next = Utc.with_ymd_and_hms(2024, 6, 15, 14, 0, 0).unwrap();

        assert_eq!(TimeBucket::containing(start), TimeBucket::containing(last));
        assert_ne!(TimeBucket::containing(last), TimeBucket::containing(next));
        assert_eq!(TimeBucket::containing(start).expires_at(), next);
    }

    #[test]
    fn test_time_bucket_before_epoch_floors_downward() {
        let instant = Utc.with_ymd_and_hms(1969, 12, 31, 23, 30, 0).unwrap();
        let bucket = TimeBucket::containing(instant);
        assert_eq!(bucket.epoch_millis(), -HOUR_MILLIS);
    }

    #[test]
    fn test_time_bucket_ignores_local_offset() {
        use chrono::FixedOffset;

        // 10:45 at +05:30 is 05:15 UTC.
        let india = FixedOffset::east_opt(5 * 3600 + 30 * 60).unwrap();
        let local = india.with_ymd_and_hms(2024, 1, 1, 10, 45, 0).unwrap();
        let bucket = TimeBucket::containing(local.with_timezone(&Utc));

        assert_eq!(
            bucket.start(),
            Utc.with_ymd_and_hms(2024, 1, 1, 5, 0, 0).unwrap()
        );
        assert_eq!(bucket.epoch_millis() % HOUR_MILLIS, 0);
    }

    #[test]
    fn test_mock_source_account() {
        let account = Account::mock_source();
        assert_eq!(
            account.account_id,
            "GAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAWHF"
        );
        assert_eq!(account.sequence, 0);
        assert_eq!(account.next_sequence(), 1);
    }

    #[test]
    fn test_decorated_signature_xdr_layout() {
        let sig = DecoratedSignature {
            hint: [1, 2, 3, 4],
            signature: [7u8; 64],
        };
        let xdr = sig.to_xdr();
        assert_eq!(xdr.len(), 72);
        assert_eq!(&xdr[..4], &[1, 2, 3, 4]);
        assert_eq!(&xdr[4..8], &[0, 0, 0, 64]);
        assert!(xdr[8..].iter().all(|b| *b == 7));
    }
}
