//! Address and channel types for DKSAP.
//!
//! - [`MetaAddress`]: The recipient's published view and spend points
//! - [`Channel`]: A pairwise Diffie-Hellman secret between two identities
//! - [`Address`]: Base58 checksummed encoding of a public point
//! - [`SenderId`]: Hash binding a spend key to a timestamp

use serde::{Deserialize, Serialize};

use super::{KeyPair, PublicPoint};
use crate::constants::SENDER_ID_SIZE;
use crate::error::{DksapError, Result};

// ═══════════════════════════════════════════════════════════════════════════════
// META-ADDRESS
// ═══════════════════════════════════════════════════════════════════════════════

/// The pair of long-term public points a recipient publishes.
///
/// Senders need nothing else to derive a one-time key for the recipient.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaAddress {
    /// View public point `A`
    pub view: PublicPoint,
    /// Spend public point `B`
    pub spend: PublicPoint,
}

impl MetaAddress {
    /// Creates a meta-address from the two public points.
    pub fn new(view: PublicPoint, spend: PublicPoint) -> Self {
        Self { view, spend }
    }

    /// Extracts the public halves of a view and a spend key pair.
    pub fn from_key_pairs(view: &KeyPair, spend: &KeyPair) -> Self {
        Self::new(*view.public(), *spend.public())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// CHANNEL
// ═══════════════════════════════════════════════════════════════════════════════

/// A reusable pairwise secret `a*B == b*A` together with the two public
/// points it was computed from.
#[derive(Clone, PartialEq, Eq)]
pub struct Channel {
    secret: PublicPoint,
    view_public: PublicPoint,
    spend_public: PublicPoint,
}

impl Channel {
    /// Assembles a channel from an already computed secret.
    pub fn new(secret: PublicPoint, view_public: PublicPoint, spend_public: PublicPoint) -> Self {
        Self {
            secret,
            view_public,
            spend_public,
        }
    }

    /// The shared Diffie-Hellman point.
    ///
    /// # Security
    /// This point is secret. Do not log or publish it.
    pub fn secret(&self) -> &PublicPoint {
        &self.secret
    }

    /// The view public point `A`.
    pub fn view_public(&self) -> &PublicPoint {
        &self.view_public
    }

    /// The spend public point `B`.
    pub fn spend_public(&self) -> &PublicPoint {
        &self.spend_public
    }

    /// The recipient described by this channel's public points.
    pub fn recipient(&self) -> MetaAddress {
        MetaAddress::new(self.view_public, self.spend_public)
    }
}

impl std::fmt::Debug for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Channel")
            .field("secret", &"[REDACTED]")
            .field("view_public", &self.view_public)
            .field("spend_public", &self.spend_public)
            .finish()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ADDRESS
// ═══════════════════════════════════════════════════════════════════════════════

/// Printable Base58 public address. Encoding is one-way: the point cannot be
/// recovered from it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Wraps an encoded address string.
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Returns the address text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Address {
    type Err = DksapError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(DksapError::EncodingFailure("empty address".into()));
        }
        Ok(Self::new(s))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SENDER ID
// ═══════════════════════════════════════════════════════════════════════════════

/// SHA-256 digest binding a public point to a timestamp.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SenderId([u8; SENDER_ID_SIZE]);

impl SenderId {
    /// Wraps a digest.
    pub fn from_array(bytes: [u8; SENDER_ID_SIZE]) -> Self {
        Self(bytes)
    }

    /// Returns the digest bytes.
    pub fn as_bytes(&self) -> &[u8; SENDER_ID_SIZE] {
        &self.0
    }

    /// Returns the digest as 64 lowercase hex digits.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parses a hex digest.
    pub fn from_hex(s: &str) -> Result<Self> {
        let mut out = [0u8; SENDER_ID_SIZE];
        hex::decode_to_slice(s.trim(), &mut out)?;
        Ok(Self(out))
    }
}

impl std::fmt::Display for SenderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl std::fmt::Debug for SenderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SenderId({})", self.to_hex())
    }
}

impl Serialize for SenderId {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for SenderId {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PrivateScalar;

    #[test]
    fn test_channel_debug_redacts_secret() {
        let secret = PrivateScalar::random().public_point();
        let a = PrivateScalar::random().public_point();
        let b = PrivateScalar::random().public_point();
        let channel = Channel::new(secret, a, b);

        let debug = format!("{:?}", channel);
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains(&secret.to_hex()[2..12]));
        assert_eq!(channel.recipient(), MetaAddress::new(a, b));
    }

    #[test]
    fn test_meta_address_serde() {
        let meta = MetaAddress::from_key_pairs(&KeyPair::generate(), &KeyPair::generate());
        let json = serde_json::to_string(&meta).unwrap();
        let back: MetaAddress = serde_json::from_str(&json).unwrap();
        assert_eq!(meta, back);
    }

    #[test]
    fn test_address_parse() {
        let addr: Address = "  9Ggs4xUvqBHDwMcT ".parse().unwrap();
        assert_eq!(addr.as_str(), "9Ggs4xUvqBHDwMcT");
        assert!("".parse::<Address>().is_err());
    }

    #[test]
    fn test_sender_id_hex_roundtrip() {
        let id = SenderId::from_array([0xAB; SENDER_ID_SIZE]);
        assert_eq!(SenderId::from_hex(&id.to_hex()).unwrap(), id);
        assert!(SenderId::from_hex("abcd").is_err());
    }
}
