//! Key types for DKSAP.
//!
//! This module defines the key material used in the protocol:
//!
//! - [`PrivateScalar`]: Non-zero scalar below the group order (zeroized on drop)
//! - [`PublicPoint`]: Affine point on P-256, never the point at infinity
//! - [`KeyPair`]: A public point with an optional matching private scalar
//! - [`EphemeralRecord`]: The per-transaction `(r, R)` pair

use p256::elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint};
use p256::elliptic_curve::PrimeField;
use p256::{EncodedPoint, FieldBytes, NonZeroScalar, ProjectivePoint, PublicKey, Scalar};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use subtle::{Choice, ConstantTimeEq};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::constants::{COORDINATE_SIZE, SCALAR_SIZE, UNCOMPRESSED_POINT_SIZE};
use crate::error::{DksapError, Result};

// ═══════════════════════════════════════════════════════════════════════════════
// PRIVATE SCALAR
// ═══════════════════════════════════════════════════════════════════════════════

/// Private scalar in `[1, N-1]`.
///
/// Zero and values at or above the group order are unrepresentable. The value
/// is overwritten when dropped and never shown by `Debug`.
#[derive(Clone)]
pub struct PrivateScalar(NonZeroScalar);

impl PrivateScalar {
    /// Samples a uniform scalar from the operating system CSPRNG.
    pub fn random() -> Self {
        Self::random_with(&mut OsRng)
    }

    /// Samples a uniform scalar from the given generator.
    ///
    /// Zero draws are rejected and re-sampled internally.
    pub fn random_with<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        Self(NonZeroScalar::random(rng))
    }

    /// Wraps an already validated non-zero scalar.
    pub fn from_nonzero(scalar: NonZeroScalar) -> Self {
        Self(scalar)
    }

    /// Creates a scalar from its 32-byte big-endian encoding.
    ///
    /// # Errors
    /// Returns `InvalidScalar` if the length is wrong, the value is zero, or
    /// the value is not below the group order.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != SCALAR_SIZE {
            return Err(DksapError::InvalidScalar(format!(
                "expected {SCALAR_SIZE} bytes, got {}",
                bytes.len()
            )));
        }

        let repr = *FieldBytes::from_slice(bytes);
        Option::<NonZeroScalar>::from(NonZeroScalar::from_repr(repr))
            .map(Self)
            .ok_or_else(|| {
                DksapError::InvalidScalar("scalar is zero or not below the group order".into())
            })
    }

    /// Creates a scalar from hex.
    ///
    /// Shorter inputs are left-padded, so unpadded big-integer hex is accepted.
    pub fn from_hex(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() || s.len() > 2 * SCALAR_SIZE {
            return Err(DksapError::InvalidScalar(format!(
                "hex scalar must be 1..={} digits, got {}",
                2 * SCALAR_SIZE,
                s.len()
            )));
        }
        let padded = format!("{s:0>width$}", width = 2 * SCALAR_SIZE);
        let bytes = hex::decode(padded)?;
        Self::from_bytes(&bytes)
    }

    /// Returns the 32-byte big-endian encoding.
    ///
    /// # Security
    /// Handle the returned bytes carefully - do not log or expose them.
    pub fn to_bytes(&self) -> [u8; SCALAR_SIZE] {
        let repr: FieldBytes = self.as_scalar().to_repr();
        let mut out = [0u8; SCALAR_SIZE];
        out.copy_from_slice(&repr);
        out
    }

    /// Returns the hex-encoded scalar (64 digits).
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Returns the underlying non-zero scalar.
    pub fn as_nonzero(&self) -> &NonZeroScalar {
        &self.0
    }

    /// Returns the underlying field scalar.
    pub fn as_scalar(&self) -> &Scalar {
        self.0.as_ref()
    }

    /// Computes `self * G`.
    pub fn public_point(&self) -> PublicPoint {
        PublicPoint(PublicKey::from_secret_scalar(&self.0))
    }
}

impl PartialEq for PrivateScalar {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for PrivateScalar {}

impl ConstantTimeEq for PrivateScalar {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.to_bytes()[..].ct_eq(&other.to_bytes()[..])
    }
}

impl Drop for PrivateScalar {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl ZeroizeOnDrop for PrivateScalar {}

impl std::fmt::Debug for PrivateScalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never expose scalar content
        write!(f, "PrivateScalar([REDACTED])")
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// PUBLIC POINT
// ═══════════════════════════════════════════════════════════════════════════════

/// Affine point on P-256 that is on the curve and not the point at infinity.
///
/// This is safe to share publicly.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct PublicPoint(PublicKey);

impl PublicPoint {
    /// Wraps a validated public key.
    pub fn from_public_key(key: PublicKey) -> Self {
        Self(key)
    }

    /// Converts a projective point, rejecting the point at infinity.
    pub fn from_projective(point: &ProjectivePoint) -> Result<Self> {
        PublicKey::from_affine(point.to_affine())
            .map(Self)
            .map_err(|_| DksapError::InvalidPoint("point at infinity".into()))
    }

    /// Creates a point from 32-byte big-endian affine coordinates.
    ///
    /// # Errors
    /// Returns `InvalidPoint` if either coordinate has the wrong size or the
    /// point does not satisfy the curve equation.
    pub fn from_affine_coordinates(x: &[u8], y: &[u8]) -> Result<Self> {
        if x.len() != COORDINATE_SIZE || y.len() != COORDINATE_SIZE {
            return Err(DksapError::InvalidPoint(format!(
                "coordinates must be {COORDINATE_SIZE} bytes, got {} and {}",
                x.len(),
                y.len()
            )));
        }

        let encoded = EncodedPoint::from_affine_coordinates(
            FieldBytes::from_slice(x),
            FieldBytes::from_slice(y),
            false,
        );
        Option::<PublicKey>::from(PublicKey::from_encoded_point(&encoded))
            .map(Self)
            .ok_or_else(|| DksapError::InvalidPoint("point is not on the curve".into()))
    }

    /// Creates a point from hex coordinates, accepting unpadded big-integer hex.
    pub fn from_hex_coordinates(x: &str, y: &str) -> Result<Self> {
        let x = coordinate_from_hex(x)?;
        let y = coordinate_from_hex(y)?;
        Self::from_affine_coordinates(&x, &y)
    }

    /// Creates a point from a SEC1 encoding (compressed or uncompressed).
    pub fn from_sec1_bytes(bytes: &[u8]) -> Result<Self> {
        PublicKey::from_sec1_bytes(bytes)
            .map(Self)
            .map_err(|_| DksapError::InvalidPoint("invalid SEC1 point encoding".into()))
    }

    /// Creates a point from a hex SEC1 encoding.
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s.trim())?;
        Self::from_sec1_bytes(&bytes)
    }

    /// Returns the uncompressed SEC1 encoding `0x04 || X || Y`.
    pub fn to_uncompressed(&self) -> [u8; UNCOMPRESSED_POINT_SIZE] {
        let encoded = self.0.to_encoded_point(false);
        let mut out = [0u8; UNCOMPRESSED_POINT_SIZE];
        out.copy_from_slice(encoded.as_bytes());
        out
    }

    /// Returns the 32-byte big-endian X coordinate.
    pub fn x_bytes(&self) -> [u8; COORDINATE_SIZE] {
        let mut out = [0u8; COORDINATE_SIZE];
        out.copy_from_slice(&self.to_uncompressed()[1..1 + COORDINATE_SIZE]);
        out
    }

    /// Returns the 32-byte big-endian Y coordinate.
    pub fn y_bytes(&self) -> [u8; COORDINATE_SIZE] {
        let mut out = [0u8; COORDINATE_SIZE];
        out.copy_from_slice(&self.to_uncompressed()[1 + COORDINATE_SIZE..]);
        out
    }

    /// Returns the hex-encoded uncompressed point.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_uncompressed())
    }

    /// Returns the underlying public key.
    pub fn as_public_key(&self) -> &PublicKey {
        &self.0
    }

    /// Returns the point in projective form for arithmetic.
    pub fn to_projective(&self) -> ProjectivePoint {
        self.0.to_projective()
    }
}

fn coordinate_from_hex(s: &str) -> Result<[u8; COORDINATE_SIZE]> {
    let s = s.trim();
    if s.is_empty() || s.len() > 2 * COORDINATE_SIZE {
        return Err(DksapError::InvalidPoint(format!(
            "hex coordinate must be 1..={} digits, got {}",
            2 * COORDINATE_SIZE,
            s.len()
        )));
    }
    let padded = format!("{s:0>width$}", width = 2 * COORDINATE_SIZE);
    let mut out = [0u8; COORDINATE_SIZE];
    hex::decode_to_slice(padded, &mut out)?;
    Ok(out)
}

impl ConstantTimeEq for PublicPoint {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.to_uncompressed()[..].ct_eq(&other.to_uncompressed()[..])
    }
}

impl std::fmt::Debug for PublicPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let hex = self.to_hex();
        write!(f, "PublicPoint({}...{})", &hex[..10], &hex[hex.len() - 8..])
    }
}

impl Serialize for PublicPoint {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for PublicPoint {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// KEY PAIR
// ═══════════════════════════════════════════════════════════════════════════════

/// A public point with an optional private scalar.
///
/// When the private scalar is present, `public == private * G` holds. Views of
/// a counterpart's keys carry only the public point.
#[derive(Clone)]
pub struct KeyPair {
    private: Option<PrivateScalar>,
    public: PublicPoint,
}

impl KeyPair {
    /// Generates a fresh key pair from the OS CSPRNG.
    pub fn generate() -> Self {
        Self::from_private(PrivateScalar::random())
    }

    /// Builds a key pair by deriving the public point from `private`.
    pub fn from_private(private: PrivateScalar) -> Self {
        let public = private.public_point();
        Self {
            private: Some(private),
            public,
        }
    }

    /// Builds a key pair from both halves, checking that they match.
    ///
    /// # Errors
    /// Returns `InvalidPoint` if `public != private * G`.
    pub fn new(private: PrivateScalar, public: PublicPoint) -> Result<Self> {
        if private.public_point() != public {
            return Err(DksapError::InvalidPoint(
                "public point does not match private scalar".into(),
            ));
        }
        Ok(Self {
            private: Some(private),
            public,
        })
    }

    /// Builds a public-only view.
    pub fn public_only(public: PublicPoint) -> Self {
        Self {
            private: None,
            public,
        }
    }

    /// Returns the public point.
    pub fn public(&self) -> &PublicPoint {
        &self.public
    }

    /// Returns the private scalar, if present.
    pub fn private(&self) -> Option<&PrivateScalar> {
        self.private.as_ref()
    }

    /// Returns the private scalar or an `InvalidScalar` error.
    pub fn require_private(&self) -> Result<&PrivateScalar> {
        self.private
            .as_ref()
            .ok_or_else(|| DksapError::InvalidScalar("key pair has no private scalar".into()))
    }

    /// Returns true if the private scalar is present.
    pub fn has_private(&self) -> bool {
        self.private.is_some()
    }

    /// Drops the private half.
    pub fn to_public_only(&self) -> Self {
        Self::public_only(self.public)
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("public", &self.public)
            .field("private", &self.private.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// EPHEMERAL RECORD
// ═══════════════════════════════════════════════════════════════════════════════

/// The most recently generated ephemeral pair `(r, R = r*G)`.
///
/// Only `R` is ever published; `r` stays with the identity that drew it.
#[derive(Clone, PartialEq, Eq)]
pub struct EphemeralRecord {
    scalar: PrivateScalar,
    public: PublicPoint,
}

impl EphemeralRecord {
    /// Draws a fresh record from the OS CSPRNG.
    pub fn generate() -> Self {
        Self::from_scalar(PrivateScalar::random())
    }

    /// Builds the record for a known scalar.
    pub fn from_scalar(scalar: PrivateScalar) -> Self {
        let public = scalar.public_point();
        Self { scalar, public }
    }

    /// Builds a record from stored halves, checking `public == scalar * G`.
    pub fn new(scalar: PrivateScalar, public: PublicPoint) -> Result<Self> {
        if scalar.public_point() != public {
            return Err(DksapError::InvalidPoint(
                "ephemeral point does not match ephemeral scalar".into(),
            ));
        }
        Ok(Self { scalar, public })
    }

    /// Returns the ephemeral scalar `r`.
    pub fn scalar(&self) -> &PrivateScalar {
        &self.scalar
    }

    /// Returns the ephemeral point `R`.
    pub fn public(&self) -> &PublicPoint {
        &self.public
    }
}

impl std::fmt::Debug for EphemeralRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EphemeralRecord")
            .field("scalar", &"[REDACTED]")
            .field("public", &self.public)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    // Order of the P-256 group.
    const ORDER_HEX: &str = "ffffffff00000000ffffffffffffffffbce6faada7179e84f3b9cac2fc632551";

    #[test]
    fn test_scalar_roundtrip() {
        let k = PrivateScalar::random();
        let k2 = PrivateScalar::from_bytes(&k.to_bytes()).unwrap();
        assert_eq!(k, k2);
        assert_eq!(PrivateScalar::from_hex(&k.to_hex()).unwrap(), k);
    }

    #[test_case(&[0u8; 32] ; "zero")]
    #[test_case(&[0xff; 32] ; "above order")]
    #[test_case(&[1u8; 31] ; "short")]
    fn test_scalar_rejected(bytes: &[u8]) {
        let result = PrivateScalar::from_bytes(bytes);
        assert!(matches!(result, Err(DksapError::InvalidScalar(_))));
    }

    #[test]
    fn test_scalar_order_rejected() {
        assert!(matches!(
            PrivateScalar::from_hex(ORDER_HEX),
            Err(DksapError::InvalidScalar(_))
        ));
    }

    #[test]
    fn test_scalar_unpadded_hex() {
        let one = PrivateScalar::from_hex("1").unwrap();
        assert_eq!(one.to_bytes()[31], 1);
        assert_eq!(one.public_point().to_projective(), ProjectivePoint::GENERATOR);
    }

    #[test]
    fn test_scalar_debug_redacted() {
        let k = PrivateScalar::random();
        let debug = format!("{:?}", k);
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains(&k.to_hex()[..8]));
    }

    #[test]
    fn test_point_coordinates_roundtrip() {
        let p = PrivateScalar::random().public_point();
        let q = PublicPoint::from_affine_coordinates(&p.x_bytes(), &p.y_bytes()).unwrap();
        assert_eq!(p, q);

        let bytes = p.to_uncompressed();
        assert_eq!(bytes[0], 0x04);
        assert_eq!(&bytes[1..33], &p.x_bytes());
        assert_eq!(&bytes[33..], &p.y_bytes());
    }

    #[test]
    fn test_point_off_curve_rejected() {
        let p = PrivateScalar::random().public_point();
        let mut y = p.y_bytes();
        y[31] ^= 1;
        let result = PublicPoint::from_affine_coordinates(&p.x_bytes(), &y);
        assert!(matches!(result, Err(DksapError::InvalidPoint(_))));
    }

    #[test]
    fn test_identity_rejected() {
        let result = PublicPoint::from_projective(&ProjectivePoint::IDENTITY);
        assert!(matches!(result, Err(DksapError::InvalidPoint(_))));

        // SEC1 encoding of the identity is a single zero byte
        assert!(PublicPoint::from_sec1_bytes(&[0u8]).is_err());
        assert!(PublicPoint::from_affine_coordinates(&[0u8; 32], &[0u8; 32]).is_err());
    }

    #[test]
    fn test_point_serde() {
        let p = PrivateScalar::random().public_point();
        let json = serde_json::to_string(&p).unwrap();
        let p2: PublicPoint = serde_json::from_str(&json).unwrap();
        assert_eq!(p, p2);
    }

    #[test]
    fn test_key_pair_invariant() {
        let kp = KeyPair::generate();
        let private = kp.private().unwrap().clone();
        assert!(KeyPair::new(private.clone(), *kp.public()).is_ok());

        let other = PrivateScalar::random().public_point();
        assert!(matches!(
            KeyPair::new(private, other),
            Err(DksapError::InvalidPoint(_))
        ));
    }

    #[test]
    fn test_public_only_has_no_private() {
        let kp = KeyPair::generate().to_public_only();
        assert!(!kp.has_private());
        assert!(matches!(kp.require_private(), Err(DksapError::InvalidScalar(_))));
        assert!(format!("{:?}", kp).contains("None"));
    }

    #[test]
    fn test_ephemeral_record_invariant() {
        let record = EphemeralRecord::generate();
        assert_eq!(record.scalar().public_point(), *record.public());

        let wrong = PrivateScalar::random().public_point();
        assert!(EphemeralRecord::new(record.scalar().clone(), wrong).is_err());
        assert!(format!("{:?}", record).contains("REDACTED"));
    }
}
