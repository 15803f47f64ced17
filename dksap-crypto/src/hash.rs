//! Hashing utilities.
//!
//! SHA-256, RIPEMD-160 and the hash-to-scalar fold used by one-time keys.
//!
//! ## Hash To Scalar
//!
//! ```text
//! Standard:  h = SHA256(DOMAIN_ONE_TIME_KEY || X) mod N
//! Legacy:    h = (X * 2^128 + MD5("")) mod N
//! ```
//!
//! The legacy fold is what the deployed client computes: it appends the MD5
//! digest of the empty string to the X coordinate bytes and lets the curve
//! reduce the result. It is kept only for interoperability.

use md5::Md5;
use p256::elliptic_curve::bigint::U256;
use p256::elliptic_curve::ops::Reduce;
use p256::{FieldBytes, NonZeroScalar, Scalar};
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

use dksap_core::constants::{COORDINATE_SIZE, DOMAIN_ONE_TIME_KEY, PUBKEY_HASH_SIZE};
use dksap_core::error::{DksapError, Result};
use dksap_core::types::{HashScheme, PrivateScalar};

// ═══════════════════════════════════════════════════════════════════════════════
// DIGESTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Computes SHA-256.
pub fn sha256(input: &[u8]) -> [u8; 32] {
    Sha256::digest(input).into()
}

/// Computes SHA-256 over the concatenation of `inputs`.
pub fn sha256_multi(inputs: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for input in inputs {
        hasher.update(input);
    }
    hasher.finalize().into()
}

/// Computes `SHA256(SHA256(input))`.
pub fn double_sha256(input: &[u8]) -> [u8; 32] {
    sha256(&sha256(input))
}

/// Computes RIPEMD-160.
pub fn ripemd160(input: &[u8]) -> [u8; PUBKEY_HASH_SIZE] {
    Ripemd160::digest(input).into()
}

/// Computes `RIPEMD160(SHA256(input))`.
pub fn hash160(input: &[u8]) -> [u8; PUBKEY_HASH_SIZE] {
    ripemd160(&sha256(input))
}

/// SHA-256 rendered as lowercase hex text.
pub fn sha256_hex(input: &[u8]) -> String {
    hex::encode(sha256(input))
}

// ═══════════════════════════════════════════════════════════════════════════════
// LEGACY TEXT ENCODING
// ═══════════════════════════════════════════════════════════════════════════════

/// Lowercase hex of a big-endian integer without leading zeros.
///
/// Zero renders as `"0"`.
pub fn unpadded_hex(bytes: &[u8]) -> String {
    let hex = hex::encode(bytes);
    let trimmed = hex.trim_start_matches('0');
    if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// HASH TO SCALAR
// ═══════════════════════════════════════════════════════════════════════════════

/// Folds a shared X coordinate into a scalar in `[1, N-1]`.
///
/// # Errors
/// Returns `InvalidScalar` if the reduction lands on zero.
pub fn hash_to_scalar(scheme: HashScheme, x: &[u8; COORDINATE_SIZE]) -> Result<PrivateScalar> {
    let scalar = match scheme {
        HashScheme::Standard => standard_fold(x),
        HashScheme::Legacy => legacy_fold(x),
    };

    Option::<NonZeroScalar>::from(NonZeroScalar::new(scalar))
        .map(PrivateScalar::from_nonzero)
        .ok_or_else(|| DksapError::InvalidScalar("hash reduced to zero".into()))
}

fn standard_fold(x: &[u8; COORDINATE_SIZE]) -> Scalar {
    let digest = Sha256::new()
        .chain_update(DOMAIN_ONE_TIME_KEY)
        .chain_update(x)
        .finalize();
    <Scalar as Reduce<U256>>::reduce_bytes(&digest)
}

fn legacy_fold(x: &[u8; COORDINATE_SIZE]) -> Scalar {
    // X || MD5("") read as one big-endian integer is X * 2^128 + MD5("")
    let mut shift = [0u8; 32];
    shift[15] = 1;
    let mut tail = [0u8; 32];
    tail[16..].copy_from_slice(&Md5::digest(b""));

    let x = <Scalar as Reduce<U256>>::reduce_bytes(&FieldBytes::from(*x));
    let shift = <Scalar as Reduce<U256>>::reduce_bytes(&FieldBytes::from(shift));
    let tail = <Scalar as Reduce<U256>>::reduce_bytes(&FieldBytes::from(tail));
    x * shift + tail
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_sha256_known_vector() {
        let expected = hex::decode(
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad",
        )
        .unwrap();
        assert_eq!(sha256(b"abc").as_slice(), expected.as_slice());
        assert_eq!(sha256_hex(b"abc"), hex::encode(&expected));
    }

    #[test]
    fn test_ripemd160_known_vector() {
        let expected = hex::decode("8eb208f7e05d987a9b044a8e98c6b087f15a0bfc").unwrap();
        assert_eq!(ripemd160(b"abc").as_slice(), expected.as_slice());
    }

    #[test]
    fn test_sha256_multi_matches_concatenation() {
        assert_eq!(sha256_multi(&[&b"ab"[..], &b"c"[..]]), sha256(b"abc"));
        assert_eq!(double_sha256(b"abc"), sha256(&sha256(b"abc")));
        assert_eq!(hash160(b"abc"), ripemd160(&sha256(b"abc")));
    }

    #[test_case(&[0x00, 0x00], "0" ; "zero")]
    #[test_case(&[0x00, 0x0a, 0xbc], "abc" ; "leading zeros")]
    #[test_case(&[0x10, 0x00], "1000" ; "trailing zeros kept")]
    fn test_unpadded_hex(bytes: &[u8], expected: &str) {
        assert_eq!(unpadded_hex(bytes), expected);
    }

    #[test]
    fn test_legacy_fold_small_x() {
        // X = 1: the concatenation is 0x01 || d41d8cd98f00b204e9800998ecf8427e, below N
        let mut x = [0u8; 32];
        x[31] = 1;
        let h = hash_to_scalar(HashScheme::Legacy, &x).unwrap();
        assert_eq!(
            h.to_hex(),
            "00000000000000000000000000000001d41d8cd98f00b204e9800998ecf8427e"
        );
    }

    #[test]
    fn test_legacy_fold_zero_x() {
        let h = hash_to_scalar(HashScheme::Legacy, &[0u8; 32]).unwrap();
        assert_eq!(
            h.to_hex(),
            "00000000000000000000000000000000d41d8cd98f00b204e9800998ecf8427e"
        );
    }

    #[test]
    fn test_schemes_differ() {
        let x = [0x42u8; 32];
        let standard = hash_to_scalar(HashScheme::Standard, &x).unwrap();
        let legacy = hash_to_scalar(HashScheme::Legacy, &x).unwrap();
        assert_ne!(standard, legacy);
    }

    #[test]
    fn test_standard_fold_is_domain_separated() {
        let x = [7u8; 32];
        let h = hash_to_scalar(HashScheme::Standard, &x).unwrap();
        let plain = <Scalar as Reduce<U256>>::reduce_bytes(&Sha256::digest(x));
        assert_ne!(h.as_scalar(), &plain);
        assert_eq!(h, hash_to_scalar(HashScheme::Standard, &x).unwrap());
    }
}
