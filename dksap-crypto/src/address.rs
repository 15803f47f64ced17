//! Base58 public addresses.
//!
//! ## Standard Layout
//!
//! ```text
//! pkh       = RIPEMD160(SHA256(0x04 || X || Y))
//! versioned = 0x01 || pkh
//! checksum  = SHA256(SHA256(versioned))[0..4]
//! address   = Base58(versioned || checksum)          (Bitcoin alphabet)
//! ```
//!
//! ## Legacy Layout
//!
//! Each hash consumes the lowercase hex *text* of the previous step, and the
//! coordinates are written without leading zeros:
//!
//! ```text
//! pkh       = RIPEMD160(hex(SHA256("04" || hex(X) || hex(Y))))
//! v         = "01" || hex(pkh)
//! checksum  = SHA256(hex(SHA256(v)))[0..4]
//! address   = Base58(0x01 || pkh || checksum)         (Flickr alphabet)
//! ```

use subtle::ConstantTimeEq;

use dksap_core::constants::{
    ADDRESS_PAYLOAD_SIZE, ADDRESS_VERSION, CHECKSUM_SIZE, PUBKEY_HASH_SIZE,
};
use dksap_core::error::{DksapError, Result};
use dksap_core::types::{Address, HashScheme, PublicPoint};

use crate::hash::{double_sha256, hash160, ripemd160, sha256, sha256_hex, unpadded_hex};

/// Decoded contents of an address.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddressPayload {
    /// Version byte
    pub version: u8,
    /// RIPEMD-160 public key hash
    pub pubkey_hash: [u8; PUBKEY_HASH_SIZE],
    /// Leading bytes of the double hash
    pub checksum: [u8; CHECKSUM_SIZE],
}

impl AddressPayload {
    /// Returns the 25-byte binary form.
    pub fn to_bytes(&self) -> [u8; ADDRESS_PAYLOAD_SIZE] {
        let mut out = [0u8; ADDRESS_PAYLOAD_SIZE];
        out[0] = self.version;
        out[1..1 + PUBKEY_HASH_SIZE].copy_from_slice(&self.pubkey_hash);
        out[1 + PUBKEY_HASH_SIZE..].copy_from_slice(&self.checksum);
        out
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ENCODING
// ═══════════════════════════════════════════════════════════════════════════════

/// Encodes a public point as a Base58 checksummed address.
///
/// Deterministic: the same point and scheme always give the same string.
pub fn encode_address(point: &PublicPoint, scheme: HashScheme) -> Address {
    let pubkey_hash = pubkey_hash(point, scheme);
    let payload = AddressPayload {
        version: ADDRESS_VERSION,
        pubkey_hash,
        checksum: checksum(ADDRESS_VERSION, &pubkey_hash, scheme),
    };
    Address::new(
        bs58::encode(payload.to_bytes())
            .with_alphabet(alphabet(scheme))
            .into_string(),
    )
}

/// Encodes raw affine coordinates, validating the point first.
///
/// # Errors
/// Returns `InvalidPoint` if the coordinates are not a point on the curve.
pub fn encode_address_from_coordinates(x: &[u8], y: &[u8], scheme: HashScheme) -> Result<Address> {
    let point = PublicPoint::from_affine_coordinates(x, y)?;
    Ok(encode_address(&point, scheme))
}

/// Hashes a point to its 20-byte public key hash.
pub fn pubkey_hash(point: &PublicPoint, scheme: HashScheme) -> [u8; PUBKEY_HASH_SIZE] {
    match scheme {
        HashScheme::Standard => hash160(&point.to_uncompressed()),
        HashScheme::Legacy => {
            let text = format!(
                "04{}{}",
                unpadded_hex(&point.x_bytes()),
                unpadded_hex(&point.y_bytes())
            );
            ripemd160(sha256_hex(text.as_bytes()).as_bytes())
        }
    }
}

fn checksum(
    version: u8,
    pubkey_hash: &[u8; PUBKEY_HASH_SIZE],
    scheme: HashScheme,
) -> [u8; CHECKSUM_SIZE] {
    let digest = match scheme {
        HashScheme::Standard => {
            let mut versioned = [0u8; 1 + PUBKEY_HASH_SIZE];
            versioned[0] = version;
            versioned[1..].copy_from_slice(pubkey_hash);
            double_sha256(&versioned)
        }
        HashScheme::Legacy => {
            let text = format!("{version:02x}{}", hex::encode(pubkey_hash));
            sha256(sha256_hex(text.as_bytes()).as_bytes())
        }
    };

    let mut out = [0u8; CHECKSUM_SIZE];
    out.copy_from_slice(&digest[..CHECKSUM_SIZE]);
    out
}

fn alphabet(scheme: HashScheme) -> &'static bs58::Alphabet {
    match scheme {
        HashScheme::Standard => bs58::Alphabet::BITCOIN,
        HashScheme::Legacy => bs58::Alphabet::FLICKR,
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// DECODING
// ═══════════════════════════════════════════════════════════════════════════════

/// Decodes an address and verifies its version and checksum.
///
/// The point itself cannot be recovered; only the hash and checksum are
/// returned.
///
/// # Errors
/// Returns `EncodingFailure` on invalid Base58, wrong length, unknown version
/// or checksum mismatch.
pub fn decode_address(address: &Address, scheme: HashScheme) -> Result<AddressPayload> {
    let bytes = bs58::decode(address.as_str())
        .with_alphabet(alphabet(scheme))
        .into_vec()
        .map_err(|e| DksapError::EncodingFailure(format!("invalid base58: {e}")))?;

    if bytes.len() != ADDRESS_PAYLOAD_SIZE {
        return Err(DksapError::EncodingFailure(format!(
            "address decodes to {} bytes, expected {ADDRESS_PAYLOAD_SIZE}",
            bytes.len()
        )));
    }
    if bytes[0] != ADDRESS_VERSION {
        return Err(DksapError::EncodingFailure(format!(
            "unknown address version {:#04x}",
            bytes[0]
        )));
    }

    let mut pubkey_hash = [0u8; PUBKEY_HASH_SIZE];
    pubkey_hash.copy_from_slice(&bytes[1..1 + PUBKEY_HASH_SIZE]);
    let mut found = [0u8; CHECKSUM_SIZE];
    found.copy_from_slice(&bytes[1 + PUBKEY_HASH_SIZE..]);

    let expected = checksum(bytes[0], &pubkey_hash, scheme);
    if !bool::from(expected[..].ct_eq(&found[..])) {
        return Err(DksapError::EncodingFailure("address checksum mismatch".into()));
    }

    Ok(AddressPayload {
        version: bytes[0],
        pubkey_hash,
        checksum: found,
    })
}

/// Returns true if `address` is the encoding of `point` under `scheme`.
pub fn address_matches(address: &Address, point: &PublicPoint, scheme: HashScheme) -> bool {
    match decode_address(address, scheme) {
        Ok(payload) => bool::from(payload.pubkey_hash[..].ct_eq(&pubkey_hash(point, scheme)[..])),
        Err(_) => false,
    }
}
