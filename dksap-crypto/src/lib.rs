//! # DKSAP Cryptography
//!
//! Curve and hash primitives for the DKSAP protocol.
//!
//! This crate provides:
//!
//! - **Curve**: P-256 point addition, negation, subtraction and scalar multiplication
//! - **Hash**: SHA-256, RIPEMD-160 and the hash-to-scalar fold for one-time keys
//! - **Address**: Base58 checksummed public addresses
//!
//! ## Security Properties
//!
//! - Scalars are non-zero by construction and zeroized on drop
//! - The point at infinity is rejected before any point is published
//! - Address checksums are compared in constant time
//!
//! ## Example
//!
//! ```rust
//! use dksap_core::HashScheme;
//! use dksap_crypto::{decode_address, encode_address, curve};
//!
//! let k = curve::random_scalar();
//! let point = curve::scalar_base_mult(&k).to_public().unwrap();
//!
//! let address = encode_address(&point, HashScheme::Standard);
//! let payload = decode_address(&address, HashScheme::Standard).unwrap();
//! assert_eq!(payload.version, dksap_core::ADDRESS_VERSION);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod address;
pub mod curve;
pub mod hash;

// Re-export main functions at crate root
pub use address::{
    address_matches, decode_address, encode_address, encode_address_from_coordinates,
    AddressPayload,
};
pub use curve::CurvePoint;
pub use hash::{hash_to_scalar, sha256};
