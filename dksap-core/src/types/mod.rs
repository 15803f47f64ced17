//! Domain types for DKSAP.
//!
//! This module provides all the core data structures used throughout the protocol:
//!
//! - [`PrivateScalar`] / [`PublicPoint`]: Validated scalars and curve points
//! - [`KeyPair`]: View or spend key pair
//! - [`EphemeralRecord`]: Per-transaction ephemeral pair
//! - [`MetaAddress`], [`Channel`], [`Address`], [`SenderId`]: Derivation outputs
//! - [`HashScheme`]: Standard or legacy hashing

mod keys;
mod address;
mod scheme;

pub use keys::*;
pub use address::*;
pub use scheme::*;
