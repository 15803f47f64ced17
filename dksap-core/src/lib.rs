//! # DKSAP Core
//!
//! Core types, errors, and traits for the dual-key stealth address protocol.
//!
//! This crate provides the foundational building blocks used by all other DKSAP crates:
//!
//! - **Types**: Scalars, curve points, key pairs, channels, ephemeral records
//! - **Errors**: One error enum covering scalar, point, encoding and persistence failures
//! - **Constants**: Sizes, version bytes, PEM labels and wallet file names
//! - **Traits**: The key storage interface implemented by `dksap-keystore`
//!
//! ## Example
//!
//! ```rust
//! use dksap_core::{KeyPair, HashScheme};
//!
//! let view = KeyPair::generate();
//! assert!(view.has_private());
//!
//! let scheme: HashScheme = "legacy".parse().unwrap();
//! assert!(scheme.is_legacy());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod constants;
pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use constants::*;
pub use error::{DksapError, Result};
pub use traits::*;
pub use types::*;
