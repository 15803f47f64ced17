//! # DKSAP Key Store
//!
//! Persistence for key pairs and the ephemeral record.
//!
//! This crate provides two [`KeyStore`] backends:
//!
//! - **File**: PEM files in a wallet directory, written atomically
//! - **Memory**: The same encodings held in memory for tests
//!
//! ## Example
//!
//! ```rust,ignore
//! use dksap_core::{KeyPair, VIEW_KEY_NAME};
//! use dksap_keystore::{FileKeyStore, KeyStore};
//!
//! let store = FileKeyStore::new("wallet");
//! store.save_key_pair(VIEW_KEY_NAME, &KeyPair::generate()).await?;
//! let view = store.load_key_pair(VIEW_KEY_NAME).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod ephemeral;
mod file;
mod memory;
pub mod pem;

pub use file::FileKeyStore;
pub use memory::MemoryKeyStore;

// Re-export the trait from core
pub use dksap_core::traits::KeyStore;
