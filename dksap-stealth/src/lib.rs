//! # DKSAP Stealth Derivations
//!
//! The dual-key stealth address protocol on top of `dksap-crypto`.
//!
//! This crate provides:
//!
//! - **Channels**: Pairwise Diffie-Hellman secrets `a*B == b*A`
//! - **Blinded Secrets**: Per-message secrets derived from a channel
//! - **One-Time Keys**: Unlinkable destination keys `P = H(r*A)*G + B`
//! - **Sender Ids**: Hashes binding a spend key to a timestamp
//! - **Identity**: View + spend key pairs with the mutable ephemeral record
//!
//! ## Quick Start
//!
//! ```rust
//! use dksap_core::HashScheme;
//! use dksap_stealth::{create_one_time_key, Identity};
//!
//! // Recipient publishes A and B
//! let recipient = Identity::generate();
//! let meta = recipient.meta_address();
//!
//! // Sender derives P and publishes R
//! let otk = create_one_time_key(&meta, HashScheme::Standard).unwrap();
//!
//! // Recipient recovers the same key from R
//! let key = recipient
//!     .recover_one_time_key(otk.ephemeral_public(), HashScheme::Standard)
//!     .unwrap();
//! assert_eq!(&key, otk.key());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod blinded;
pub mod channel;
pub mod identity;
pub mod one_time;
pub mod sender_id;

pub use blinded::{
    derive_blinded_secret, derive_blinded_secret_with, recover_blinded_secret, BlindedSecret,
};
pub use channel::{establish_channel, establish_channel_mirror};
pub use identity::Identity;
pub use one_time::{
    create_one_time_key, derive_one_time_key, is_one_time_key_for, recover_one_time_key,
    recover_one_time_private, OneTimeKey,
};
pub use sender_id::derive_sender_id;
