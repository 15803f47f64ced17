//! Common traits for DKSAP.
//!
//! Derivations never touch storage directly. Key material enters and leaves
//! the system through [`KeyStore`], which has file and in-memory
//! implementations in `dksap-keystore`.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{EphemeralRecord, KeyPair, PrivateScalar, PublicPoint};

// ═══════════════════════════════════════════════════════════════════════════════
// KEY STORAGE TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Interface for persisting named key pairs and the ephemeral record.
///
/// Key names are short identifiers such as `"A"` (view) and `"B"` (spend).
/// Loading never fabricates defaults: a missing or corrupt entry is an error.
#[async_trait]
pub trait KeyStore: Send + Sync {
    /// Saves both halves of a key pair.
    ///
    /// Fails with `InvalidScalar` if the pair has no private scalar.
    async fn save_key_pair(&self, name: &str, pair: &KeyPair) -> Result<()>;

    /// Saves only the public half under `name`.
    async fn save_public(&self, name: &str, public: &PublicPoint) -> Result<()>;

    /// Loads the private scalar saved under `name`.
    async fn load_private(&self, name: &str) -> Result<PrivateScalar>;

    /// Loads the public point saved under `name`.
    async fn load_public(&self, name: &str) -> Result<PublicPoint>;

    /// Loads both halves and checks that they match.
    async fn load_key_pair(&self, name: &str) -> Result<KeyPair>;

    /// Returns true if a private key is stored under `name`.
    async fn exists(&self, name: &str) -> Result<bool>;

    /// Replaces the stored ephemeral record.
    async fn save_ephemeral(&self, record: &EphemeralRecord) -> Result<()>;

    /// Loads the stored ephemeral record.
    async fn load_ephemeral(&self) -> Result<EphemeralRecord>;
}
