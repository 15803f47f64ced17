//! In-memory key store.
//!
//! Holds the same PEM and ephemeral text the file store writes, so both
//! stores exercise one codec. Suitable for tests and short-lived processes.

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;
use tracing::{debug, instrument};
use zeroize::Zeroizing;

use dksap_core::error::{DksapError, Result};
use dksap_core::traits::KeyStore;
use dksap_core::types::{EphemeralRecord, KeyPair, PrivateScalar, PublicPoint};

use crate::ephemeral::{decode_ephemeral, encode_ephemeral};
use crate::pem::{decode_private_key, decode_public_key, encode_private_key, encode_public_key};

/// In-memory key store.
///
/// # Thread Safety
///
/// All operations are thread-safe and can be called concurrently.
#[derive(Default)]
pub struct MemoryKeyStore {
    /// name → SEC1 PEM
    private_keys: DashMap<String, Zeroizing<String>>,
    /// name → SPKI PEM
    public_keys: DashMap<String, String>,
    ephemeral: RwLock<Option<Zeroizing<String>>>,
}

impl MemoryKeyStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored private keys.
    pub fn len(&self) -> usize {
        self.private_keys.len()
    }

    /// Returns true if no private keys are stored.
    pub fn is_empty(&self) -> bool {
        self.private_keys.is_empty()
    }
}

impl std::fmt::Debug for MemoryKeyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryKeyStore")
            .field("private_keys", &self.private_keys.len())
            .field("public_keys", &self.public_keys.len())
            .field("has_ephemeral", &self.ephemeral.read().is_some())
            .finish()
    }
}

fn missing(what: String) -> DksapError {
    DksapError::PersistenceFailure(format!("no {what} stored"))
}

#[async_trait]
impl KeyStore for MemoryKeyStore {
    #[instrument(skip(self, pair))]
    async fn save_key_pair(&self, name: &str, pair: &KeyPair) -> Result<()> {
        let private = encode_private_key(pair.require_private()?)?;
        let public = encode_public_key(pair.public())?;
        self.private_keys.insert(name.to_string(), private);
        self.public_keys.insert(name.to_string(), public);
        debug!(name, "Stored key pair");
        Ok(())
    }

    async fn save_public(&self, name: &str, public: &PublicPoint) -> Result<()> {
        self.public_keys
            .insert(name.to_string(), encode_public_key(public)?);
        Ok(())
    }

    async fn load_private(&self, name: &str) -> Result<PrivateScalar> {
        let entry = self
            .private_keys
            .get(name)
            .ok_or_else(|| missing(format!("private key '{name}'")))?;
        decode_private_key(entry.value())
    }

    async fn load_public(&self, name: &str) -> Result<PublicPoint> {
        let entry = self
            .public_keys
            .get(name)
            .ok_or_else(|| missing(format!("public key '{name}'")))?;
        decode_public_key(entry.value())
    }

    async fn load_key_pair(&self, name: &str) -> Result<KeyPair> {
        let private = self.load_private(name).await?;
        let public = self.load_public(name).await?;
        KeyPair::new(private, public).map_err(|_| {
            DksapError::PersistenceFailure(format!(
                "public key for '{name}' does not match its private key"
            ))
        })
    }

    async fn exists(&self, name: &str) -> Result<bool> {
        Ok(self.private_keys.contains_key(name))
    }

    async fn save_ephemeral(&self, record: &EphemeralRecord) -> Result<()> {
        *self.ephemeral.write() = Some(encode_ephemeral(record));
        debug!("Stored ephemeral record");
        Ok(())
    }

    async fn load_ephemeral(&self) -> Result<EphemeralRecord> {
        let guard = self.ephemeral.read();
        let text = guard
            .as_ref()
            .ok_or_else(|| missing("ephemeral record".to_string()))?;
        decode_ephemeral(text)
    }
}
