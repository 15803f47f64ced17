//! Wallet-directory key store.
//!
//! Keys live as PEM files inside a single wallet directory:
//!
//! ```text
//! wallet/
//!   keyA.pem       view private key  (SEC1)
//!   pub_keyA.pem   view public key   (SPKI)
//!   keyB.pem       spend private key
//!   pub_keyB.pem   spend public key
//!   randomKey      ephemeral record (three hex lines)
//! ```

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, instrument};

use dksap_core::constants::{private_key_file_name, public_key_file_name, EPHEMERAL_FILE_NAME};
use dksap_core::error::{DksapError, Result};
use dksap_core::traits::KeyStore;
use dksap_core::types::{EphemeralRecord, KeyPair, PrivateScalar, PublicPoint};

use crate::ephemeral::{decode_ephemeral, encode_ephemeral};
use crate::pem::{decode_private_key, decode_public_key, encode_private_key, encode_public_key};

/// Key store rooted at a wallet directory.
///
/// Every write goes to a temporary file first and is renamed into place, so
/// readers never observe a half-written key. On unix, files holding private
/// material are created with mode `0600`.
#[derive(Debug, Clone)]
pub struct FileKeyStore {
    dir: PathBuf,
}

impl FileKeyStore {
    /// Creates a store for `dir`. The directory is created on first write.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Creates a store for `dir`, creating the directory now.
    pub async fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let store = Self::new(dir);
        store.ensure_dir().await?;
        Ok(store)
    }

    /// Returns the wallet directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the private key file for `name`.
    pub fn private_key_path(&self, name: &str) -> PathBuf {
        self.dir.join(private_key_file_name(name))
    }

    /// Path of the public key file for `name`.
    pub fn public_key_path(&self, name: &str) -> PathBuf {
        self.dir.join(public_key_file_name(name))
    }

    /// Path of the ephemeral record file.
    pub fn ephemeral_path(&self) -> PathBuf {
        self.dir.join(EPHEMERAL_FILE_NAME)
    }

    async fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir).await.map_err(|e| {
            DksapError::PersistenceFailure(format!(
                "cannot create wallet directory {}: {e}",
                self.dir.display()
            ))
        })
    }

    /// Writes `contents` to `path` atomically (write to temp, then rename).
    #[instrument(skip(self, contents))]
    async fn write_atomic(&self, path: &Path, contents: &[u8], secret: bool) -> Result<()> {
        self.ensure_dir().await?;

        let temp_path = path.with_extension("tmp");
        let mut file = create_file(&temp_path, secret).await?;
        file.write_all(contents).await?;
        file.sync_all().await?;
        drop(file);

        fs::rename(&temp_path, path).await?;
        debug!(path = ?path, "File written");
        Ok(())
    }

    async fn read(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).await.map_err(|e| {
            DksapError::PersistenceFailure(format!("cannot read {}: {e}", path.display()))
        })
    }
}

#[cfg(unix)]
async fn create_file(path: &Path, secret: bool) -> Result<fs::File> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    if secret {
        options.mode(0o600);
    }
    Ok(options.open(path).await?)
}

#[cfg(not(unix))]
async fn create_file(path: &Path, _secret: bool) -> Result<fs::File> {
    Ok(fs::File::create(path).await?)
}

#[async_trait]
impl KeyStore for FileKeyStore {
    #[instrument(skip(self, pair))]
    async fn save_key_pair(&self, name: &str, pair: &KeyPair) -> Result<()> {
        let private = encode_private_key(pair.require_private()?)?;
        let public = encode_public_key(pair.public())?;

        self.write_atomic(&self.private_key_path(name), private.as_bytes(), true)
            .await?;
        self.write_atomic(&self.public_key_path(name), public.as_bytes(), false)
            .await?;

        info!(name, dir = ?self.dir, "Saved key pair");
        Ok(())
    }

    #[instrument(skip(self, public))]
    async fn save_public(&self, name: &str, public: &PublicPoint) -> Result<()> {
        let pem = encode_public_key(public)?;
        self.write_atomic(&self.public_key_path(name), pem.as_bytes(), false)
            .await?;
        info!(name, dir = ?self.dir, "Saved public key");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn load_private(&self, name: &str) -> Result<PrivateScalar> {
        let text = zeroize::Zeroizing::new(self.read(&self.private_key_path(name)).await?);
        decode_private_key(&text)
    }

    #[instrument(skip(self))]
    async fn load_public(&self, name: &str) -> Result<PublicPoint> {
        let text = self.read(&self.public_key_path(name)).await?;
        decode_public_key(&text)
    }

    async fn load_key_pair(&self, name: &str) -> Result<KeyPair> {
        let private = self.load_private(name).await?;
        let public = self.load_public(name).await?;
        KeyPair::new(private, public).map_err(|_| {
            DksapError::PersistenceFailure(format!(
                "public key file for '{name}' does not match its private key"
            ))
        })
    }

    async fn exists(&self, name: &str) -> Result<bool> {
        Ok(fs::try_exists(self.private_key_path(name)).await?)
    }

    #[instrument(skip(self, record))]
    async fn save_ephemeral(&self, record: &EphemeralRecord) -> Result<()> {
        let text = encode_ephemeral(record);
        self.write_atomic(&self.ephemeral_path(), text.as_bytes(), true)
            .await?;
        info!(dir = ?self.dir, "Saved ephemeral record");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn load_ephemeral(&self) -> Result<EphemeralRecord> {
        let text = zeroize::Zeroizing::new(self.read(&self.ephemeral_path()).await?);
        decode_ephemeral(&text)
    }
}
