//! Resolved CLI settings.

use std::path::PathBuf;

use dksap_core::types::HashScheme;
use dksap_keystore::FileKeyStore;

/// Settings shared by every command, after flags, environment and `.env`
/// have been applied.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Directory holding the PEM files and the ephemeral record
    pub wallet_dir: PathBuf,
    /// Hash scheme for one-time keys, addresses and sender ids
    pub scheme: HashScheme,
    /// Debug-level logging for the DKSAP crates
    pub verbose: bool,
}

impl CliConfig {
    /// Key store over the configured wallet directory.
    pub fn key_store(&self) -> FileKeyStore {
        FileKeyStore::new(&self.wallet_dir)
    }

    /// Default tracing filter when `RUST_LOG` is unset.
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "dksap_cli=debug,dksap_stealth=debug,dksap_keystore=debug,info"
        } else {
            "dksap_cli=info,warn"
        }
    }
}
