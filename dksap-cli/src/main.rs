//! DKSAP CLI
//!
//! Command-line interface for the dual-key stealth address protocol.

mod config;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use dksap_core::constants::{DEFAULT_WALLET_DIR, SPEND_KEY_NAME, VIEW_KEY_NAME};
use dksap_core::traits::KeyStore;
use dksap_core::types::{Address, EphemeralRecord, HashScheme, KeyPair, MetaAddress, PublicPoint};
use dksap_crypto::{address_matches, encode_address};
use dksap_keystore::pem::decode_public_key;
use dksap_keystore::FileKeyStore;
use dksap_stealth::{create_one_time_key, Identity};

use crate::config::CliConfig;

/// DKSAP - Dual-Key Stealth Address Protocol
#[derive(Parser)]
#[command(name = "dksap")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Wallet directory holding keys and the ephemeral record
    #[arg(long, global = true, env = "DKSAP_WALLET_DIR", default_value = DEFAULT_WALLET_DIR)]
    wallet_dir: PathBuf,

    /// Hash scheme: standard or legacy
    #[arg(long, global = true, env = "DKSAP_HASH_SCHEME", default_value = "standard")]
    scheme: HashScheme,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate view (A) and spend (B) key pairs into the wallet
    Keygen {
        /// Overwrite existing keys
        #[arg(long)]
        force: bool,
    },

    /// Print the address of a public key
    Address {
        /// Public key PEM file (defaults to the wallet's spend key)
        #[arg(short, long)]
        key: Option<PathBuf>,
    },

    /// Derive a one-time key for a recipient
    Send {
        /// Recipient's view public key (PEM)
        #[arg(long)]
        view_pub: PathBuf,
        /// Recipient's spend public key (PEM)
        #[arg(long)]
        spend_pub: PathBuf,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Recover the one-time key for a published ephemeral point
    Receive {
        /// X coordinate of R (hex)
        #[arg(long)]
        rx: String,
        /// Y coordinate of R (hex)
        #[arg(long)]
        ry: String,
        /// Fail unless the recovered key has this address
        #[arg(long)]
        expect: Option<String>,
    },

    /// Derive a blinded secret over the channel with a counterpart
    Blind {
        /// Counterpart's view public key (PEM)
        #[arg(long)]
        counterpart_view: PathBuf,
        /// Counterpart's spend public key (PEM)
        #[arg(long)]
        counterpart_spend: PathBuf,
        /// Counterpart's ephemeral public key (PEM); defaults to the wallet's record
        #[arg(long)]
        counterpart_ephemeral: Option<PathBuf>,
    },

    /// Recompute a blinded secret a counterpart derived against this wallet
    RecoverBlind {
        /// X coordinate of the counterpart's R (hex)
        #[arg(long)]
        rx: String,
        /// Y coordinate of the counterpart's R (hex)
        #[arg(long)]
        ry: String,
        /// Counterpart's view public key (PEM)
        #[arg(long)]
        counterpart_view: PathBuf,
        /// Counterpart's spend public key (PEM)
        #[arg(long)]
        counterpart_spend: PathBuf,
    },

    /// Print the sender identifier of the wallet's spend key
    SenderId {
        /// Timestamp string (defaults to now, RFC 3339)
        #[arg(short, long)]
        timestamp: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env must be loaded before clap reads env fallbacks
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let config = CliConfig {
        wallet_dir: cli.wallet_dir,
        scheme: cli.scheme,
        verbose: cli.verbose,
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| config.log_filter().into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    if config.scheme.is_legacy() {
        warn!("legacy hash scheme selected: one-time keys carry about 128 bits of entropy");
    }

    match cli.command {
        Commands::Keygen { force } => cmd_keygen(&config, force).await,
        Commands::Address { key } => cmd_address(&config, key.as_deref()).await,
        Commands::Send {
            view_pub,
            spend_pub,
            json,
        } => cmd_send(&config, &view_pub, &spend_pub, json).await,
        Commands::Receive { rx, ry, expect } => cmd_receive(&config, &rx, &ry, expect).await,
        Commands::Blind {
            counterpart_view,
            counterpart_spend,
            counterpart_ephemeral,
        } => {
            cmd_blind(
                &config,
                &counterpart_view,
                &counterpart_spend,
                counterpart_ephemeral.as_deref(),
            )
            .await
        }
        Commands::RecoverBlind {
            rx,
            ry,
            counterpart_view,
            counterpart_spend,
        } => cmd_recover_blind(&config, &rx, &ry, &counterpart_view, &counterpart_spend).await,
        Commands::SenderId { timestamp } => cmd_sender_id(&config, timestamp).await,
    }
}

/// Generate wallet keys
async fn cmd_keygen(config: &CliConfig, force: bool) -> Result<()> {
    println!("{}", "🔑 Generating DKSAP keys...".cyan().bold());

    let store = config.key_store();
    if !force && (store.exists(VIEW_KEY_NAME).await? || store.exists(SPEND_KEY_NAME).await?) {
        bail!(
            "wallet {} already has keys (use --force to overwrite)",
            store.dir().display()
        );
    }

    let view = KeyPair::generate();
    let spend = KeyPair::generate();
    store
        .save_key_pair(VIEW_KEY_NAME, &view)
        .await
        .context("Failed to save view key")?;
    store
        .save_key_pair(SPEND_KEY_NAME, &spend)
        .await
        .context("Failed to save spend key")?;
    store
        .save_ephemeral(&EphemeralRecord::generate())
        .await
        .context("Failed to save ephemeral record")?;

    info!(dir = ?store.dir(), "Wallet initialized");

    println!("{} {}", "✅ Keys saved to:".green(), store.dir().display());
    println!("   {} {}", "View public:".green(), store.public_key_path(VIEW_KEY_NAME).display());
    println!("   {} {}", "Spend public:".green(), store.public_key_path(SPEND_KEY_NAME).display());
    println!(
        "   {} {}",
        "Address:".green(),
        encode_address(spend.public(), config.scheme)
    );
    println!("\n{}", "⚠️  IMPORTANT: Keep keyA.pem and keyB.pem private!".red().bold());

    Ok(())
}

/// Print an address
async fn cmd_address(config: &CliConfig, key: Option<&Path>) -> Result<()> {
    let point = match key {
        Some(path) => read_public_key(path).await?,
        None => config
            .key_store()
            .load_public(SPEND_KEY_NAME)
            .await
            .context("Failed to load spend public key (run `dksap keygen` first)")?,
    };

    println!("{}", encode_address(&point, config.scheme));
    Ok(())
}

/// Derive a one-time key for a recipient
async fn cmd_send(config: &CliConfig, view_pub: &Path, spend_pub: &Path, json: bool) -> Result<()> {
    let meta = MetaAddress::new(
        read_public_key(view_pub).await?,
        read_public_key(spend_pub).await?,
    );
    let otk = create_one_time_key(&meta, config.scheme).context("Failed to derive one-time key")?;
    let address = otk.address(config.scheme);

    if json {
        let output = serde_json::json!({
            "scheme": config.scheme.as_str(),
            "one_time_key": {
                "x": hex::encode(otk.key().x_bytes()),
                "y": hex::encode(otk.key().y_bytes()),
            },
            "ephemeral": {
                "x": hex::encode(otk.ephemeral_public().x_bytes()),
                "y": hex::encode(otk.ephemeral_public().y_bytes()),
            },
            "address": address,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{}", "💸 One-time key created:".green().bold());
    print_point("P", otk.key());
    println!("   {} {}", "Address:".green(), address);
    println!("\n{}", "📋 Publish R:".yellow().bold());
    print_point("R", otk.ephemeral_public());

    Ok(())
}

/// Recover a one-time key
async fn cmd_receive(config: &CliConfig, rx: &str, ry: &str, expect: Option<String>) -> Result<()> {
    let identity = load_identity(&config.key_store()).await?;
    let ephemeral =
        PublicPoint::from_hex_coordinates(rx, ry).context("Invalid ephemeral point R")?;

    let key = identity
        .recover_one_time_key(&ephemeral, config.scheme)
        .context("Failed to recover one-time key")?;
    let address = encode_address(&key, config.scheme);

    println!("{}", "🔎 Recovered one-time key:".cyan().bold());
    print_point("P'", &key);
    println!("   {} {}", "Address:".green(), address);

    if let Some(expected) = expect {
        let expected: Address = expected.parse().context("Invalid expected address")?;
        if !address_matches(&expected, &key, config.scheme) {
            bail!("recovered key does not match address {expected}");
        }
        println!("   {} address matches", "✅".green());
    }

    Ok(())
}

/// Derive a blinded secret with a counterpart
async fn cmd_blind(
    config: &CliConfig,
    counterpart_view: &Path,
    counterpart_spend: &Path,
    counterpart_ephemeral: Option<&Path>,
) -> Result<()> {
    let store = config.key_store();
    let identity = load_identity(&store).await?;
    let view = read_public_key(counterpart_view).await?;
    let spend = read_public_key(counterpart_spend).await?;

    let ephemeral = match counterpart_ephemeral {
        Some(path) => read_public_key(path).await?,
        None => *store
            .load_ephemeral()
            .await
            .context("Failed to load ephemeral record from wallet")?
            .public(),
    };

    let channel = identity
        .establish_channel(&spend)
        .context("Failed to establish channel")?;
    let (blinded, previous) = identity
        .derive_blinded_secret(&channel, &view, &ephemeral)
        .context("Failed to derive blinded secret")?;

    store
        .save_ephemeral(blinded.ephemeral())
        .await
        .context("Failed to save ephemeral record")?;
    info!(replaced = previous.is_some(), "Ephemeral record rotated");

    println!("{}", "🔐 Blinded secret derived".green().bold());
    println!("\n{}", "📋 Publish R:".yellow().bold());
    print_point("R", blinded.ephemeral_public());

    Ok(())
}

/// Recompute a blinded secret from the counterpart's R
async fn cmd_recover_blind(
    config: &CliConfig,
    rx: &str,
    ry: &str,
    counterpart_view: &Path,
    counterpart_spend: &Path,
) -> Result<()> {
    let identity = load_identity(&config.key_store()).await?;
    if identity.ephemeral().is_none() {
        bail!("wallet has no ephemeral record (run `dksap keygen` first)");
    }
    let ephemeral =
        PublicPoint::from_hex_coordinates(rx, ry).context("Invalid ephemeral point R")?;
    let view = read_public_key(counterpart_view).await?;
    let spend = read_public_key(counterpart_spend).await?;

    let secret = identity
        .recover_blinded_secret(&ephemeral, &view, &spend)
        .context("Failed to recover blinded secret")?;

    println!("{}", "🔐 Blinded secret recovered".green().bold());
    // K is secret; only a fingerprint is shown for comparison
    println!(
        "   {} {}",
        "Fingerprint:".green(),
        &dksap_crypto::hash::sha256_hex(&secret.to_uncompressed())[..16]
    );
    Ok(())
}

/// Print the sender identifier
async fn cmd_sender_id(config: &CliConfig, timestamp: Option<String>) -> Result<()> {
    let spend = config
        .key_store()
        .load_public(SPEND_KEY_NAME)
        .await
        .context("Failed to load spend public key (run `dksap keygen` first)")?;
    let timestamp = timestamp.unwrap_or_else(|| chrono::Utc::now().to_rfc3339());

    let id = dksap_stealth::derive_sender_id(&spend, &timestamp, config.scheme);
    println!("   {} {}", "Timestamp:".green(), timestamp);
    println!("   {} {}", "Sender id:".green(), id);
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════════
// HELPERS
// ═══════════════════════════════════════════════════════════════════════════════

async fn read_public_key(path: &Path) -> Result<PublicPoint> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    decode_public_key(&text).with_context(|| format!("Invalid public key in {}", path.display()))
}

async fn load_identity(store: &FileKeyStore) -> Result<Identity> {
    let view = store
        .load_key_pair(VIEW_KEY_NAME)
        .await
        .context("Failed to load view key (run `dksap keygen` first)")?;
    let spend = store
        .load_key_pair(SPEND_KEY_NAME)
        .await
        .context("Failed to load spend key (run `dksap keygen` first)")?;
    let identity = Identity::new(view, spend)?;

    // Only a missing randomKey means "no record"; anything else is an error
    let path = store.ephemeral_path();
    let present = tokio::fs::try_exists(&path)
        .await
        .with_context(|| format!("Failed to check {}", path.display()))?;
    if !present {
        return Ok(identity);
    }

    let record = store
        .load_ephemeral()
        .await
        .with_context(|| format!("Failed to load ephemeral record from {}", path.display()))?;
    Ok(identity.with_ephemeral(record))
}

fn print_point(label: &str, point: &PublicPoint) {
    println!("   {} {}", format!("{label}x:").green(), hex::encode(point.x_bytes()));
    println!("   {} {}", format!("{label}y:").green(), hex::encode(point.y_bytes()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_options() {
        let cli = Cli::try_parse_from([
            "dksap",
            "--scheme",
            "legacy",
            "--wallet-dir",
            "/tmp/w",
            "sender-id",
            "--timestamp",
            "1700000000",
        ])
        .unwrap();

        assert_eq!(cli.scheme, HashScheme::Legacy);
        assert_eq!(cli.wallet_dir, PathBuf::from("/tmp/w"));
        assert!(matches!(
            cli.command,
            Commands::SenderId { timestamp: Some(ref t) } if t == "1700000000"
        ));
    }

    #[test]
    fn test_unknown_scheme_rejected() {
        assert!(Cli::try_parse_from(["dksap", "--scheme", "md5", "keygen"]).is_err());
    }

    async fn wallet_with_keys(dir: &Path) -> FileKeyStore {
        let store = FileKeyStore::new(dir);
        store
            .save_key_pair(VIEW_KEY_NAME, &KeyPair::generate())
            .await
            .unwrap();
        store
            .save_key_pair(SPEND_KEY_NAME, &KeyPair::generate())
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_load_identity_without_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = wallet_with_keys(dir.path()).await;

        let identity = load_identity(&store).await.unwrap();
        assert!(identity.ephemeral().is_none());
    }

    #[tokio::test]
    async fn test_load_identity_with_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = wallet_with_keys(dir.path()).await;
        let record = EphemeralRecord::generate();
        store.save_ephemeral(&record).await.unwrap();

        let identity = load_identity(&store).await.unwrap();
        assert_eq!(identity.ephemeral(), Some(record));
    }

    #[tokio::test]
    async fn test_load_identity_rejects_corrupt_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = wallet_with_keys(dir.path()).await;
        std::fs::write(store.ephemeral_path(), "zz\n1\n2\n").unwrap();

        let err = load_identity(&store).await.unwrap_err();
        assert!(format!("{err:#}").contains("ephemeral record"));
    }

    #[test]
    fn test_recover_blind_arguments() {
        let cli = Cli::try_parse_from([
            "dksap",
            "recover-blind",
            "--rx",
            "1",
            "--ry",
            "2",
            "--counterpart-view",
            "pub_keyA.pem",
            "--counterpart-spend",
            "pub_keyB.pem",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::RecoverBlind { .. }));
    }

    #[test]
    fn test_blind_ephemeral_is_optional() {
        let cli = Cli::try_parse_from([
            "dksap",
            "blind",
            "--counterpart-view",
            "pub_keyA.pem",
            "--counterpart-spend",
            "pub_keyB.pem",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Blind { counterpart_ephemeral: None, .. }
        ));
    }
}
