//! Protocol constants for DKSAP.
//!
//! All sizes follow from the NIST P-256 curve (32-byte field elements and
//! scalars) and the Bitcoin-style address layout.

// ═══════════════════════════════════════════════════════════════════════════════
// CURVE SIZES (NIST P-256)
// ═══════════════════════════════════════════════════════════════════════════════

/// Size of a big-endian scalar in bytes.
pub const SCALAR_SIZE: usize = 32;

/// Size of one affine coordinate in bytes.
pub const COORDINATE_SIZE: usize = 32;

/// Size of an uncompressed SEC1 point (`0x04 || X || Y`).
pub const UNCOMPRESSED_POINT_SIZE: usize = 1 + 2 * COORDINATE_SIZE;

// ═══════════════════════════════════════════════════════════════════════════════
// ADDRESS LAYOUT
// ═══════════════════════════════════════════════════════════════════════════════

/// Version byte prepended to the public key hash.
pub const ADDRESS_VERSION: u8 = 0x01;

/// Size of the RIPEMD-160 public key hash.
pub const PUBKEY_HASH_SIZE: usize = 20;

/// Number of leading bytes of the double SHA-256 kept as checksum.
pub const CHECKSUM_SIZE: usize = 4;

/// Decoded address size: version + hash + checksum.
pub const ADDRESS_PAYLOAD_SIZE: usize = 1 + PUBKEY_HASH_SIZE + CHECKSUM_SIZE;

/// Size of a sender identifier (SHA-256 output).
pub const SENDER_ID_SIZE: usize = 32;

// ═══════════════════════════════════════════════════════════════════════════════
// DOMAIN SEPARATORS
// ═══════════════════════════════════════════════════════════════════════════════
// Hash-to-scalar inputs are prefixed so the one-time key hash can never
// collide with any other SHA-256 use in the protocol.

/// Domain separator for the standard one-time key hash.
pub const DOMAIN_ONE_TIME_KEY: &[u8] = b"DKSAP_ONE_TIME_KEY_V1";

// ═══════════════════════════════════════════════════════════════════════════════
// KEY FILES
// ═══════════════════════════════════════════════════════════════════════════════

/// PEM label written for SEC1 private keys.
pub const PEM_LABEL_EC_PRIVATE: &str = "EC PRIVATE KEY";

/// PEM label written for SubjectPublicKeyInfo public keys.
pub const PEM_LABEL_PUBLIC: &str = "PUBLIC KEY";

/// PEM label of PKCS#8 private keys (accepted on load).
pub const PEM_LABEL_PKCS8_PRIVATE: &str = "PRIVATE KEY";

/// Legacy PEM label for SEC1 private keys (accepted on load).
pub const PEM_LABEL_LEGACY_PRIVATE: &str = "ECC PRIVATE KEY";

/// Legacy PEM label for SubjectPublicKeyInfo public keys (accepted on load).
pub const PEM_LABEL_LEGACY_PUBLIC: &str = "ECC PUBLIC KEY";

/// Key name of the view pair in a wallet.
pub const VIEW_KEY_NAME: &str = "A";

/// Key name of the spend pair in a wallet.
pub const SPEND_KEY_NAME: &str = "B";

/// File name of the persisted ephemeral record.
pub const EPHEMERAL_FILE_NAME: &str = "randomKey";

/// Default wallet directory.
pub const DEFAULT_WALLET_DIR: &str = "wallet";

/// File name of the private key named `name`.
pub fn private_key_file_name(name: &str) -> String {
    format!("key{name}.pem")
}

/// File name of the public key named `name`.
pub fn public_key_file_name(name: &str) -> String {
    format!("pub_key{name}.pem")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_layout() {
        assert_eq!(ADDRESS_PAYLOAD_SIZE, 25);
        assert_eq!(UNCOMPRESSED_POINT_SIZE, 65);
    }

    #[test]
    fn test_key_file_names() {
        assert_eq!(private_key_file_name(VIEW_KEY_NAME), "keyA.pem");
        assert_eq!(public_key_file_name(SPEND_KEY_NAME), "pub_keyB.pem");
    }

    #[test]
    fn test_pem_labels_distinct() {
        let labels = [
            PEM_LABEL_EC_PRIVATE,
            PEM_LABEL_PUBLIC,
            PEM_LABEL_PKCS8_PRIVATE,
            PEM_LABEL_LEGACY_PRIVATE,
            PEM_LABEL_LEGACY_PUBLIC,
        ];
        for (i, a) in labels.iter().enumerate() {
            for b in &labels[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
