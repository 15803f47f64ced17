//! Sender identifiers.
//!
//! A sender identifier binds a spend point to a caller-supplied timestamp:
//!
//! ```text
//! Standard:  SHA256(X || Y || timestamp)              (32-byte big-endian coordinates)
//! Legacy:    SHA256(hex(X) || hex(Y) || timestamp)    (unpadded lowercase hex text)
//! ```

use dksap_core::types::{HashScheme, PublicPoint, SenderId};
use dksap_crypto::hash::{sha256, sha256_multi, unpadded_hex};

/// Derives the sender identifier of `spend_public` at `timestamp`.
///
/// The timestamp is opaque text; its format is the caller's choice.
pub fn derive_sender_id(
    spend_public: &PublicPoint,
    timestamp: &str,
    scheme: HashScheme,
) -> SenderId {
    let (x, y) = (spend_public.x_bytes(), spend_public.y_bytes());
    let digest = match scheme {
        HashScheme::Standard => sha256_multi(&[&x[..], &y[..], timestamp.as_bytes()]),
        HashScheme::Legacy => {
            let text = format!("{}{}{}", unpadded_hex(&x), unpadded_hex(&y), timestamp);
            sha256(text.as_bytes())
        }
    };
    SenderId::from_array(digest)
}
