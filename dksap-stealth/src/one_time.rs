//! Stealth one-time keys.
//!
//! ## Sender
//!
//! ```text
//! r <- [1, N-1],  R = r * G
//! S = r * A
//! h = HashToScalar(S.x)
//! P = h * G + B
//! ```
//!
//! ## Recipient
//!
//! ```text
//! S' = a * R          (== r * a * G == S)
//! h' = HashToScalar(S'.x)
//! P' = h' * G + B     (== P)
//! p  = h' + b         (p * G == P, spends P)
//! ```

use p256::NonZeroScalar;
use subtle::ConstantTimeEq;

use dksap_core::error::{DksapError, Result};
use dksap_core::types::{
    Address, EphemeralRecord, HashScheme, MetaAddress, PrivateScalar, PublicPoint,
};
use dksap_crypto::curve::{add, random_scalar, scalar_base_mult, scalar_mult, CurvePoint};
use dksap_crypto::{encode_address, hash_to_scalar};

/// A one-time destination key together with the ephemeral pair that produced it.
#[derive(Clone, PartialEq, Eq)]
pub struct OneTimeKey {
    key: PublicPoint,
    ephemeral: EphemeralRecord,
}

impl OneTimeKey {
    /// The one-time public key `P`.
    pub fn key(&self) -> &PublicPoint {
        &self.key
    }

    /// The ephemeral record `(r, R)`.
    pub fn ephemeral(&self) -> &EphemeralRecord {
        &self.ephemeral
    }

    /// The ephemeral point `R` the recipient needs.
    pub fn ephemeral_public(&self) -> &PublicPoint {
        self.ephemeral.public()
    }

    /// The Base58 address of `P`.
    pub fn address(&self, scheme: HashScheme) -> Address {
        encode_address(&self.key, scheme)
    }
}

impl std::fmt::Debug for OneTimeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OneTimeKey")
            .field("key", &self.key)
            .field("ephemeral", &self.ephemeral)
            .finish()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SENDER SIDE
// ═══════════════════════════════════════════════════════════════════════════════

/// Derives a one-time key for `recipient` with a fresh random `r`.
pub fn create_one_time_key(recipient: &MetaAddress, scheme: HashScheme) -> Result<OneTimeKey> {
    derive_one_time_key(random_scalar(), recipient, scheme)
}

/// Derives the one-time key for `recipient` from a caller-chosen `r`.
///
/// # Errors
/// Returns `InvalidScalar` if the hash reduces to zero and `InvalidPoint` if
/// `P` would be the point at infinity.
pub fn derive_one_time_key(
    r: PrivateScalar,
    recipient: &MetaAddress,
    scheme: HashScheme,
) -> Result<OneTimeKey> {
    let shared = scalar_mult(&CurvePoint::from(recipient.view), &r)?.to_public()?;
    let key = key_from_shared(&shared, &recipient.spend, scheme)?;

    Ok(OneTimeKey {
        key,
        ephemeral: EphemeralRecord::from_scalar(r),
    })
}

// ═══════════════════════════════════════════════════════════════════════════════
// RECIPIENT SIDE
// ═══════════════════════════════════════════════════════════════════════════════

/// Recomputes `P'` from the published `R`, the view scalar `a` and spend point `B`.
pub fn recover_one_time_key(
    ephemeral: &PublicPoint,
    view_private: &PrivateScalar,
    spend_public: &PublicPoint,
    scheme: HashScheme,
) -> Result<PublicPoint> {
    let shared = scalar_mult(&CurvePoint::from(ephemeral), view_private)?.to_public()?;
    key_from_shared(&shared, spend_public, scheme)
}

/// Recovers the private scalar `p = h' + b` controlling the one-time key.
///
/// # Errors
/// Returns `InvalidScalar` if `h' + b` is zero modulo `N`.
pub fn recover_one_time_private(
    ephemeral: &PublicPoint,
    view_private: &PrivateScalar,
    spend_private: &PrivateScalar,
    scheme: HashScheme,
) -> Result<PrivateScalar> {
    let shared = scalar_mult(&CurvePoint::from(ephemeral), view_private)?.to_public()?;
    let h = hash_to_scalar(scheme, &shared.x_bytes())?;
    let sum = *h.as_scalar() + spend_private.as_scalar();

    Option::<NonZeroScalar>::from(NonZeroScalar::new(sum))
        .map(PrivateScalar::from_nonzero)
        .ok_or_else(|| DksapError::InvalidScalar("one-time private scalar is zero".into()))
}

/// Checks in constant time whether `key` was derived for this recipient.
pub fn is_one_time_key_for(
    key: &PublicPoint,
    ephemeral: &PublicPoint,
    view_private: &PrivateScalar,
    spend_public: &PublicPoint,
    scheme: HashScheme,
) -> Result<bool> {
    let expected = recover_one_time_key(ephemeral, view_private, spend_public, scheme)?;
    Ok(expected.ct_eq(key).into())
}

fn key_from_shared(
    shared: &PublicPoint,
    spend_public: &PublicPoint,
    scheme: HashScheme,
) -> Result<PublicPoint> {
    let h = hash_to_scalar(scheme, &shared.x_bytes())?;
    add(&scalar_base_mult(&h), &CurvePoint::from(spend_public)).to_public()
}
