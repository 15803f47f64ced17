//! Shared channel establishment.
//!
//! Two identities agree on the Diffie-Hellman point `a*B == b*A`, where `a`
//! is a view scalar and `B` a spend point.
//!
//! The canonical side is the holder of the view scalar, who computes `a*B`
//! with [`establish_channel`]. The holder of the spend scalar computes the
//! same point as `b*A` with [`establish_channel_mirror`]. Both return an
//! identical [`Channel`].

use dksap_core::error::Result;
use dksap_core::types::{Channel, KeyPair, PublicPoint};
use dksap_crypto::curve::{scalar_mult, CurvePoint};

/// Establishes a channel as the view-key holder: `secret = a * B`.
///
/// # Errors
/// Returns `InvalidScalar` if `view` carries no private scalar.
pub fn establish_channel(view: &KeyPair, counterpart_spend: &PublicPoint) -> Result<Channel> {
    let a = view.require_private()?;
    let secret = scalar_mult(&CurvePoint::from(counterpart_spend), a)?.to_public()?;
    Ok(Channel::new(secret, *view.public(), *counterpart_spend))
}

/// Establishes the same channel as the spend-key holder: `secret = b * A`.
///
/// # Errors
/// Returns `InvalidScalar` if `spend` carries no private scalar.
pub fn establish_channel_mirror(
    spend: &KeyPair,
    counterpart_view: &PublicPoint,
) -> Result<Channel> {
    let b = spend.require_private()?;
    let secret = scalar_mult(&CurvePoint::from(counterpart_view), b)?.to_public()?;
    Ok(Channel::new(secret, *counterpart_view, *spend.public()))
}
