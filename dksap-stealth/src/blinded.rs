//! Blinded secret derivation on top of a channel.
//!
//! ## Algorithm
//!
//! ```text
//! r  <- [1, N-1]
//! R  = r * G
//! T1 = r * B_channel + secret_channel
//! T2 = b * (A_counterpart + R_counterpart)
//! K  = T1 - T2
//! ```
//!
//! Only `R` is published. `r` is kept by the caller (usually stored as the
//! identity's new ephemeral record) and `K` stays secret.
//!
//! The counterpart, holding `a'`, `b'` and its own record `r'`, recomputes
//! the same point from the published `R` and the sender's public keys:
//!
//! ```text
//! K = b' * (R + A) - (a' + r') * B
//! ```

use dksap_core::error::{DksapError, Result};
use dksap_core::types::{Channel, EphemeralRecord, PrivateScalar, PublicPoint};
use dksap_crypto::curve::{add, random_scalar, scalar_mult, subtract, CurvePoint};

/// Output of a blinded secret derivation: `K` plus the fresh `(r, R)`.
#[derive(Clone, PartialEq, Eq)]
pub struct BlindedSecret {
    secret: PublicPoint,
    ephemeral: EphemeralRecord,
}

impl BlindedSecret {
    /// The blinded point `K`.
    pub fn secret(&self) -> &PublicPoint {
        &self.secret
    }

    /// The fresh ephemeral record `(r, R)`.
    pub fn ephemeral(&self) -> &EphemeralRecord {
        &self.ephemeral
    }

    /// The publishable ephemeral point `R`.
    pub fn ephemeral_public(&self) -> &PublicPoint {
        self.ephemeral.public()
    }

    /// Splits into `K` and the ephemeral record.
    pub fn into_parts(self) -> (PublicPoint, EphemeralRecord) {
        (self.secret, self.ephemeral)
    }
}

impl std::fmt::Debug for BlindedSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlindedSecret")
            .field("secret", &"[REDACTED]")
            .field("ephemeral", &self.ephemeral)
            .finish()
    }
}

/// Derives a blinded secret with a fresh random `r`.
///
/// # Arguments
///
/// * `channel` - The established channel
/// * `spend_private` - The local spend scalar `b`
/// * `counterpart_view` - The counterpart's view point
/// * `counterpart_ephemeral` - The counterpart's stored ephemeral point
pub fn derive_blinded_secret(
    channel: &Channel,
    spend_private: &PrivateScalar,
    counterpart_view: &PublicPoint,
    counterpart_ephemeral: &PublicPoint,
) -> Result<BlindedSecret> {
    derive_blinded_secret_with(
        random_scalar(),
        channel,
        spend_private,
        counterpart_view,
        counterpart_ephemeral,
    )
}

/// Derives a blinded secret for a caller-chosen `r`.
///
/// # Errors
/// Returns `InvalidPoint` if the counterpart's view and ephemeral points
/// cancel out, or if `K` is the point at infinity.
pub fn derive_blinded_secret_with(
    r: PrivateScalar,
    channel: &Channel,
    spend_private: &PrivateScalar,
    counterpart_view: &PublicPoint,
    counterpart_ephemeral: &PublicPoint,
) -> Result<BlindedSecret> {
    let t1 = add(
        &scalar_mult(&CurvePoint::from(channel.spend_public()), &r)?,
        &CurvePoint::from(channel.secret()),
    );

    let base = add(
        &CurvePoint::from(counterpart_view),
        &CurvePoint::from(counterpart_ephemeral),
    );
    if base.is_identity() {
        return Err(DksapError::InvalidPoint(
            "counterpart view and ephemeral points cancel out".into(),
        ));
    }
    let t2 = scalar_mult(&base, spend_private)?;

    let secret = subtract(&t1, &t2)?
        .to_public()
        .map_err(|_| DksapError::InvalidPoint("blinded secret is the point at infinity".into()))?;

    Ok(BlindedSecret {
        secret,
        ephemeral: EphemeralRecord::from_scalar(r),
    })
}

/// Recomputes the blinded secret on the counterpart's side.
///
/// The caller is the party whose view point, spend point and ephemeral point
/// went into [`derive_blinded_secret`]. It supplies its own scalars and the
/// deriving party's `R`, `A` and `B`.
///
/// # Errors
/// Returns `InvalidPoint` if `R + A` or `(a' + r') * B` is the point at
/// infinity, or if `K` is.
pub fn recover_blinded_secret(
    ephemeral: &PublicPoint,
    counterpart_view: &PublicPoint,
    counterpart_spend: &PublicPoint,
    own_view: &PrivateScalar,
    own_spend: &PrivateScalar,
    own_ephemeral: &PrivateScalar,
) -> Result<PublicPoint> {
    let base = add(&CurvePoint::from(ephemeral), &CurvePoint::from(counterpart_view));
    if base.is_identity() {
        return Err(DksapError::InvalidPoint(
            "ephemeral and view points cancel out".into(),
        ));
    }
    let t1 = scalar_mult(&base, own_spend)?;

    let spend = CurvePoint::from(counterpart_spend);
    let t2 = add(&scalar_mult(&spend, own_view)?, &scalar_mult(&spend, own_ephemeral)?);
    if t2.is_identity() {
        return Err(DksapError::InvalidPoint(
            "own view and ephemeral scalars cancel out".into(),
        ));
    }

    subtract(&t1, &t2)?
        .to_public()
        .map_err(|_| DksapError::InvalidPoint("blinded secret is the point at infinity".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::establish_channel;
    use dksap_core::types::KeyPair;
    use dksap_crypto::curve::{negate, scalar_base_mult};

    struct Fixture {
        channel: Channel,
        spend: KeyPair,
        counterpart_view: PublicPoint,
        counterpart_ephemeral: PublicPoint,
    }

    fn fixture() -> Fixture {
        let view = KeyPair::generate();
        let spend = KeyPair::generate();
        let channel = establish_channel(&view, spend.public()).unwrap();
        Fixture {
            channel,
            spend,
            counterpart_view: *KeyPair::generate().public(),
            counterpart_ephemeral: *EphemeralRecord::generate().public(),
        }
    }

    #[test]
    fn test_matches_formula() {
        let f = fixture();
        let r = random_scalar();
        let b = f.spend.private().unwrap();
        let out = derive_blinded_secret_with(
            r.clone(),
            &f.channel,
            b,
            &f.counterpart_view,
            &f.counterpart_ephemeral,
        )
        .unwrap();

        let t1 = f.channel.spend_public().to_projective() * r.as_scalar()
            + f.channel.secret().to_projective();
        let t2 = (f.counterpart_view.to_projective() + f.counterpart_ephemeral.to_projective())
            * b.as_scalar();
        assert_eq!(out.secret().to_projective(), t1 - t2);
        assert_eq!(out.ephemeral().scalar(), &r);
        assert_eq!(*out.ephemeral_public(), r.public_point());
    }

    #[test]
    fn test_deterministic_for_fixed_r() {
        let f = fixture();
        let r = random_scalar();
        let b = f.spend.private().unwrap();
        let first = derive_blinded_secret_with(
            r.clone(),
            &f.channel,
            b,
            &f.counterpart_view,
            &f.counterpart_ephemeral,
        )
        .unwrap();
        let second = derive_blinded_secret_with(
            r,
            &f.channel,
            b,
            &f.counterpart_view,
            &f.counterpart_ephemeral,
        )
        .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_fresh_r_each_call() {
        let f = fixture();
        let b = f.spend.private().unwrap();
        let first =
            derive_blinded_secret(&f.channel, b, &f.counterpart_view, &f.counterpart_ephemeral)
                .unwrap();
        let second =
            derive_blinded_secret(&f.channel, b, &f.counterpart_view, &f.counterpart_ephemeral)
                .unwrap();
        assert_ne!(first.ephemeral_public(), second.ephemeral_public());
        assert_ne!(first.secret(), second.secret());
    }

    #[test]
    fn test_cancelling_counterpart_points_rejected() {
        let f = fixture();
        let neg_view = negate(&CurvePoint::from(f.counterpart_view))
            .unwrap()
            .to_public()
            .unwrap();
        let result = derive_blinded_secret(
            &f.channel,
            f.spend.private().unwrap(),
            &f.counterpart_view,
            &neg_view,
        );
        assert!(matches!(result, Err(DksapError::InvalidPoint(_))));
    }

    #[test]
    fn test_identity_output_rejected() {
        // Pick the channel secret so that T1 == T2
        let f = fixture();
        let r = random_scalar();
        let b = f.spend.private().unwrap();
        let t2 = (f.counterpart_view.to_projective() + f.counterpart_ephemeral.to_projective())
            * b.as_scalar();
        let r_b = f.channel.spend_public().to_projective() * r.as_scalar();
        let secret = CurvePoint::from_projective(t2 - r_b).to_public().unwrap();
        let rigged = Channel::new(secret, *f.channel.view_public(), *f.channel.spend_public());

        let result = derive_blinded_secret_with(
            r,
            &rigged,
            b,
            &f.counterpart_view,
            &f.counterpart_ephemeral,
        );
        assert!(matches!(result, Err(DksapError::InvalidPoint(_))));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let f = fixture();
        let out = derive_blinded_secret(
            &f.channel,
            f.spend.private().unwrap(),
            &f.counterpart_view,
            &f.counterpart_ephemeral,
        )
        .unwrap();
        assert!(format!("{:?}", out).contains("REDACTED"));
        let expected = scalar_base_mult(out.ephemeral().scalar());
        assert_eq!(expected.to_public().unwrap(), *out.ephemeral_public());
    }

    #[test]
    fn test_counterpart_recovers_same_secret() {
        // Alice derives against Bob's keys and stored record, Bob recomputes
        let alice_view = KeyPair::generate();
        let alice_spend = KeyPair::generate();
        let bob_view = KeyPair::generate();
        let bob_spend = KeyPair::generate();
        let bob_record = EphemeralRecord::generate();

        let channel = establish_channel(&alice_view, bob_spend.public()).unwrap();
        let out = derive_blinded_secret(
            &channel,
            alice_spend.private().unwrap(),
            bob_view.public(),
            bob_record.public(),
        )
        .unwrap();

        let recovered = recover_blinded_secret(
            out.ephemeral_public(),
            alice_view.public(),
            alice_spend.public(),
            bob_view.private().unwrap(),
            bob_spend.private().unwrap(),
            bob_record.scalar(),
        )
        .unwrap();
        assert_eq!(&recovered, out.secret());
    }

    #[test]
    fn test_recover_rejects_cancelling_points() {
        let alice = KeyPair::generate();
        let bob = KeyPair::generate();
        let neg_view = negate(&CurvePoint::from(alice.public()))
            .unwrap()
            .to_public()
            .unwrap();

        let result = recover_blinded_secret(
            &neg_view,
            alice.public(),
            alice.public(),
            bob.private().unwrap(),
            bob.private().unwrap(),
            &random_scalar(),
        );
        assert!(matches!(result, Err(DksapError::InvalidPoint(_))));
    }
}
