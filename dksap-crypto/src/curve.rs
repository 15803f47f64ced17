//! Point arithmetic over P-256.
//!
//! Every derivation in the protocol is a short sequence of the four operations
//! here. Intermediate values are [`CurvePoint`]s, which may be the point at
//! infinity; converting one back to a [`PublicPoint`] fails on the identity,
//! so no derivation can hand out an invalid point.
//!
//! ```text
//! add(P, Q)          = P + Q                 (total)
//! negate(P)          = (P.x, -P.y)           (P must not be the identity)
//! subtract(P, Q)     = add(P, negate(Q))     (may yield the identity)
//! scalar_mult(P, k)  = k * P                 (P must not be the identity)
//! scalar_base_mult(k)= k * G
//! ```

use p256::elliptic_curve::group::Group;
use p256::ProjectivePoint;

use dksap_core::error::{DksapError, Result};
use dksap_core::types::{PrivateScalar, PublicPoint};

// ═══════════════════════════════════════════════════════════════════════════════
// CURVE POINT
// ═══════════════════════════════════════════════════════════════════════════════

/// Intermediate curve point, possibly the identity.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct CurvePoint(ProjectivePoint);

impl CurvePoint {
    /// The point at infinity.
    pub const IDENTITY: Self = Self(ProjectivePoint::IDENTITY);

    /// The base point `G`.
    pub const GENERATOR: Self = Self(ProjectivePoint::GENERATOR);

    /// Wraps a projective point.
    pub fn from_projective(point: ProjectivePoint) -> Self {
        Self(point)
    }

    /// Returns true for the point at infinity.
    pub fn is_identity(&self) -> bool {
        self.0.is_identity().into()
    }

    /// Converts to a validated public point.
    ///
    /// # Errors
    /// Returns `InvalidPoint` if this is the point at infinity.
    pub fn to_public(&self) -> Result<PublicPoint> {
        PublicPoint::from_projective(&self.0)
    }
}

impl From<PublicPoint> for CurvePoint {
    fn from(point: PublicPoint) -> Self {
        Self(point.to_projective())
    }
}

impl From<&PublicPoint> for CurvePoint {
    fn from(point: &PublicPoint) -> Self {
        Self(point.to_projective())
    }
}

impl std::fmt::Debug for CurvePoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.to_public() {
            Ok(point) => write!(f, "CurvePoint({:?})", point),
            Err(_) => write!(f, "CurvePoint(identity)"),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// OPERATIONS
// ═══════════════════════════════════════════════════════════════════════════════

/// Group addition. Total: adding a point to its negation yields the identity.
pub fn add(p: &CurvePoint, q: &CurvePoint) -> CurvePoint {
    CurvePoint(p.0 + q.0)
}

/// Negation: same X coordinate, Y replaced by its field negation.
///
/// # Errors
/// Returns `InvalidPoint` if `p` is the identity.
pub fn negate(p: &CurvePoint) -> Result<CurvePoint> {
    if p.is_identity() {
        return Err(DksapError::InvalidPoint("cannot negate the point at infinity".into()));
    }
    Ok(CurvePoint(-p.0))
}

/// Subtraction as addition of the negation.
///
/// The result is the identity when `p == q`; callers decide whether that is
/// acceptable by converting with [`CurvePoint::to_public`].
pub fn subtract(p: &CurvePoint, q: &CurvePoint) -> Result<CurvePoint> {
    Ok(add(p, &negate(q)?))
}

/// Scalar multiplication `k * P`.
///
/// # Errors
/// Returns `InvalidPoint` if `p` is the identity.
pub fn scalar_mult(p: &CurvePoint, k: &PrivateScalar) -> Result<CurvePoint> {
    if p.is_identity() {
        return Err(DksapError::InvalidPoint(
            "scalar multiplication of the point at infinity".into(),
        ));
    }
    Ok(CurvePoint(p.0 * k.as_scalar()))
}

/// Fixed-base multiplication `k * G`. Never the identity for `k` in `[1, N-1]`.
pub fn scalar_base_mult(k: &PrivateScalar) -> CurvePoint {
    CurvePoint(ProjectivePoint::GENERATOR * k.as_scalar())
}

/// Uniform scalar in `[1, N-1]` from the OS CSPRNG.
pub fn random_scalar() -> PrivateScalar {
    PrivateScalar::random()
}
