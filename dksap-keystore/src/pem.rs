//! PEM encoding of key pairs.
//!
//! Private keys are written as SEC1 `EC PRIVATE KEY` documents carrying the
//! P-256 namedCurve parameters and the public point. Public keys are written
//! as SubjectPublicKeyInfo `PUBLIC KEY` documents. On load the legacy labels
//! `ECC PRIVATE KEY` / `ECC PUBLIC KEY` and PKCS#8 `PRIVATE KEY` are accepted
//! too. A document naming any other curve is rejected.

use p256::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePublicKey};
use p256::{PublicKey, SecretKey};
use pem_rfc7468::LineEnding;
use sec1::der::asn1::ObjectIdentifier;
use sec1::der::{Decode, Encode};
use sec1::{EcParameters, EcPrivateKey};
use zeroize::Zeroizing;

use dksap_core::constants::{
    PEM_LABEL_EC_PRIVATE, PEM_LABEL_LEGACY_PRIVATE, PEM_LABEL_LEGACY_PUBLIC,
    PEM_LABEL_PKCS8_PRIVATE, PEM_LABEL_PUBLIC,
};
use dksap_core::error::{DksapError, Result};
use dksap_core::types::{PrivateScalar, PublicPoint};

/// secp256r1 (1.2.840.10045.3.1.7)
pub const NIST_P256_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.3.1.7");

/// Encodes a private scalar as a SEC1 PEM document.
pub fn encode_private_key(scalar: &PrivateScalar) -> Result<Zeroizing<String>> {
    let private_key = Zeroizing::new(scalar.to_bytes());
    let public_key = scalar.public_point().to_uncompressed();

    let document = EcPrivateKey {
        private_key: &private_key[..],
        parameters: Some(EcParameters::NamedCurve(NIST_P256_OID)),
        public_key: Some(&public_key[..]),
    };
    let der = Zeroizing::new(
        document
            .to_der()
            .map_err(|e| DksapError::PersistenceFailure(format!("SEC1 encoding failed: {e}")))?,
    );

    pem_rfc7468::encode_string(PEM_LABEL_EC_PRIVATE, LineEnding::LF, &der)
        .map(Zeroizing::new)
        .map_err(|e| DksapError::PersistenceFailure(format!("PEM encoding failed: {e}")))
}

/// Encodes a public point as a SubjectPublicKeyInfo PEM document.
pub fn encode_public_key(point: &PublicPoint) -> Result<String> {
    point
        .as_public_key()
        .to_public_key_pem(LineEnding::LF)
        .map_err(|e| DksapError::PersistenceFailure(format!("SPKI encoding failed: {e}")))
}

/// Decodes a private key PEM document.
///
/// # Errors
/// Returns `PersistenceFailure` for malformed PEM, an unexpected label, bad
/// DER, or a key on another curve.
pub fn decode_private_key(text: &str) -> Result<PrivateScalar> {
    let (label, der) = decode_document(text)?;
    let der = Zeroizing::new(der);

    match label.as_str() {
        PEM_LABEL_EC_PRIVATE | PEM_LABEL_LEGACY_PRIVATE => decode_sec1(&der),
        PEM_LABEL_PKCS8_PRIVATE => SecretKey::from_pkcs8_der(&der)
            .map(|secret| PrivateScalar::from_nonzero(secret.to_nonzero_scalar()))
            .map_err(|e| persistence("invalid PKCS#8 private key", e)),
        other => Err(DksapError::PersistenceFailure(format!(
            "unexpected PEM label '{other}' for a private key"
        ))),
    }
}

/// Parses SEC1 DER. Missing parameters are tolerated; parameters naming
/// another curve are not. An embedded public point must match the scalar.
fn decode_sec1(der: &[u8]) -> Result<PrivateScalar> {
    let document =
        EcPrivateKey::from_der(der).map_err(|e| persistence("invalid SEC1 private key", e))?;

    match document.parameters {
        None => {}
        Some(EcParameters::NamedCurve(oid)) if oid == NIST_P256_OID => {}
        Some(_) => {
            return Err(DksapError::PersistenceFailure(
                "SEC1 private key is not on P-256".into(),
            ))
        }
    }

    let scalar = PrivateScalar::from_bytes(document.private_key)
        .map_err(|e| persistence("invalid SEC1 private key", e))?;

    if let Some(bytes) = document.public_key {
        let public = PublicPoint::from_sec1_bytes(bytes)
            .map_err(|e| persistence("invalid SEC1 public key", e))?;
        if public != scalar.public_point() {
            return Err(DksapError::PersistenceFailure(
                "SEC1 public key does not match its private key".into(),
            ));
        }
    }

    Ok(scalar)
}

/// Decodes a public key PEM document.
pub fn decode_public_key(text: &str) -> Result<PublicPoint> {
    let (label, der) = decode_document(text)?;

    match label.as_str() {
        PEM_LABEL_PUBLIC | PEM_LABEL_LEGACY_PUBLIC => PublicKey::from_public_key_der(&der)
            .map(PublicPoint::from_public_key)
            .map_err(|e| persistence("invalid public key", e)),
        other => Err(DksapError::PersistenceFailure(format!(
            "unexpected PEM label '{other}' for a public key"
        ))),
    }
}

fn decode_document(text: &str) -> Result<(String, Vec<u8>)> {
    let (label, der) = pem_rfc7468::decode_vec(text.trim().as_bytes())
        .map_err(|e| DksapError::PersistenceFailure(format!("malformed PEM: {e}")))?;
    Ok((label.to_string(), der))
}

fn persistence(what: &str, e: impl std::fmt::Display) -> DksapError {
    DksapError::PersistenceFailure(format!("{what}: {e}"))
}
