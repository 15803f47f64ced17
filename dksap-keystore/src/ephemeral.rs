//! Text encoding of the ephemeral record.
//!
//! # File Format
//!
//! ```text
//! <r  as lowercase hex, no padding>\n
//! <RX as lowercase hex, no padding>\n
//! <RY as lowercase hex, no padding>\n
//! ```
//!
//! Loading also accepts zero-padded hex and surrounding whitespace, and
//! checks that `R == r*G`.

use zeroize::Zeroizing;

use dksap_core::error::{DksapError, Result};
use dksap_core::types::{EphemeralRecord, PrivateScalar, PublicPoint};
use dksap_crypto::hash::unpadded_hex;

/// Encodes an ephemeral record as three lines of hex.
pub fn encode_ephemeral(record: &EphemeralRecord) -> Zeroizing<String> {
    let scalar = Zeroizing::new(record.scalar().to_bytes());
    let public = record.public();
    Zeroizing::new(format!(
        "{}\n{}\n{}\n",
        unpadded_hex(&scalar[..]),
        unpadded_hex(&public.x_bytes()),
        unpadded_hex(&public.y_bytes()),
    ))
}

/// Parses an ephemeral record.
///
/// # Errors
/// `PersistenceFailure` when a line is missing, extra content follows, a
/// value is not hex, or the point does not match the scalar.
pub fn decode_ephemeral(text: &str) -> Result<EphemeralRecord> {
    let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());

    let mut next = |what: &str| {
        lines.next().ok_or_else(|| {
            DksapError::PersistenceFailure(format!("ephemeral record is missing {what}"))
        })
    };
    let r = next("the scalar")?;
    let rx = next("the X coordinate")?;
    let ry = next("the Y coordinate")?;

    if lines.next().is_some() {
        return Err(DksapError::PersistenceFailure(
            "ephemeral record has trailing content".into(),
        ));
    }

    let scalar = PrivateScalar::from_hex(r).map_err(persistence)?;
    let public = PublicPoint::from_hex_coordinates(rx, ry).map_err(persistence)?;
    EphemeralRecord::new(scalar, public).map_err(persistence)
}

fn persistence(e: DksapError) -> DksapError {
    DksapError::PersistenceFailure(format!("corrupt ephemeral record: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_roundtrip() {
        let record = EphemeralRecord::generate();
        let text = encode_ephemeral(&record);
        assert_eq!(text.lines().count(), 3);
        assert!(text.ends_with('\n'));

        let parsed = decode_ephemeral(&text).unwrap();
        assert_eq!(parsed.scalar(), record.scalar());
        assert_eq!(parsed.public(), record.public());
    }

    #[test]
    fn test_small_scalar_is_unpadded() {
        let scalar = PrivateScalar::from_hex("1").unwrap();
        let record = EphemeralRecord::from_scalar(scalar);
        let text = encode_ephemeral(&record);

        assert_eq!(text.lines().next(), Some("1"));
        assert_eq!(
            text.lines().nth(1),
            Some("6b17d1f2e12c4247f8bce6e563a440f277037d812deb33a0f4a13945d898c296")
        );
        assert_eq!(decode_ephemeral(&text).unwrap().scalar(), record.scalar());
    }

    #[test]
    fn test_padded_and_crlf_accepted() {
        let record = EphemeralRecord::generate();
        let text = format!(
            "{}\r\n{}\r\n{}\r\n",
            record.scalar().to_hex(),
            hex::encode(record.public().x_bytes()),
            hex::encode(record.public().y_bytes()),
        );
        assert_eq!(decode_ephemeral(&text).unwrap().public(), record.public());
    }

    #[test]
    fn test_mismatched_point_rejected() {
        let record = EphemeralRecord::generate();
        let other = EphemeralRecord::generate();
        let text = format!(
            "{}\n{}\n{}\n",
            record.scalar().to_hex(),
            hex::encode(other.public().x_bytes()),
            hex::encode(other.public().y_bytes()),
        );
        assert!(matches!(
            decode_ephemeral(&text),
            Err(DksapError::PersistenceFailure(_))
        ));
    }

    #[test_case("" ; "empty")]
    #[test_case("1\n" ; "scalar only")]
    #[test_case("1\n2\n" ; "missing y")]
    #[test_case("zz\n1\n2\n" ; "not hex")]
    #[test_case("1\n1\n2\n" ; "off curve")]
    fn test_malformed_rejected(text: &str) {
        assert!(matches!(
            decode_ephemeral(text),
            Err(DksapError::PersistenceFailure(_))
        ));
    }

    #[test]
    fn test_trailing_content_rejected() {
        let mut text = encode_ephemeral(&EphemeralRecord::generate()).to_string();
        text.push_str("extra\n");
        assert!(decode_ephemeral(&text).is_err());
    }
}
