//! Hash scheme selection.

use serde::{Deserialize, Serialize};

use crate::error::DksapError;

/// Selects how points are hashed into scalars, addresses and sender ids.
///
/// `Standard` hashes raw byte encodings with SHA-256. `Legacy` reproduces the
/// deployed wire behavior bit for bit: hashes over hex text, an MD5-based
/// scalar fold and the Flickr Base58 alphabet.
///
/// # Security
/// The legacy fold is `X * 2^128 + MD5("") mod N`, an affine function of the
/// shared X coordinate. Use it only to interoperate with existing addresses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashScheme {
    /// SHA-256 over byte encodings, Bitcoin Base58 alphabet.
    #[default]
    Standard,
    /// Bit-compatible with the deployed client.
    Legacy,
}

impl HashScheme {
    /// Returns true for the legacy scheme.
    pub fn is_legacy(self) -> bool {
        matches!(self, HashScheme::Legacy)
    }

    /// Lowercase name as accepted by `FromStr`.
    pub fn as_str(self) -> &'static str {
        match self {
            HashScheme::Standard => "standard",
            HashScheme::Legacy => "legacy",
        }
    }
}

impl std::fmt::Display for HashScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for HashScheme {
    type Err = DksapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(HashScheme::Standard),
            "legacy" => Ok(HashScheme::Legacy),
            other => Err(DksapError::ConfigError(format!(
                "unknown hash scheme '{other}' (expected 'standard' or 'legacy')"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("standard", HashScheme::Standard)]
    #[test_case("LEGACY", HashScheme::Legacy)]
    #[test_case(" legacy\n", HashScheme::Legacy)]
    fn test_parse(input: &str, expected: HashScheme) {
        assert_eq!(input.parse::<HashScheme>().unwrap(), expected);
    }

    #[test]
    fn test_parse_unknown() {
        assert!(matches!(
            "md5".parse::<HashScheme>(),
            Err(DksapError::ConfigError(_))
        ));
    }

    #[test]
    fn test_default_and_display() {
        assert_eq!(HashScheme::default(), HashScheme::Standard);
        assert_eq!(HashScheme::Legacy.to_string(), "legacy");
        assert_eq!(serde_json::to_string(&HashScheme::Legacy).unwrap(), "\"legacy\"");
    }
}
