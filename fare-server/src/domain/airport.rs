//! Airport code types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Error returned when parsing an invalid IATA airport code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid IATA code {input:?}: {reason}")]
pub struct InvalidIata {
    input: String,
    reason: &'static str,
}

/// A valid 3-letter IATA airport code.
///
/// IATA codes are always 3 uppercase ASCII letters. Any `Iata` value is
/// valid by construction.
///
/// # Examples
///
/// ```
/// use fare_server::domain::Iata;
///
/// let fco = Iata::parse("FCO").unwrap();
/// assert_eq!(fco.as_str(), "FCO");
///
/// // Lowercase is rejected by the strict parser...
/// assert!(Iata::parse("fco").is_err());
///
/// // ...but accepted by the normalizing one.
/// assert_eq!(Iata::parse_normalized(" fco ").unwrap(), fco);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Iata([u8; 3]);

impl Iata {
    /// Parse an IATA code from a string.
    ///
    /// The input must be exactly 3 uppercase ASCII letters (A-Z).
    pub fn parse(s: &str) -> Result<Self, InvalidIata> {
        let bytes = s.as_bytes();

        if bytes.len() != 3 {
            return Err(InvalidIata {
                input: s.to_string(),
                reason: "must be exactly 3 characters",
            });
        }

        if !bytes.iter().all(u8::is_ascii_uppercase) {
            return Err(InvalidIata {
                input: s.to_string(),
                reason: "must be uppercase ASCII letters A-Z",
            });
        }

        Ok(Iata([bytes[0], bytes[1], bytes[2]]))
    }

    /// Parse user input: surrounding whitespace is trimmed and letters are
    /// uppercased before validation.
    pub fn parse_normalized(s: &str) -> Result<Self, InvalidIata> {
        Self::parse(&s.trim().to_ascii_uppercase())
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        // Only ASCII uppercase letters are ever stored.
        std::str::from_utf8(&self.0).unwrap_or("???")
    }

    /// Case-insensitive comparison against a raw code.
    pub fn matches(&self, code: &str) -> bool {
        self.as_str().eq_ignore_ascii_case(code.trim())
    }
}

impl fmt::Debug for Iata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Iata({})", self.as_str())
    }
}

impl fmt::Display for Iata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lenient parse: surrounding whitespace and lowercase are accepted.
impl FromStr for Iata {
    type Err = InvalidIata;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Iata::parse_normalized(s)
    }
}

impl Serialize for Iata {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Iata {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Iata::parse_normalized(&s).map_err(serde::de::Error::custom)
    }
}

/// Parse a comma-separated list of codes, skipping empty entries.
///
/// Duplicates are dropped keeping first-seen order, so `"BGY, mxp,BGY"`
/// yields `[BGY, MXP]`.
pub fn parse_code_list(csv: &str) -> Result<Vec<Iata>, InvalidIata> {
    let mut codes = Vec::new();
    for part in csv.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let code = Iata::parse_normalized(part)?;
        if !codes.contains(&code) {
            codes.push(code);
        }
    }
    Ok(codes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_codes() {
        assert!(Iata::parse("FCO").is_ok());
        assert!(Iata::parse("BVA").is_ok());
        assert!(Iata::parse("AAA").is_ok());
        assert!(Iata::parse("ZZZ").is_ok());
    }

    #[test]
    fn reject_lowercase() {
        assert!(Iata::parse("fco").is_err());
        assert!(Iata::parse("Fco").is_err());
    }

    #[test]
    fn reject_wrong_length() {
        assert!(Iata::parse("").is_err());
        assert!(Iata::parse("FC").is_err());
        assert!(Iata::parse("FCOX").is_err());
    }

    #[test]
    fn reject_non_letters() {
        assert!(Iata::parse("F1O").is_err());
        assert!(Iata::parse("F-O").is_err());
        assert!(Iata::parse("F O").is_err());
    }

    #[test]
    fn normalized_parse() {
        assert_eq!(Iata::parse_normalized(" bgy").unwrap().as_str(), "BGY");
        assert!(Iata::parse_normalized("bg").is_err());
    }

    #[test]
    fn matches_is_case_insensitive() {
        let bva = Iata::parse("BVA").unwrap();
        assert!(bva.matches("bva"));
        assert!(bva.matches("BVA"));
        assert!(!bva.matches("BGY"));
    }

    #[test]
    fn display_and_debug() {
        let fco = Iata::parse("FCO").unwrap();
        assert_eq!(fco.to_string(), "FCO");
        assert_eq!(format!("{fco:?}"), "Iata(FCO)");
    }

    #[test]
    fn error_mentions_input() {
        let err = Iata::parse("nope").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid IATA code \"nope\": must be exactly 3 characters"
        );
    }

    #[test]
    fn code_list_parsing() {
        let codes = parse_code_list("BGY, mxp,,BGY ").unwrap();
        assert_eq!(
            codes,
            vec![Iata::parse("BGY").unwrap(), Iata::parse("MXP").unwrap()]
        );
        assert!(parse_code_list("").unwrap().is_empty());
        assert!(parse_code_list("BGY,XX").is_err());
    }

    #[test]
    fn serde_uses_plain_string() {
        let fco = Iata::parse("FCO").unwrap();
        assert_eq!(serde_json::to_string(&fco).unwrap(), "\"FCO\"");
        let back: Iata = serde_json::from_str("\"fco\"").unwrap();
        assert_eq!(back, fco);
    }
}
