//! Station identifier types.

use std::fmt;

/// Maximum accepted identifier length.
const MAX_LEN: usize = 128;

/// Error returned when parsing an invalid station identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station identifier: {reason}")]
pub struct InvalidStation {
    reason: &'static str,
}

/// A validated ADIF station identifier.
///
/// Identifiers are a station code, optionally followed by a `-` and a
/// human-readable slug (`13200` or `13200-bilbao-abando`). Only URL-safe
/// characters are accepted, so the value can be spliced into a path without
/// escaping.
///
/// # Examples
///
/// ```
/// use horarios_server::domain::StationCode;
///
/// let abando = StationCode::parse("13200-bilbao-abando").unwrap();
/// assert_eq!(abando.code(), "13200");
/// assert_eq!(abando.slug(), Some("bilbao-abando"));
///
/// assert!(StationCode::parse("").is_err());
/// assert!(StationCode::parse("13200/../admin").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct StationCode(String);

impl StationCode {
    /// Parse a station identifier, trimming surrounding whitespace.
    pub fn parse(s: &str) -> Result<Self, InvalidStation> {
        let s = s.trim();

        if s.is_empty() {
            return Err(InvalidStation {
                reason: "must not be empty",
            });
        }

        if s.len() > MAX_LEN {
            return Err(InvalidStation {
                reason: "must be at most 128 characters",
            });
        }

        if !s.as_bytes()[0].is_ascii_alphanumeric() {
            return Err(InvalidStation {
                reason: "must start with a letter or digit",
            });
        }

        if !s
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
        {
            return Err(InvalidStation {
                reason: "must contain only letters, digits, '-' or '_'",
            });
        }

        Ok(StationCode(s.to_string()))
    }

    /// The full identifier as given.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The station code: everything before the first `-`.
    pub fn code(&self) -> &str {
        match self.0.split_once('-') {
            Some((code, _)) => code,
            None => &self.0,
        }
    }

    /// The inline slug, if the identifier carried one.
    pub fn slug(&self) -> Option<&str> {
        self.0
            .split_once('-')
            .map(|(_, slug)| slug)
            .filter(|slug| !slug.is_empty())
    }
}

impl fmt::Debug for StationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationCode({})", self.0)
    }
}

impl fmt::Display for StationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_plain_code() {
        let station = StationCode::parse("13200").unwrap();
        assert_eq!(station.as_str(), "13200");
        assert_eq!(station.code(), "13200");
        assert_eq!(station.slug(), None);
    }

    #[test]
    fn parse_code_with_slug() {
        let station = StationCode::parse("13200-bilbao-abando").unwrap();
        assert_eq!(station.code(), "13200");
        assert_eq!(station.slug(), Some("bilbao-abando"));
    }

    #[test]
    fn trailing_dash_has_no_slug() {
        let station = StationCode::parse("13200-").unwrap();
        assert_eq!(station.code(), "13200");
        assert_eq!(station.slug(), None);
    }

    #[test]
    fn trims_whitespace() {
        let station = StationCode::parse("  13200 ").unwrap();
        assert_eq!(station.as_str(), "13200");
    }

    #[test]
    fn reject_empty() {
        assert!(StationCode::parse("").is_err());
        assert!(StationCode::parse("   ").is_err());
    }

    #[test]
    fn reject_unsafe_characters() {
        assert!(StationCode::parse("13200/x").is_err());
        assert!(StationCode::parse("13200?p_p_auth=x").is_err());
        assert!(StationCode::parse("132 00").is_err());
        assert!(StationCode::parse("13200%20").is_err());
        assert!(StationCode::parse("estación").is_err());
    }

    #[test]
    fn reject_leading_separator() {
        assert!(StationCode::parse("-13200").is_err());
        assert!(StationCode::parse("_13200").is_err());
    }

    #[test]
    fn reject_too_long() {
        let long = "1".repeat(MAX_LEN + 1);
        assert!(StationCode::parse(&long).is_err());
        assert!(StationCode::parse(&long[..MAX_LEN]).is_ok());
    }

    #[test]
    fn error_display() {
        let err = StationCode::parse("").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid station identifier: must not be empty"
        );
    }

    #[test]
    fn display_and_debug() {
        let station = StationCode::parse("13200").unwrap();
        assert_eq!(format!("{}", station), "13200");
        assert_eq!(format!("{:?}", station), "StationCode(13200)");
    }
}
