//! Commuter network names.

use std::fmt;

/// Network used when the caller does not name one.
pub const DEFAULT_NETWORK: &str = "BILBAO";

/// Maximum accepted network name length.
const MAX_LEN: usize = 32;

/// Error returned when parsing an invalid commuter network name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid commuter network: {reason}")]
pub struct InvalidNetwork {
    reason: &'static str,
}

/// An upstream commuter network (Cercanías area), e.g. `BILBAO`.
///
/// Names are normalized to uppercase so `bilbao` and `BILBAO` are the same
/// network.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CommuterNetwork(String);

impl CommuterNetwork {
    /// Parse a network name, accepting any case.
    pub fn parse(s: &str) -> Result<Self, InvalidNetwork> {
        let s = s.trim();

        if s.is_empty() {
            return Err(InvalidNetwork {
                reason: "must not be empty",
            });
        }

        if s.len() > MAX_LEN {
            return Err(InvalidNetwork {
                reason: "must be at most 32 characters",
            });
        }

        if !s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_') {
            return Err(InvalidNetwork {
                reason: "must contain only letters, digits or '_'",
            });
        }

        Ok(CommuterNetwork(s.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CommuterNetwork {
    fn default() -> Self {
        CommuterNetwork(DEFAULT_NETWORK.to_string())
    }
}

impl fmt::Debug for CommuterNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CommuterNetwork({})", self.0)
    }
}

impl fmt::Display for CommuterNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
