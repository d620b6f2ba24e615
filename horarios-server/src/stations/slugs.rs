//! Station code → landing-page slug lookup.

use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use crate::adif::AdifError;
use crate::domain::StationCode;

use super::error::SlugTableError;

/// Built-in slugs for stations whose landing page is known.
///
/// The portal also serves bare `/w/<code>` pages; entries here just give
/// the canonical path. Extend at start-up with
/// [`StationSlugs::with_overrides_from`].
const BUILTIN: &[(&str, &str)] = &[
    ("13200", "bilbao-abando"),
    ("17000", "madrid-chamartin-clara-campoamor"),
    ("60000", "madrid-pta.-de-atocha"),
    ("65000", "valencia-nord"),
    ("71801", "barcelona-sants"),
];

/// What to do with a code that has no slug in the table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnmappedPolicy {
    /// Use `/w/<code>` as-is.
    #[default]
    PassThrough,
    /// Fail with [`AdifError::UnmappedStation`].
    Reject,
}

impl FromStr for UnmappedPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pass" | "passthrough" => Ok(UnmappedPolicy::PassThrough),
            "reject" => Ok(UnmappedPolicy::Reject),
            other => Err(format!(
                "unknown unmapped-station policy '{other}' (expected pass or reject)"
            )),
        }
    }
}

/// A station resolved to its landing-page path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationPage {
    station: StationCode,
    slug: Option<String>,
}

impl StationPage {
    /// Path segment after `/w/`.
    pub fn path(&self) -> String {
        match &self.slug {
            Some(slug) => format!("{}-{}", self.station.code(), slug),
            None if self.station.slug().is_some() => self.station.as_str().to_string(),
            None => self.station.code().to_string(),
        }
    }

    /// Bare station code, as sent in the schedule form.
    pub fn code(&self) -> &str {
        self.station.code()
    }
}

/// Immutable code → slug table, built once at start-up.
#[derive(Debug, Clone, Default)]
pub struct StationSlugs {
    slugs: HashMap<String, String>,
}

impl StationSlugs {
    /// An empty table.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in table.
    pub fn builtin() -> Self {
        let slugs = BUILTIN
            .iter()
            .map(|(code, slug)| (code.to_string(), slug.to_string()))
            .collect();
        Self { slugs }
    }

    /// Merge entries from a JSON file of the form `{"13200": "bilbao-abando"}`.
    ///
    /// File entries replace built-in ones with the same code.
    pub fn with_overrides_from(self, path: impl AsRef<Path>) -> Result<Self, SlugTableError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| SlugTableError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        self.with_overrides_json(&contents)
    }

    /// Merge entries from a JSON string (useful for testing).
    pub fn with_overrides_json(mut self, json: &str) -> Result<Self, SlugTableError> {
        let entries: HashMap<String, String> =
            serde_json::from_str(json).map_err(|e| SlugTableError::Parse {
                message: e.to_string(),
            })?;

        for (code, slug) in entries {
            validate_entry(&code, &slug)?;
            self.slugs.insert(code, slug);
        }

        Ok(self)
    }

    /// Resolve a station to its landing page.
    ///
    /// An inline slug (`13200-bilbao-abando`) is used as given. Otherwise the
    /// table is consulted, and codes missing from it are handled per `policy`.
    pub fn resolve(
        &self,
        station: &StationCode,
        policy: UnmappedPolicy,
    ) -> Result<StationPage, AdifError> {
        if station.slug().is_some() {
            return Ok(StationPage {
                station: station.clone(),
                slug: None,
            });
        }

        match (self.slugs.get(station.code()), policy) {
            (Some(slug), _) => Ok(StationPage {
                station: station.clone(),
                slug: Some(slug.clone()),
            }),
            (None, UnmappedPolicy::PassThrough) => Ok(StationPage {
                station: station.clone(),
                slug: None,
            }),
            (None, UnmappedPolicy::Reject) => Err(AdifError::UnmappedStation {
                code: station.code().to_string(),
            }),
        }
    }

    /// Look up the slug for a bare code.
    pub fn get(&self, code: &str) -> Option<&str> {
        self.slugs.get(code).map(String::as_str)
    }

    /// All entries, sorted by code.
    pub fn entries(&self) -> Vec<(&str, &str)> {
        let mut entries: Vec<_> = self
            .slugs
            .iter()
            .map(|(code, slug)| (code.as_str(), slug.as_str()))
            .collect();
        entries.sort_unstable();
        entries
    }

    pub fn len(&self) -> usize {
        self.slugs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slugs.is_empty()
    }
}

/// Codes must be bare station codes; slugs must be path-safe.
fn validate_entry(code: &str, slug: &str) -> Result<(), SlugTableError> {
    let invalid = |reason| SlugTableError::InvalidEntry {
        code: code.to_string(),
        reason,
    };

    let station = StationCode::parse(code).map_err(|_| invalid("code is not a valid identifier"))?;
    if station.as_str() != code || station.slug().is_some() || code.contains('-') {
        return Err(invalid("code must not carry a slug"));
    }

    if slug.is_empty()
        || !slug
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.'))
    {
        return Err(invalid("slug must be letters, digits, '-', '_' or '.'"));
    }

    Ok(())
}
