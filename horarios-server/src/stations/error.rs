//! Station table error types.

/// Errors that can occur when loading the station slug table.
#[derive(Debug, thiserror::Error)]
pub enum SlugTableError {
    /// Table file could not be read
    #[error("failed to read station table {path}: {message}")]
    Io { path: String, message: String },

    /// Table file is not a JSON object of strings
    #[error("failed to parse station table: {message}")]
    Parse { message: String },

    /// An entry has an unusable code or slug
    #[error("invalid station table entry {code}: {reason}")]
    InvalidEntry { code: String, reason: &'static str },
}
