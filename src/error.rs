//! Error types for forminator-sql.

use thiserror::Error;

/// The main error type for entry generation.
#[derive(Debug, Error)]
pub enum FormError {
    /// A field required by the rule table is absent or empty.
    #[error("entry {entry_id}: missing required field '{field}'")]
    MissingField { entry_id: u64, field: &'static str },

    /// Gender code is not one of the two accepted codes.
    #[error("entry {entry_id}: invalid gender code '{code}'. Expected: M or F")]
    InvalidGender { entry_id: u64, code: String },

    /// `date_created` does not match `YYYY-MM-DD HH:MM:SS`.
    #[error("entry {entry_id}: invalid date_created '{value}'. Expected: YYYY-MM-DD HH:MM:SS")]
    InvalidTimestamp { entry_id: u64, value: String },

    /// Emitted rows would need a meta id beyond `u64::MAX`.
    #[error("entry {entry_id}: {rows} rows starting at meta_id {start} exceed the id range")]
    MetaIdOverflow { entry_id: u64, start: u64, rows: usize },

    /// Failed to read back a serialized array.
    #[error("Decode error at byte {position}: {message}")]
    Decode { position: usize, message: String },

    /// Submission input could not be read.
    #[error("Input error: {0}")]
    Input(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FormError {
    /// Create a missing field error.
    pub fn missing(entry_id: u64, field: &'static str) -> Self {
        Self::MissingField { entry_id, field }
    }

    /// Create a decode error at the given byte position.
    pub fn decode(position: usize, message: impl Into<String>) -> Self {
        Self::Decode {
            position,
            message: message.into(),
        }
    }

    /// The entry this error belongs to, if it is a validation error.
    pub fn entry_id(&self) -> Option<u64> {
        match self {
            Self::MissingField { entry_id, .. }
            | Self::InvalidGender { entry_id, .. }
            | Self::InvalidTimestamp { entry_id, .. }
            | Self::MetaIdOverflow { entry_id, .. } => Some(*entry_id),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for FormError {
    fn from(e: serde_json::Error) -> Self {
        Self::Input(e.to_string())
    }
}

/// Result type alias for forminator-sql operations.
pub type FormResult<T> = Result<T, FormError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FormError::missing(668, "email");
        assert_eq!(err.to_string(), "entry 668: missing required field 'email'");
        assert_eq!(err.entry_id(), Some(668));
    }

    #[test]
    fn test_gender_error_names_code() {
        let err = FormError::InvalidGender {
            entry_id: 12,
            code: "X".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "entry 12: invalid gender code 'X'. Expected: M or F"
        );
    }

    #[test]
    fn test_decode_has_no_entry() {
        let err = FormError::decode(3, "expected ':'");
        assert_eq!(err.to_string(), "Decode error at byte 3: expected ':'");
        assert_eq!(err.entry_id(), None);
    }
}
