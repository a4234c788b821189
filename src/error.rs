//! # Editor Errors
//!
//! Errors returned when raw Presentation Definition text cannot be accepted
//! back into the field model. None of these are fatal: the caller keeps its
//! previous snapshot and shows the [`Error::reason`] to the user.

use thiserror::Error;

/// Presentation Definition editor error codes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The text is not valid JSON, or a document member has the wrong JSON
    /// type (for example, a numeric `path`).
    #[error("parse_error")]
    Parse(String),

    /// The text is valid JSON but lacks the shape of a Presentation
    /// Definition.
    #[error(transparent)]
    Structural(#[from] StructuralError),

    /// The credential profile label is not one of `jwt`, `sd-jwt` or
    /// `mso_mdoc`.
    #[error("unsupported_profile")]
    UnsupportedProfile(String),
}

/// Structural problems found by the validator.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructuralError {
    /// `constraints` or `constraints.fields` is missing.
    #[error("missing_constraints")]
    MissingConstraints,

    /// No field discriminates the credential type (`$.type` or `$.vct`).
    #[error("missing_type_field")]
    MissingTypeField,
}

impl StructuralError {
    /// Human-readable reason for display.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::MissingConstraints => {
                "Presentation Definition must contain a `constraints.fields` array"
            }
            Self::MissingTypeField => {
                "Presentation Definition must contain a field with path '$.type' or '$.vct'"
            }
        }
    }
}

impl Error {
    /// Returns the error code.
    #[must_use]
    pub fn code(&self) -> String {
        self.to_string()
    }

    /// Returns the human-readable reason for display.
    #[must_use]
    pub fn reason(&self) -> String {
        match self {
            Self::Parse(msg) => format!("Invalid JSON: {msg}"),
            Self::Structural(err) => err.reason().to_string(),
            Self::UnsupportedProfile(profile) => {
                format!("unsupported credential profile: {profile}")
            }
        }
    }

    pub(crate) fn parse(err: &serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}
