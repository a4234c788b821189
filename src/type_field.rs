//! # Type Field
//!
//! The single field that discriminates the credential type. JWT-VC documents
//! check `$.type` with an array-contains filter, SD-JWT documents check
//! `$.vct` with a string constant, and mdoc documents carry no type field.

use crate::document::{Field, PresentationDefinition};
use crate::filter::Filter;
use crate::profile::Profile;

/// Type path of a W3C credential.
pub const TYPE_PATH: &str = "$.type";

/// Type path of an SD-JWT VC.
pub const VCT_PATH: &str = "$.vct";

/// The type check as held in the editor's settings.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TypeCheck {
    /// Comma-separated type paths. Empty when the profile default is used.
    pub paths: String,

    /// Expected credential type.
    pub filter: Option<String>,
}

/// Whether `path` is one of the reserved type paths.
#[must_use]
pub fn is_type_path(path: &str) -> bool {
    path == TYPE_PATH || path == VCT_PATH
}

/// Build the type field for the profile, or `None` for profiles without one.
#[must_use]
pub fn encode(type_check: &str, type_filter: Option<&str>, profile: Profile) -> Option<Field> {
    let codec = profile.codec("");
    let default_path = codec.type_path()?;

    let mut path = split(type_check);
    if path.is_empty() {
        path.push(default_path.to_string());
    }
    let filter = type_filter
        .filter(|v| !v.is_empty())
        .and_then(|v| codec.type_filter(v))
        .map(|f| f.to_json());

    Some(Field { path, filter })
}

/// Read the type check back from a document.
///
/// The type field is found by its literal path regardless of `profile`: the
/// document may have been written for another profile. `profile` is only used
/// to recognise its default path, which decodes to an empty `paths`.
#[must_use]
pub fn decode(pd: &PresentationDefinition, profile: Profile) -> TypeCheck {
    let Some(field) = pd.type_field() else {
        return TypeCheck::default();
    };

    let default_path = profile.codec("").type_path();
    let paths = match field.path.as_slice() {
        [only] if Some(only.as_str()) == default_path => String::new(),
        paths => paths.join(", "),
    };

    let filter = match field.filter.as_ref().and_then(Filter::from_json) {
        Some(Filter::ArrayContainsConst { value } | Filter::StringConst { value }) => Some(value),
        _ => None,
    };

    TypeCheck {
        paths,
        filter: filter.filter(|v| !v.is_empty()),
    }
}

// Split a comma-separated path list, dropping blanks.
pub(crate) fn split(paths: &str) -> Vec<String> {
    paths.split(',').map(str::trim).filter(|p| !p.is_empty()).map(ToString::to_string).collect()
}
