//! # Attribute Paths
//!
//! Encoding of logical attribute names to profile-specific `JSONPath`
//! strings, and back.
//!
//! | profile    | prefixed                          | not prefixed |
//! |------------|-----------------------------------|--------------|
//! | `jwt`      | `$.credentialSubject.<name>`      | `<name>`     |
//! | `sd-jwt`   | `$.<name>`                        | `<name>`     |
//! | `mso_mdoc` | `$['<namespace>']['<name>']`      | `<name>`     |

use std::sync::LazyLock;

use regex::Regex;

use crate::document::PresentationDefinition;
use crate::profile::Profile;

pub(crate) const JWT_SUBJECT_ROOT: &str = "$.credentialSubject.";
pub(crate) const SD_JWT_ROOT: &str = "$.";

static MDOC_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\$\['(?<namespace>[^']*)'\]\['(?<name>.*)'\]$").expect("should compile")
});

/// A decoded attribute path.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Decoded {
    /// Logical attribute name.
    pub name: String,

    /// Whether the attribute lives under the subject (or namespace) root.
    pub has_prefix: bool,
}

impl Decoded {
    pub(crate) fn prefixed(name: &str) -> Self {
        Self {
            name: name.to_string(),
            has_prefix: true,
        }
    }

    pub(crate) fn bare(path: &str) -> Self {
        Self {
            name: path.to_string(),
            has_prefix: false,
        }
    }
}

/// Encode a logical attribute name as a `JSONPath` for the profile.
#[must_use]
pub fn encode(name: &str, has_prefix: bool, profile: Profile, mdoc_prefix: &str) -> String {
    profile.codec(mdoc_prefix).encode_path(name, has_prefix)
}

/// Decode a `JSONPath` back to a logical attribute name for the profile.
#[must_use]
pub fn decode(path: &str, profile: Profile, mdoc_prefix: &str) -> Decoded {
    profile.codec(mdoc_prefix).decode_path(path)
}

/// Recover the mdoc namespace from the first attribute field's first path.
///
/// Returns `None` when there is no attribute field or its path is not of the
/// form `$['<namespace>']['<name>']`.
#[must_use]
pub fn detect_mdoc_prefix(pd: &PresentationDefinition) -> Option<String> {
    let path = pd.attribute_fields().next()?.path.first()?;
    let (namespace, _) = mdoc_parts(path)?;
    Some(namespace.to_string())
}

/// Split an mdoc path into namespace and element name.
pub(crate) fn mdoc_parts(path: &str) -> Option<(&str, &str)> {
    let caps = MDOC_PATH.captures(path)?;
    let namespace = caps.name("namespace")?.as_str();
    let name = caps.name("name")?.as_str();
    Some((namespace, name))
}
