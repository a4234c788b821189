//! # Credential Profiles
//!
//! A credential profile decides how a Presentation Definition encodes
//! attribute paths, the type field, and `limit_disclosure`. Each profile has
//! its own [`Codec`], selected once per projection or reconciliation.

use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::filter::Filter;
use crate::path::{self, Decoded, JWT_SUBJECT_ROOT, SD_JWT_ROOT};
use crate::type_field::{TYPE_PATH, VCT_PATH};

/// Credential encoding profile.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq, Hash)]
pub enum Profile {
    /// W3C Verifiable Credential secured as a JWT (`jwt_vc_json`).
    #[serde(rename = "jwt")]
    Jwt,

    /// IETF SD-JWT VC.
    #[default]
    #[serde(rename = "sd-jwt")]
    SdJwt,

    /// ISO/IEC 18013-5 mobile document.
    #[serde(rename = "mso_mdoc")]
    MsoMdoc,
}

impl Profile {
    /// The codec for this profile. `mdoc_prefix` is only consulted by
    /// [`Profile::MsoMdoc`].
    #[must_use]
    pub fn codec(self, mdoc_prefix: &str) -> Box<dyn Codec + '_> {
        match self {
            Self::Jwt => Box::new(Jwt),
            Self::SdJwt => Box::new(SdJwt),
            Self::MsoMdoc => Box::new(Mdoc { namespace: mdoc_prefix }),
        }
    }

    /// Whether documents for this profile carry `"limit_disclosure": "required"`.
    #[must_use]
    pub const fn limit_disclosure(self) -> bool {
        !matches!(self, Self::Jwt)
    }
}

impl Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Jwt => write!(f, "jwt"),
            Self::SdJwt => write!(f, "sd-jwt"),
            Self::MsoMdoc => write!(f, "mso_mdoc"),
        }
    }
}

impl FromStr for Profile {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "jwt" | "jwt_vc_json" => Ok(Self::Jwt),
            "sd-jwt" | "vc+sd-jwt" | "dc+sd-jwt" => Ok(Self::SdJwt),
            "mso_mdoc" => Ok(Self::MsoMdoc),
            _ => Err(Error::UnsupportedProfile(s.to_string())),
        }
    }
}

/// Profile-specific encoding rules.
pub trait Codec {
    /// Encode a logical attribute name as a `JSONPath`.
    fn encode_path(&self, name: &str, has_prefix: bool) -> String;

    /// Decode a `JSONPath` to a logical attribute name.
    fn decode_path(&self, path: &str) -> Decoded;

    /// Path used for the type field when the user has not set one. `None`
    /// when the profile carries no type field.
    fn type_path(&self) -> Option<&'static str>;

    /// Filter for the type field constraining the credential type to `value`.
    fn type_filter(&self, value: &str) -> Option<Filter>;
}

struct Jwt;

impl Codec for Jwt {
    fn encode_path(&self, name: &str, has_prefix: bool) -> String {
        if has_prefix {
            format!("{JWT_SUBJECT_ROOT}{name}")
        } else {
            name.to_string()
        }
    }

    fn decode_path(&self, path: &str) -> Decoded {
        path.strip_prefix(JWT_SUBJECT_ROOT).map_or_else(|| Decoded::bare(path), Decoded::prefixed)
    }

    fn type_path(&self) -> Option<&'static str> {
        Some(TYPE_PATH)
    }

    // `type` is an array in a W3C credential
    fn type_filter(&self, value: &str) -> Option<Filter> {
        Some(Filter::ArrayContainsConst { value: value.to_string() })
    }
}

struct SdJwt;

impl Codec for SdJwt {
    fn encode_path(&self, name: &str, has_prefix: bool) -> String {
        if has_prefix {
            format!("{SD_JWT_ROOT}{name}")
        } else {
            name.to_string()
        }
    }

    fn decode_path(&self, path: &str) -> Decoded {
        path.strip_prefix(SD_JWT_ROOT).map_or_else(|| Decoded::bare(path), Decoded::prefixed)
    }

    fn type_path(&self) -> Option<&'static str> {
        Some(VCT_PATH)
    }

    fn type_filter(&self, value: &str) -> Option<Filter> {
        Some(Filter::StringConst { value: value.to_string() })
    }
}

struct Mdoc<'a> {
    namespace: &'a str,
}

impl Codec for Mdoc<'_> {
    fn encode_path(&self, name: &str, has_prefix: bool) -> String {
        if has_prefix {
            format!("$['{}']['{name}']", self.namespace)
        } else {
            name.to_string()
        }
    }

    fn decode_path(&self, path: &str) -> Decoded {
        match path::mdoc_parts(path) {
            Some((namespace, name)) if namespace == self.namespace => Decoded::prefixed(name),
            _ => Decoded::bare(path),
        }
    }

    fn type_path(&self) -> Option<&'static str> {
        None
    }

    fn type_filter(&self, _: &str) -> Option<Filter> {
        None
    }
}
