//! # Presentation Definition Document
//!
//! The wire shape the editor projects to and reconciles from. Only the
//! members the editor manages are modelled; member order on serialization is
//! `path` before `filter` and `fields` before `limit_disclosure`.
//!
//! See <https://identity.foundation/presentation-exchange/spec/v2.0.0/#presentation-definition>

use serde::de::Deserializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::type_field;

/// The `limit_disclosure` value requesting that only listed fields be
/// disclosed.
pub const LIMIT_DISCLOSURE_REQUIRED: &str = "required";

/// A Presentation Definition as edited by the user.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct PresentationDefinition {
    /// Constraints on the credential's data.
    pub constraints: Constraints,
}

/// Constraints specify constraints on data values, and an explanation why a
/// certain item or set of data is being requested.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Constraints {
    /// Fields are processed in order. The type field, when present, is
    /// first.
    pub fields: Vec<Field>,

    /// "required" indicates the Holder MUST limit submitted fields to those
    /// listed in `fields`. Omission means the Holder MAY submit more.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit_disclosure: Option<String>,
}

/// A single field: one or more `JSONPath` alternatives plus an optional
/// filter.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Field {
    /// `JSONPath` expressions evaluated in order. A single string is accepted
    /// on input.
    #[serde(deserialize_with = "one_or_many")]
    pub path: Vec<String>,

    /// JSON Schema descriptor. Kept raw so shapes the editor does not
    /// understand never make the document unreadable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Value>,
}

impl PresentationDefinition {
    /// Serialize as indented JSON text.
    #[must_use]
    pub fn to_json_pretty(&self) -> String {
        match serde_json::to_string_pretty(self) {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(target: "PresentationDefinition::to_json_pretty", ?e);
                String::new()
            }
        }
    }

    /// Whether `limit_disclosure` is set to "required".
    #[must_use]
    pub fn limit_disclosure_required(&self) -> bool {
        self.constraints.limit_disclosure.as_deref() == Some(LIMIT_DISCLOSURE_REQUIRED)
    }

    /// The first field that discriminates credential type.
    #[must_use]
    pub fn type_field(&self) -> Option<&Field> {
        self.constraints.fields.iter().find(|f| f.is_type_field())
    }

    /// Fields describing credential attributes, in document order.
    pub fn attribute_fields(&self) -> impl Iterator<Item = &Field> {
        self.constraints.fields.iter().filter(|f| !f.is_type_field())
    }
}

impl Field {
    /// Whether any of the field's paths is a reserved type path.
    #[must_use]
    pub fn is_type_field(&self) -> bool {
        self.path.iter().any(|p| type_field::is_type_path(p))
    }
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Quota {
        One(String),
        Many(Vec<String>),
    }

    match Quota::deserialize(deserializer)? {
        Quota::One(path) => Ok(vec![path]),
        Quota::Many(paths) => Ok(paths),
    }
}
