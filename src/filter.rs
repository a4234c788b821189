//! # Field Filters
//!
//! The filter shapes the editor understands, and their projection to and from
//! the JSON Schema descriptors used in a Presentation Definition field.
//!
//! See <https://identity.foundation/presentation-exchange/spec/v2.0.0/#input-descriptor-object>

use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// A constraint applied to the values selected by a field's paths.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Filter {
    /// The selected array must contain the constant value.
    ArrayContainsConst {
        /// Required array member.
        value: String,
    },

    /// The selected string must equal the constant value.
    StringConst {
        /// Required value.
        value: String,
    },

    /// The selected string must match the regular expression.
    StringPattern {
        /// Regular expression.
        pattern: String,
    },

    /// The selected number must fall within the (inclusive) range.
    NumberRange {
        /// Lower bound.
        #[serde(skip_serializing_if = "Option::is_none")]
        minimum: Option<Number>,

        /// Upper bound.
        #[serde(skip_serializing_if = "Option::is_none")]
        maximum: Option<Number>,
    },
}

/// The JSON Schema `type` of a filter, as offered by the editor's filter-type
/// selector.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    /// `"type": "array"`
    Array,

    /// `"type": "string"`
    String,

    /// `"type": "number"`
    Number,
}

impl Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Array => write!(f, "array"),
            Self::String => write!(f, "string"),
            Self::Number => write!(f, "number"),
        }
    }
}

impl FromStr for FilterKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "array" => Ok(Self::Array),
            "string" => Ok(Self::String),
            "number" => Ok(Self::Number),
            _ => Err(format!("unknown filter type: {s}")),
        }
    }
}

impl Filter {
    /// A blank filter of the given kind, used when the user first picks a
    /// filter type for a field.
    #[must_use]
    pub const fn empty(kind: FilterKind) -> Self {
        match kind {
            FilterKind::Array => Self::ArrayContainsConst { value: String::new() },
            FilterKind::String => Self::StringPattern { pattern: String::new() },
            FilterKind::Number => Self::NumberRange {
                minimum: None,
                maximum: None,
            },
        }
    }

    /// The JSON Schema `type` of the filter.
    #[must_use]
    pub const fn kind(&self) -> FilterKind {
        match self {
            Self::ArrayContainsConst { .. } => FilterKind::Array,
            Self::StringConst { .. } | Self::StringPattern { .. } => FilterKind::String,
            Self::NumberRange { .. } => FilterKind::Number,
        }
    }

    /// Project the filter to its Presentation Definition JSON shape. The
    /// `type` member always comes first.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("type".into(), Value::String(self.kind().to_string()));

        match self {
            Self::ArrayContainsConst { value } => {
                let mut contains = Map::new();
                contains.insert("const".into(), Value::String(value.clone()));
                obj.insert("contains".into(), Value::Object(contains));
            }
            Self::StringConst { value } => {
                obj.insert("const".into(), Value::String(value.clone()));
            }
            Self::StringPattern { pattern } => {
                obj.insert("pattern".into(), Value::String(pattern.clone()));
            }
            Self::NumberRange { minimum, maximum } => {
                if let Some(min) = minimum {
                    obj.insert("minimum".into(), Value::Number(min.clone()));
                }
                if let Some(max) = maximum {
                    obj.insert("maximum".into(), Value::Number(max.clone()));
                }
            }
        }

        Value::Object(obj)
    }

    /// Parse a Presentation Definition filter. Shapes the editor does not
    /// recognise yield `None`; the field then simply carries no filter.
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let kind = obj.get("type").and_then(Value::as_str)?.parse::<FilterKind>().ok()?;

        match kind {
            FilterKind::Array => {
                let value = obj.get("contains")?.get("const")?.as_str()?;
                Some(Self::ArrayContainsConst { value: value.to_string() })
            }
            FilterKind::String => {
                if let Some(value) = obj.get("const") {
                    return Some(Self::StringConst { value: value.as_str()?.to_string() });
                }
                let pattern = obj.get("pattern")?.as_str()?;
                Some(Self::StringPattern { pattern: pattern.to_string() })
            }
            FilterKind::Number => {
                let minimum = match obj.get("minimum") {
                    Some(v) => Some(number(v)?),
                    None => None,
                };
                let maximum = match obj.get("maximum") {
                    Some(v) => Some(number(v)?),
                    None => None,
                };
                Some(Self::NumberRange { minimum, maximum })
            }
        }
    }
}

// Number inputs in hand-written documents are often quoted.
fn number(value: &Value) -> Option<Number> {
    match value {
        Value::Number(n) => Some(n.clone()),
        Value::String(s) => s.trim().parse::<Number>().ok(),
        _ => None,
    }
}
