//! # Synchronization
//!
//! Keeps the field model and the Presentation Definition text interchangeable.
//!
//! [`project`] runs on every structured edit and is total. [`reconcile`] runs
//! when the user commits an edit to the raw JSON; it validates the text and
//! merges it with the previous snapshot so that entries the text cannot show
//! (hidden entries, blank placeholders) survive the round trip.

use serde_json::Value;
use tracing::instrument;

use crate::document::{Constraints, Field, PresentationDefinition, LIMIT_DISCLOSURE_REQUIRED};
use crate::error::Error;
use crate::filter::Filter;
use crate::model::{FieldEntry, FieldModel, Settings};
use crate::path;
use crate::profile::{Codec, Profile};
use crate::type_field;
use crate::validate::validate;
use crate::Result;

/// Project the model to a Presentation Definition.
///
/// The type field comes first (unless the profile has none), followed by every
/// visible entry in editor order. `limit_disclosure` follows the profile's
/// policy.
#[must_use]
#[instrument(level = "debug", skip(model), fields(profile = %model.settings().profile))]
pub fn project(model: &FieldModel) -> PresentationDefinition {
    let settings = model.settings();
    let codec = settings.profile.codec(&settings.mdoc_prefix);

    let type_field = type_field::encode(
        &settings.type_check,
        settings.type_filter.as_deref(),
        settings.profile,
    );
    let mut fields: Vec<Field> = type_field.into_iter().collect();

    for entry in model.fields().iter().filter(|e| e.is_projected()) {
        let path = entry
            .alternatives()
            .iter()
            .map(|name| codec.encode_path(name, entry.has_prefix))
            .collect();
        fields.push(Field {
            path,
            filter: entry.filter.as_ref().map(Filter::to_json),
        });
    }

    let limit_disclosure =
        settings.profile.limit_disclosure().then(|| LIMIT_DISCLOSURE_REQUIRED.to_string());

    PresentationDefinition {
        constraints: Constraints {
            fields,
            limit_disclosure,
        },
    }
}

/// Project the model to indented Presentation Definition text.
#[must_use]
pub fn project_text(model: &FieldModel) -> String {
    project(model).to_json_pretty()
}

/// Reconcile edited Presentation Definition text with the previous snapshot.
///
/// Entries are matched to document fields by normalized path. A matched entry
/// keeps its hidden flag and takes its filter and prefix flag from the
/// document. Unmatched entries are dropped unless the text could never have
/// shown them (hidden, blank, or shadowing the type field). Document fields
/// matching no entry are appended as new visible entries.
///
/// # Errors
///
/// Returns [`Error::Parse`] when the text is not valid JSON (or has members of
/// the wrong JSON type) and [`Error::Structural`] when the validator rejects
/// it. `previous` is never modified.
#[instrument(level = "debug", skip(text, previous))]
pub fn reconcile(text: &str, previous: &FieldModel, profile: Profile) -> Result<FieldModel> {
    let value: Value = serde_json::from_str(text).map_err(|e| Error::parse(&e))?;
    validate(&value, profile)?;
    let pd: PresentationDefinition = serde_json::from_value(value).map_err(|e| Error::parse(&e))?;

    let prev_settings = previous.settings();

    // mdoc namespace comes from the document when it can be recognised
    let mdoc_prefix = if profile == Profile::MsoMdoc {
        path::detect_mdoc_prefix(&pd).unwrap_or_else(|| {
            tracing::warn!("mdoc namespace not found in document, keeping previous");
            prev_settings.mdoc_prefix.clone()
        })
    } else {
        prev_settings.mdoc_prefix.clone()
    };

    let type_check = type_field::decode(&pd, profile);
    for extra in pd.constraints.fields.iter().filter(|f| f.is_type_field()).skip(1) {
        tracing::debug!(path = ?extra.path, "dropping additional type field");
    }
    let decoded: Vec<FieldEntry> = {
        let codec = profile.codec(&mdoc_prefix);
        pd.attribute_fields().filter_map(|f| decode(f, &*codec)).collect()
    };

    let settings = Settings {
        profile,
        limit_disclosure: pd.limit_disclosure_required(),
        type_check: type_check.paths,
        type_filter: type_check.filter,
        mdoc_prefix,
    };
    let fields = merge(previous.fields(), decoded);

    Ok(FieldModel::new(settings).with_fields(fields))
}

// Decode a document field into a visible entry.
fn decode(field: &Field, codec: &dyn Codec) -> Option<FieldEntry> {
    let Some(first) = field.path.first() else {
        tracing::debug!("skipping field without paths");
        return None;
    };
    let has_prefix = codec.decode_path(first).has_prefix;
    let names: Vec<String> = field.path.iter().map(|p| codec.decode_path(p).name).collect();

    let filter = field.filter.as_ref().and_then(|raw| {
        let filter = Filter::from_json(raw);
        if filter.is_none() {
            tracing::debug!(%raw, "dropping unrecognised filter");
        }
        filter
    });

    Some(FieldEntry {
        path: names.join(", "),
        has_prefix,
        is_hidden: false,
        filter,
    })
}

// Merge decoded document entries into the previous entries.
fn merge(previous: &[FieldEntry], decoded: Vec<FieldEntry>) -> Vec<FieldEntry> {
    let keys: Vec<String> = decoded.iter().map(FieldEntry::key).collect();
    let mut claimed = vec![false; decoded.len()];
    let mut matches: Vec<Option<usize>> = vec![None; previous.len()];

    // exact path matches first, visible entries before the ones the text
    // never showed
    for visible in [true, false] {
        for (i, prev) in previous.iter().enumerate() {
            if prev.is_blank() || prev.is_projected() != visible {
                continue;
            }
            let key = prev.key();
            if let Some(j) = (0..decoded.len()).find(|&j| !claimed[j] && keys[j] == key) {
                claimed[j] = true;
                matches[i] = Some(j);
            }
        }
    }

    // visible entries whose alternatives were partly edited in the text
    for (i, prev) in previous.iter().enumerate() {
        if matches[i].is_some() || !prev.is_projected() {
            continue;
        }
        let alternatives = prev.alternatives();
        let overlaps =
            |j: usize| decoded[j].alternatives().iter().any(|a| alternatives.contains(a));
        if let Some(j) = (0..decoded.len()).find(|&j| !claimed[j] && overlaps(j)) {
            claimed[j] = true;
            matches[i] = Some(j);
        }
    }

    let mut merged = Vec::with_capacity(previous.len() + decoded.len());
    for (prev, matched) in previous.iter().zip(&matches) {
        match matched {
            Some(j) => {
                let doc = &decoded[*j];
                merged.push(FieldEntry {
                    path: if doc.key() == prev.key() {
                        prev.path.clone()
                    } else {
                        doc.path.clone()
                    },
                    has_prefix: doc.has_prefix,
                    is_hidden: prev.is_hidden,
                    filter: doc.filter.clone(),
                });
            }
            // the text never showed this entry
            None if !prev.is_projected() => merged.push(prev.clone()),
            None => tracing::debug!(path = %prev.path, "field removed from document"),
        }
    }

    merged.extend(decoded.into_iter().zip(claimed).filter(|(_, c)| !c).map(|(e, _)| e));
    merged
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn entries(paths: &[&str]) -> Vec<FieldEntry> {
        paths.iter().map(|p| FieldEntry::new(*p)).collect()
    }

    #[test]
    fn jwt_projection() {
        let settings = Settings::for_profile(Profile::Jwt).type_filter("EmployeeIDCredential");
        let model = FieldModel::new(settings).with_fields(vec![
            FieldEntry::new("given_name, name"),
            FieldEntry::new("email").hidden(true),
            FieldEntry::new("iss").prefixed(false),
            FieldEntry::default(),
        ]);

        let pd = project(&model);
        assert_eq!(
            serde_json::to_value(&pd).expect("should serialize"),
            json!({
                "constraints": {
                    "fields": [
                        {
                            "path": ["$.type"],
                            "filter": {"type": "array", "contains": {"const": "EmployeeIDCredential"}}
                        },
                        {"path": ["$.credentialSubject.given_name", "$.credentialSubject.name"]},
                        {"path": ["iss"]}
                    ]
                }
            })
        );
    }

    #[test]
    fn type_path_entries_skipped() {
        let model = FieldModel::new(Settings::for_profile(Profile::SdJwt))
            .with_fields(entries(&["$.vct", "family_name"]));
        let pd = project(&model);
        assert_eq!(pd.constraints.fields.len(), 2);
        assert_eq!(pd.constraints.fields[0].path, vec!["$.vct".to_string()]);
        assert_eq!(pd.constraints.fields[1].path, vec!["$.family_name".to_string()]);
        assert!(pd.limit_disclosure_required());
    }

    #[test]
    fn merge_keeps_hidden_and_placeholders() {
        let previous = vec![
            FieldEntry::new("name"),
            FieldEntry::new("email").hidden(true),
            FieldEntry::default(),
            FieldEntry::new("phone"),
        ];
        let decoded = vec![
            FieldEntry::new("age").filter(Filter::NumberRange {
                minimum: Some(18.into()),
                maximum: None,
            }),
            FieldEntry::new("name").prefixed(false),
        ];

        let merged = merge(&previous, decoded);
        assert_eq!(
            merged,
            vec![
                FieldEntry::new("name").prefixed(false),
                FieldEntry::new("email").hidden(true),
                FieldEntry::default(),
                FieldEntry::new("age").filter(Filter::NumberRange {
                    minimum: Some(18.into()),
                    maximum: None,
                }),
            ]
        );
    }

    #[test]
    fn merge_visible_claims_first() {
        let model = FieldModel::new(Settings::for_profile(Profile::SdJwt)).with_fields(vec![
            FieldEntry::new("email").hidden(true).filter(Filter::StringPattern {
                pattern: "old".into(),
            }),
            FieldEntry::new("email").filter(Filter::StringPattern {
                pattern: "@example.com$".into(),
            }),
        ]);

        let reconciled =
            reconcile(&project_text(&model), &model, Profile::SdJwt).expect("should reconcile");
        assert_eq!(reconciled, model);
        assert!(project_text(&reconciled).contains("$.email"));
    }

    #[test]
    fn additional_type_fields_dropped() {
        let text = r#"{"constraints": {"fields": [
            {"path": ["$.type"]},
            {"path": ["$.vct"], "filter": {"type": "string", "const": "PID"}},
            {"path": ["$.credentialSubject.name"]}
        ]}}"#;
        let previous = FieldModel::new(Settings::for_profile(Profile::Jwt));

        let model = reconcile(text, &previous, Profile::Jwt).expect("should reconcile");
        assert_eq!(model.settings().type_check, "");
        assert_eq!(model.settings().type_filter, None);
        assert_eq!(model.fields(), &[FieldEntry::new("name")]);
    }

    #[test]
    fn merge_hidden_match() {
        let previous = vec![FieldEntry::new("email").hidden(true)];
        let decoded = vec![FieldEntry::new("email").filter(Filter::StringPattern {
            pattern: "@example.com$".into(),
        })];

        let merged = merge(&previous, decoded);
        assert_eq!(merged.len(), 1);
        assert!(merged[0].is_hidden);
        assert!(merged[0].filter.is_some());
    }

    #[test]
    fn merge_partial_alternatives() {
        let previous = vec![FieldEntry::new("name, fullName"), FieldEntry::new("email")];
        let decoded = entries(&["email", "name"]);

        let merged = merge(&previous, decoded);
        assert_eq!(merged, entries(&["name", "email"]));
    }

    #[test]
    fn merge_keeps_user_spacing() {
        let previous = vec![FieldEntry::new("name,fullName")];
        let decoded = entries(&["name, fullName"]);
        assert_eq!(merge(&previous, decoded), entries(&["name,fullName"]));
    }

    #[test]
    fn merge_duplicate_fields() {
        let previous = entries(&["name"]);
        let decoded = entries(&["name", "name"]);
        assert_eq!(merge(&previous, decoded), entries(&["name", "name"]));
    }

    #[test]
    fn reconcile_leaves_previous() {
        let previous = FieldModel::new(Settings::for_profile(Profile::Jwt))
            .with_fields(entries(&["name"]));
        let snapshot = previous.clone();

        assert!(matches!(reconcile("{not json", &previous, Profile::Jwt), Err(Error::Parse(_))));
        let wrong_type = r#"{"constraints": {"fields": [{"path": 7}, {"path": "$.type"}]}}"#;
        assert!(matches!(reconcile(wrong_type, &previous, Profile::Jwt), Err(Error::Parse(_))));
        assert_eq!(previous, snapshot);
    }
}
