//! # Field Model
//!
//! The editor-friendly view of a Presentation Definition: an ordered list of
//! field entries plus a handful of top-level settings.
//!
//! A [`FieldModel`] is an immutable snapshot. Every user action is an [`Edit`]
//! that produces a new snapshot, leaving the previous one untouched.

use serde::{Deserialize, Serialize};

use crate::filter::Filter;
use crate::profile::Profile;
use crate::type_field;

/// A single user-editable field.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FieldEntry {
    /// Comma-separated attribute names relative to the subject (or
    /// namespace) root, e.g. `"name, fullName"`.
    pub path: String,

    /// Whether the attributes live under the subject (or namespace) root.
    pub has_prefix: bool,

    /// Hidden entries stay in the editor but are left out of the document.
    #[serde(default)]
    pub is_hidden: bool,

    /// Optional constraint on the selected values.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Filter>,
}

impl Default for FieldEntry {
    fn default() -> Self {
        Self {
            path: String::new(),
            has_prefix: true,
            is_hidden: false,
            filter: None,
        }
    }
}

impl FieldEntry {
    /// A visible, prefixed entry for `path`.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Set whether the entry lives under the subject (or namespace) root.
    #[must_use]
    pub fn prefixed(mut self, has_prefix: bool) -> Self {
        self.has_prefix = has_prefix;
        self
    }

    /// Set whether the entry is hidden.
    #[must_use]
    pub fn hidden(mut self, is_hidden: bool) -> Self {
        self.is_hidden = is_hidden;
        self
    }

    /// Set the entry's filter.
    #[must_use]
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// The entry's trimmed, non-blank path alternatives.
    #[must_use]
    pub fn alternatives(&self) -> Vec<String> {
        type_field::split(&self.path)
    }

    /// Normalized path used to match entries against document fields.
    #[must_use]
    pub fn key(&self) -> String {
        self.alternatives().join(", ")
    }

    /// An editor placeholder with nothing to project.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.alternatives().is_empty()
    }

    /// Whether the entry appears in the projected document.
    #[must_use]
    pub fn is_projected(&self) -> bool {
        let alternatives = self.alternatives();
        !self.is_hidden
            && !alternatives.is_empty()
            && !alternatives.iter().any(|p| type_field::is_type_path(p))
    }
}

/// Top-level editor settings.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Credential profile.
    pub profile: Profile,

    /// The user's limit-disclosure toggle. Projection follows the profile's
    /// policy instead; see [`Profile::limit_disclosure`].
    pub limit_disclosure: bool,

    /// Comma-separated type paths. Empty uses the profile default.
    pub type_check: String,

    /// Expected credential type.
    pub type_filter: Option<String>,

    /// mdoc namespace, e.g. `org.iso.18013.5.1`.
    pub mdoc_prefix: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self::for_profile(Profile::default())
    }
}

impl Settings {
    /// Default settings for `profile`, with `limit_disclosure` matching the
    /// profile's policy.
    #[must_use]
    pub fn for_profile(profile: Profile) -> Self {
        Self {
            profile,
            limit_disclosure: profile.limit_disclosure(),
            type_check: String::new(),
            type_filter: None,
            mdoc_prefix: String::new(),
        }
    }

    /// Set the expected credential type.
    #[must_use]
    pub fn type_filter(mut self, value: impl Into<String>) -> Self {
        self.type_filter = Some(value.into()).filter(|v: &String| !v.is_empty());
        self
    }

    /// Set the type paths.
    #[must_use]
    pub fn type_check(mut self, paths: impl Into<String>) -> Self {
        self.type_check = paths.into();
        self
    }

    /// Set the mdoc namespace.
    #[must_use]
    pub fn mdoc_prefix(mut self, namespace: impl Into<String>) -> Self {
        self.mdoc_prefix = namespace.into();
        self
    }
}

/// A snapshot of the editor's fields and settings.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct FieldModel {
    fields: Vec<FieldEntry>,
    settings: Settings,
}

/// A user action on the structured editor.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Edit {
    /// Append a blank placeholder entry.
    AddField,

    /// Append the given entry.
    Append {
        /// Entry to append.
        entry: FieldEntry,
    },

    /// Remove the entry at `index`.
    Remove {
        /// Entry position.
        index: usize,
    },

    /// Replace the path of the entry at `index`.
    SetPath {
        /// Entry position.
        index: usize,
        /// New comma-separated path.
        path: String,
    },

    /// Set the prefix flag of the entry at `index`.
    SetPrefix {
        /// Entry position.
        index: usize,
        /// New flag.
        has_prefix: bool,
    },

    /// Replace (or clear) the filter of the entry at `index`.
    SetFilter {
        /// Entry position.
        index: usize,
        /// New filter.
        filter: Option<Filter>,
    },

    /// Flip the hidden flag of the entry at `index`.
    ToggleHidden {
        /// Entry position.
        index: usize,
    },

    /// Switch credential profile.
    SetProfile {
        /// New profile.
        profile: Profile,
    },

    /// Replace the type paths.
    SetTypeCheck {
        /// Comma-separated type paths.
        paths: String,
    },

    /// Replace (or clear) the expected credential type.
    SetTypeFilter {
        /// Expected type.
        value: Option<String>,
    },

    /// Replace the mdoc namespace.
    SetMdocPrefix {
        /// Namespace.
        namespace: String,
    },

    /// Set the limit-disclosure toggle.
    SetLimitDisclosure {
        /// New toggle value.
        required: bool,
    },
}

impl FieldModel {
    /// An empty model with the given settings.
    #[must_use]
    pub const fn new(settings: Settings) -> Self {
        Self {
            fields: Vec::new(),
            settings,
        }
    }

    /// Replace the model's entries.
    #[must_use]
    pub fn with_fields(mut self, fields: Vec<FieldEntry>) -> Self {
        self.fields = fields;
        self
    }

    /// Entries in editor order.
    #[must_use]
    pub fn fields(&self) -> &[FieldEntry] {
        &self.fields
    }

    /// Top-level settings.
    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Produce the snapshot resulting from `edit`. Edits addressing an entry
    /// that does not exist leave the snapshot unchanged.
    #[must_use]
    pub fn apply(&self, edit: Edit) -> Self {
        let mut next = self.clone();

        match edit {
            Edit::AddField => next.fields.push(FieldEntry::default()),
            Edit::Append { entry } => next.fields.push(entry),
            Edit::Remove { index } => {
                if index < next.fields.len() {
                    next.fields.remove(index);
                } else {
                    tracing::debug!(index, "remove: no such field");
                }
            }
            Edit::SetPath { index, path } => next.update(index, |e| e.path = path),
            Edit::SetPrefix { index, has_prefix } => {
                next.update(index, |e| e.has_prefix = has_prefix);
            }
            Edit::SetFilter { index, filter } => next.update(index, |e| e.filter = filter),
            Edit::ToggleHidden { index } => next.update(index, |e| e.is_hidden = !e.is_hidden),
            Edit::SetProfile { profile } => next.settings.profile = profile,
            Edit::SetTypeCheck { paths } => next.settings.type_check = paths,
            Edit::SetTypeFilter { value } => {
                next.settings.type_filter = value.filter(|v| !v.is_empty());
            }
            Edit::SetMdocPrefix { namespace } => next.settings.mdoc_prefix = namespace,
            Edit::SetLimitDisclosure { required } => next.settings.limit_disclosure = required,
        }

        next
    }

    fn update(&mut self, index: usize, f: impl FnOnce(&mut FieldEntry)) {
        match self.fields.get_mut(index) {
            Some(entry) => f(entry),
            None => tracing::debug!(index, "update: no such field"),
        }
    }
}
