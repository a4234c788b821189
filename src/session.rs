//! # Editor Session
//!
//! Holds the editor's current snapshot and the Presentation Definition text
//! derived from it.
//!
//! Structured edits are applied immediately and the text is re-projected on
//! every one. Raw-JSON edits happen in a draft that is only reconciled when
//! the user commits it; until then the snapshot is untouched.
//!
//! # Example
//!
//! ```rust
//! use vercre_pd_editor::{Edit, FieldEntry, Profile, Session, Settings};
//!
//! let mut session = Session::new(Settings::for_profile(Profile::SdJwt));
//! session.apply(Edit::Append { entry: FieldEntry::new("family_name") });
//!
//! session.open();
//! session.edit_draft(r#"{"constraints": {"fields": [{"path": ["$.vct"]}]}}"#)
//!     .expect("should preview");
//! let model = session.commit().expect("should reconcile");
//! assert!(model.fields().is_empty());
//! ```

use tracing::instrument;

use crate::document::PresentationDefinition;
use crate::error::Error;
use crate::model::{Edit, FieldModel, Settings};
use crate::sync::{project, project_text, reconcile};
use crate::type_field::{self, TypeCheck};
use crate::Result;

/// A single editing session.
#[derive(Clone, Debug, Default)]
pub struct Session {
    model: FieldModel,
    text: String,
    draft: Option<String>,
}

impl Session {
    /// Start a session with no fields.
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        Self::from_model(FieldModel::new(settings))
    }

    /// Start a session from an existing snapshot.
    #[must_use]
    pub fn from_model(model: FieldModel) -> Self {
        let text = project_text(&model);
        Self {
            model,
            text,
            draft: None,
        }
    }

    /// The current snapshot.
    #[must_use]
    pub const fn model(&self) -> &FieldModel {
        &self.model
    }

    /// Presentation Definition text for the current snapshot.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The raw-JSON draft, when one is open.
    #[must_use]
    pub fn draft(&self) -> Option<&str> {
        self.draft.as_deref()
    }

    /// Apply a structured edit and re-project the text.
    pub fn apply(&mut self, edit: Edit) -> &str {
        self.model = self.model.apply(edit);
        self.text = project_text(&self.model);
        &self.text
    }

    /// Open the raw-JSON editor, seeding the draft with the current text.
    pub fn open(&mut self) -> &str {
        self.text = project_text(&self.model);
        self.draft.insert(self.text.clone())
    }

    /// Replace the draft text and preview the type check it declares.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] when the draft is not a readable Presentation
    /// Definition. The draft is kept either way.
    pub fn edit_draft(&mut self, text: impl Into<String>) -> Result<TypeCheck> {
        let text: &str = self.draft.insert(text.into());
        let pd: PresentationDefinition =
            serde_json::from_str(text).map_err(|e| Error::parse(&e))?;
        Ok(type_field::decode(&pd, self.model.settings().profile))
    }

    /// Reconcile the draft into a new snapshot and close the draft.
    ///
    /// Without an open draft this is a no-op.
    ///
    /// # Errors
    ///
    /// Returns the reconciliation error when the draft is rejected. The
    /// snapshot, its text, and the draft are left as they were.
    #[instrument(level = "debug", skip(self))]
    pub fn commit(&mut self) -> Result<&FieldModel> {
        let Some(draft) = &self.draft else {
            return Ok(&self.model);
        };

        match reconcile(draft, &self.model, self.model.settings().profile) {
            Ok(model) => {
                self.model = model;
                self.text = project_text(&self.model);
                self.draft = None;
                Ok(&self.model)
            }
            Err(e) => {
                tracing::warn!(reason = %e.reason(), "draft rejected");
                Err(e)
            }
        }
    }

    /// Discard the draft without reconciling it.
    pub fn cancel(&mut self) {
        self.draft = None;
    }

    /// The Presentation Definition for the current snapshot.
    #[must_use]
    pub fn submit(&self) -> PresentationDefinition {
        project(&self.model)
    }
}
