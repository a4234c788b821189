//! # Presentation Definition Editor
//!
//! The synchronization engine behind a structured Presentation Definition
//! editor. A flat, editor-friendly [`FieldModel`] is kept interchangeable with
//! the nested JSON [`PresentationDefinition`] document whose shape depends on
//! the selected credential [`Profile`] (JWT-VC, SD-JWT, or mdoc).
//!
//! * [`project`] converts a model to a document. It runs on every structured
//!   edit and never fails.
//! * [`reconcile`] converts edited document text back to a model, merging with
//!   the previous snapshot so hidden entries are never lost. It runs only when
//!   the user commits a raw-JSON edit.
//!
//! [`Session`] wires the two together the way an editor uses them.
//!
//! Specifications:
//! - <https://identity.foundation/presentation-exchange/spec/v2.0.0>
//! - <https://openid.net/specs/openid-4-verifiable-presentations-1_0.html>

pub mod document;
mod error;
pub mod filter;
pub mod model;
pub mod path;
pub mod profile;
pub mod session;
pub mod sync;
pub mod type_field;
pub mod validate;

pub use document::{Constraints, Field, PresentationDefinition};
pub use error::{Error, StructuralError};
pub use filter::{Filter, FilterKind};
pub use model::{Edit, FieldEntry, FieldModel, Settings};
pub use profile::Profile;
pub use session::Session;
pub use sync::{project, project_text, reconcile};
pub use type_field::TypeCheck;
pub use validate::validate;

/// Result type for editor operations.
pub type Result<T> = std::result::Result<T, Error>;
