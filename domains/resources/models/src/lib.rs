//! Resource definitions, stored documents and the validation routine that
//! every resource shares.

pub mod definition;
pub mod document;
mod patterns;
pub mod validation;

pub use definition::{
    CreateReply, DefaultValue, DeleteReply, FieldKind, FieldSpec,
    GuardPolicy, Operation, ResourceDefinition, Rule, Transform, UpdateMode,
};
pub use document::{Document, DocumentId, InvalidIdentifier};
pub use patterns::Pattern;
pub use validation::{ValidationMode, Violation, validate};
