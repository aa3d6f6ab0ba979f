//! Field visibility containers, metadata, and traversal.
//!
//! This module ties the pieces together:
//!
//! - **`redactable`**: Domain layer - the present/withheld container (`Redactable`)
//! - **`metadata`**: Contract layer - what a type declares (`Describe`, `Traverse`)
//! - **`applicator`**: Application layer - the recursive walk (`Applicator`)
//!
//! Capability predicates live in `crate::capability`.

mod applicator;
mod metadata;
mod redactable;

pub(crate) use applicator::Context;
pub use applicator::{Applicator, GraphApplicator, SequenceApplicator};
pub use metadata::{Describe, FieldMetadata, Shape, Slot, Traverse};
pub use redactable::{Descend, Redactable, Withhold};
