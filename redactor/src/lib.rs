//! Capability-gated field visibility for nested data.
//!
//! Given a fully populated result and the caller's granted capabilities, the
//! engine withholds every field the caller may not see and leaves everything
//! else untouched. It separates:
//! - **Containers**: [`Redactable<T>`], a field value that is present or withheld.
//! - **Metadata**: a static table per type, generated by `#[derive(Redact)]`,
//!   naming which fields are walked and which capability each one requires.
//! - **Predicates**: [`CapabilityPredicate`], the caller's authority reduced to
//!   `capability -> bool`. The default, [`DenyAll`], is fail-closed.
//! - **Traversal**: [`Applicator`], which walks graphs and sequences and decides
//!   per field whether to withhold or descend.
//!
//! Key rules:
//! - Use `#[redact("capability")]` on `Redactable<T>` fields to gate them.
//! - Use bare `#[redact]` to walk into a field without gating it.
//! - Use `#[redact("capability", opaque)]` to gate a `Redactable<T>` whose
//!   `T` cannot be walked, such as a foreign date or id type.
//! - Unannotated fields pass through unchanged and are never walked.
//! - A visible field's own fields are checked independently on the way down.
//!
//! ```rust
//! use redactor::{CapabilitySet, Redact, Redactable};
//!
//! #[derive(Redact)]
//! struct EmploymentContract {
//!     company: String,
//!     #[redact("salary:read")]
//!     salary: Redactable<u32>,
//! }
//!
//! #[derive(Redact)]
//! struct Employee {
//!     #[redact("contract:read")]
//!     contract: Redactable<EmploymentContract>,
//! }
//!
//! let mut employee = Employee {
//!     contract: Redactable::new(EmploymentContract {
//!         company: "ACME".into(),
//!         salary: Redactable::new(120_000),
//!     }),
//! };
//!
//! let grants: CapabilitySet = ["contract:read"].into_iter().collect();
//! employee.redact_with(&grants).unwrap();
//!
//! let contract = employee.contract.value().unwrap();
//! assert_eq!(contract.company, "ACME");
//! assert!(contract.salary.is_withheld());
//! ```
//!
//! What this crate does not do:
//! - decide who holds which capability
//! - intercept calls or serialize responses
//! - walk cyclic graphs
//!
//! Redaction is in place and irreversible. Pass a copy if you need the original.

// <https://doc.rust-lang.org/rustc/lints/listing/allowed-by-default.html>
#![warn(
    anonymous_parameters,
    bare_trait_objects,
    elided_lifetimes_in_paths,
    missing_copy_implementations,
    rust_2018_idioms,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unsafe_code,
    unused_extern_crates,
    unused_import_braces
)]
// <https://rust-lang.github.io/rust-clippy/stable>
#![warn(
    clippy::all,
    clippy::cargo,
    clippy::dbg_macro,
    clippy::float_cmp_const,
    clippy::get_unwrap,
    clippy::mem_forget,
    clippy::nursery,
    clippy::pedantic,
    clippy::todo,
    clippy::unwrap_used,
    clippy::uninlined_format_args
)]
// Allow some clippy lints
#![allow(
    clippy::default_trait_access,
    clippy::doc_markdown,
    clippy::if_not_else,
    clippy::module_name_repetitions,
    clippy::multiple_crate_versions,
    clippy::must_use_candidate,
    clippy::needless_pass_by_value,
    clippy::needless_ifs,
    clippy::use_self,
    clippy::cargo_common_metadata,
    clippy::missing_errors_doc,
    clippy::enum_glob_use,
    clippy::struct_excessive_bools,
    clippy::missing_const_for_fn,
    clippy::redundant_pub_crate,
    clippy::result_large_err,
    clippy::future_not_send,
    clippy::option_if_let_else,
    clippy::from_over_into,
    clippy::manual_inspect
)]
// Allow some lints while testing
#![cfg_attr(test, allow(clippy::non_ascii_literal, clippy::unwrap_used))]

pub use redactor_derive::Redact;

#[allow(unused_extern_crates)]
extern crate self as redactor;

// Module declarations
pub mod capability;
mod boundary;
mod engine;
mod error;
#[cfg(feature = "json")]
pub mod json;

// Re-exports
pub use boundary::{Redact, Redactor};
pub use capability::{AllowAll, CapabilityPredicate, CapabilitySet, DenyAll};
pub use engine::{
    Applicator, Descend, Describe, FieldMetadata, GraphApplicator, Redactable,
    SequenceApplicator, Shape, Slot, Traverse, Withhold,
};
pub use error::ConfigurationError;
