//! Shared field table generation for struct and enum derivation.
//!
//! Each described field contributes two pieces of code: an entry in the
//! static `FieldMetadata` table and an arm in `field_mut` handing out its
//! `Slot`. Both are indexed by the field's position among described fields.

use proc_macro2::{Ident, Span, TokenStream};
use quote::quote_spanned;
use syn::Result;

use crate::{
    crate_path, generics::collect_generics_from_type, strategy::Strategy,
    types::is_redactable_type,
};

/// Accumulated state during field processing.
pub(crate) struct DeriveContext<'a> {
    pub(crate) generics: &'a syn::Generics,
    pub(crate) used_generics: &'a mut Vec<Ident>,
}

/// Generated code for one described field.
pub(crate) struct FieldEntry {
    /// `FieldMetadata` constructor expression.
    pub(crate) metadata: TokenStream,
    /// `Slot` constructor expression over `place`.
    pub(crate) slot: TokenStream,
}

/// Per-field input to [`describe_field`].
pub(crate) struct FieldInput<'a> {
    pub(crate) ty: &'a syn::Type,
    pub(crate) name: String,
    pub(crate) accessor: usize,
    /// Expression evaluating to `&mut` the field.
    pub(crate) place: TokenStream,
    pub(crate) span: Span,
}

/// Generates the table entry and slot for a single field.
///
/// Returns `None` for pass-through fields, which are left out of the table.
///
/// ## Field Rules
///
/// | Annotation | Field type | Result |
/// |------------|------------|--------|
/// | None | any | Not described |
/// | `#[redact]` | `Redactable<T>` | Wrapped, unrestricted |
/// | `#[redact]` | other | Plain, unrestricted |
/// | `#[redact("cap")]` | `Redactable<T>` | Wrapped, gated |
/// | `#[redact("cap", opaque)]` | `Redactable<T>` | Opaque, gated |
/// | `#[redact("cap", ..)]` | other | Compile error |
pub(crate) fn describe_field(
    ctx: &mut DeriveContext<'_>,
    field: FieldInput<'_>,
    strategy: &Strategy,
) -> Result<Option<FieldEntry>> {
    let FieldInput {
        ty,
        name,
        accessor,
        place,
        span,
    } = field;

    let (capability, opaque) = match strategy {
        Strategy::PassThrough => return Ok(None),
        Strategy::Walk => (None, false),
        Strategy::Gate { capability, opaque } => (Some(capability), *opaque),
    };

    let wrapped = is_redactable_type(ty);
    if capability.is_some() && !wrapped {
        return Err(syn::Error::new(
            span,
            "a field gated by a capability must be declared as `Redactable<T>` so it can be \
            withheld; use bare #[redact] to walk into it without a capability",
        ));
    }

    // Opaque values are only ever withheld, so their type needs no `Traverse` bound.
    if !opaque {
        collect_generics_from_type(ty, ctx.generics, ctx.used_generics);
    }

    let metadata_path = crate_path("FieldMetadata");
    let slot_path = crate_path("Slot");

    let mut metadata = quote_spanned! { span =>
        #metadata_path::new(#name, #accessor)
    };
    if wrapped {
        metadata = quote_spanned! { span => #metadata.wrapped() };
    }
    if let Some(capability) = capability {
        metadata = quote_spanned! { span => #metadata.requires(#capability) };
    }

    let slot = if opaque {
        quote_spanned! { span => #slot_path::Opaque(#place) }
    } else if wrapped {
        quote_spanned! { span => #slot_path::Wrapped(#place) }
    } else {
        quote_spanned! { span => #slot_path::Plain(#place) }
    };

    Ok(Some(FieldEntry { metadata, slot }))
}
