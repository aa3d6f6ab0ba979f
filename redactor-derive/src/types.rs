//! Type utilities for the derive macro.

/// Checks if a type is spelled as `Redactable<..>`.
///
/// Matches on the last path segment, so `redactor::Redactable<T>` is
/// recognized too. Type aliases are not: a capability on an aliased container
/// is rejected and the field must be spelled out.
pub(crate) fn is_redactable_type(ty: &syn::Type) -> bool {
    let syn::Type::Path(path) = ty else {
        return false;
    };

    if path.qself.is_some() {
        return false;
    }

    let Some(segment) = path.path.segments.last() else {
        return false;
    };

    segment.ident == "Redactable"
        && matches!(segment.arguments, syn::PathArguments::AngleBracketed(_))
}
