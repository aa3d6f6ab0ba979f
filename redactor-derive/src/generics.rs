//! Generic type parameter handling and trait bound management.
//!
//! Only generics that appear in described fields get a `Traverse` bound.
//! Pass-through fields never constrain their type parameters.
//!
//! ## PhantomData Handling
//!
//! `PhantomData<T>` is skipped when collecting generics:
//!
//! ```ignore
//! #[derive(Redact)]
//! struct Page<T> {
//!     #[redact]
//!     items: Vec<Row>,
//!     _marker: PhantomData<T>,  // T should NOT require Traverse
//! }
//! ```

use syn::{parse_quote, Ident};

use crate::crate_path;

pub(crate) fn collect_generics_from_type(
    ty: &syn::Type,
    generics: &syn::Generics,
    result: &mut Vec<Ident>,
) {
    match ty {
        syn::Type::Path(path) => {
            let Some(segment) = path.path.segments.last() else {
                return;
            };
            if segment.ident == "PhantomData" {
                return;
            }

            if let syn::PathArguments::AngleBracketed(args) = &segment.arguments {
                for arg in &args.args {
                    if let syn::GenericArgument::Type(inner_ty) = arg {
                        collect_generics_from_type(inner_ty, generics, result);
                    }
                }
            }

            for param in generics.type_params() {
                if segment.ident == param.ident && !result.iter().any(|g| g == &param.ident) {
                    result.push(param.ident.clone());
                }
            }
        }
        syn::Type::Array(array) => collect_generics_from_type(&array.elem, generics, result),
        syn::Type::Slice(slice) => collect_generics_from_type(&slice.elem, generics, result),
        syn::Type::Paren(paren) => collect_generics_from_type(&paren.elem, generics, result),
        syn::Type::Group(group) => collect_generics_from_type(&group.elem, generics, result),
        _ => {}
    }
}

/// Adds `Traverse` bounds to generic parameters used in described fields.
pub(crate) fn add_traverse_bounds(
    mut generics: syn::Generics,
    used_generics: &[Ident],
) -> syn::Generics {
    for param in generics.type_params_mut() {
        if used_generics.iter().any(|g| g == &param.ident) {
            let traverse_path = crate_path("Traverse");
            param.bounds.push(parse_quote!(#traverse_path));
        }
    }
    generics
}

#[cfg(test)]
mod tests {
    use quote::quote;
    use syn::DeriveInput;

    use super::*;

    fn generics_of(tokens: proc_macro2::TokenStream) -> syn::Generics {
        let input: DeriveInput = syn::parse2(tokens).expect("should parse as DeriveInput");
        input.generics
    }

    fn collect(ty: proc_macro2::TokenStream, generics: &syn::Generics) -> Vec<String> {
        let ty: syn::Type = syn::parse2(ty).expect("should parse as Type");
        let mut result = Vec::new();
        collect_generics_from_type(&ty, generics, &mut result);
        result.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn nested_generic_is_collected() {
        let generics = generics_of(quote! { struct Page<T, U> { a: T, b: U } });
        assert_eq!(collect(quote! { Vec<Redactable<T>> }, &generics), ["T"]);
    }

    #[test]
    fn phantom_data_is_skipped() {
        let generics = generics_of(quote! { struct Page<T> { a: T } });
        assert!(collect(quote! { PhantomData<T> }, &generics).is_empty());
    }

    #[test]
    fn array_element_is_collected() {
        let generics = generics_of(quote! { struct Pair<T> { a: T } });
        assert_eq!(collect(quote! { [T; 2] }, &generics), ["T"]);
    }

    #[test]
    fn duplicates_are_collected_once() {
        let generics = generics_of(quote! { struct Map<T> { a: T } });
        assert_eq!(collect(quote! { BTreeMap<T, T> }, &generics), ["T"]);
    }
}
