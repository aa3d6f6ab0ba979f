//! Derive macros for `redactor`.
//!
//! This crate generates the field visibility tables behind `#[derive(Redact)]`.
//! It:
//! - reads `#[redact(...)]` field attributes
//! - emits `Describe` and `Traverse` implementations the engine walks at runtime
//!
//! It does **not** decide who may see what. Capabilities are only names here;
//! they are checked against the caller's predicate when the value is redacted.

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

#[allow(unused_extern_crates)]
extern crate proc_macro;

use proc_macro2::TokenStream;
use proc_macro_crate::{crate_name, FoundCrate};
use quote::{format_ident, quote};
use syn::{parse_macro_input, spanned::Spanned, Data, DeriveInput, Result};

mod derive_enum;
mod derive_struct;
mod generics;
mod strategy;
mod transform;
mod types;
use derive_enum::derive_enum;
use derive_struct::derive_struct;
use generics::add_traverse_bounds;

/// Derives `redactor::Describe` and `redactor::Traverse` for structs and enums.
///
/// # Field Attributes
///
/// - **No annotation**: The field is left out of the table. It passes through
///   unchanged and is never walked, so external types like `chrono::DateTime`
///   work without implementing anything.
///
/// - `#[redact]`: The field is always visible and is walked into, so its own
///   gated fields are still checked. `Redactable<T>` fields are unwrapped first.
///   The field type must implement `Traverse`.
///
/// - `#[redact("capability")]`: The field is withheld unless the caller holds
///   `capability`; if granted, it is walked into like `#[redact]`. The field must
///   be declared as `Redactable<T>`, otherwise compilation fails. An empty string
///   is the same as bare `#[redact]`.
///
/// - `#[redact("capability", opaque)]`: Like `#[redact("capability")]`, but a
///   granted value is never walked into, so `T` in `Redactable<T>` can be any
///   type, such as `chrono::NaiveDate` or `uuid::Uuid`.
///
/// Enums get one table per variant, and each variant is its own shape
/// (`Enum::Variant`) for the purpose of sequence homogeneity.
///
/// Unions are rejected at compile time.
#[proc_macro_derive(Redact, attributes(redact))]
pub fn derive_redact(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.into_compile_error().into(),
    }
}

/// Returns the token stream to reference the redactor crate root.
///
/// Handles crate renaming (e.g., `gate = { package = "redactor", ... }`).
/// Inside `redactor` itself the path resolves through its
/// `extern crate self as redactor` alias.
fn crate_root() -> TokenStream {
    match crate_name("redactor") {
        Ok(FoundCrate::Name(name)) => {
            let ident = format_ident!("{}", name);
            quote! { ::#ident }
        }
        Ok(FoundCrate::Itself) | Err(_) => quote! { ::redactor },
    }
}

fn crate_path(item: &str) -> TokenStream {
    let root = crate_root();
    let item_ident = format_ident!("{}", item);
    quote! { #root::#item_ident }
}

struct DeriveOutput {
    shape_name_body: TokenStream,
    fields_body: TokenStream,
    field_mut_body: TokenStream,
    used_generics: Vec<proc_macro2::Ident>,
}

fn expand(input: DeriveInput) -> Result<TokenStream> {
    let DeriveInput {
        ident,
        generics,
        data,
        ..
    } = input;

    let crate_root = crate_root();

    let derive_output = match data {
        Data::Struct(data) => {
            let output = derive_struct(&ident, data, &generics)?;
            DeriveOutput {
                shape_name_body: output.shape_name_body,
                fields_body: output.fields_body,
                field_mut_body: output.field_mut_body,
                used_generics: output.used_generics,
            }
        }
        Data::Enum(data) => {
            let output = derive_enum(&ident, data, &generics)?;
            DeriveOutput {
                shape_name_body: output.shape_name_body,
                fields_body: output.fields_body,
                field_mut_body: output.field_mut_body,
                used_generics: output.used_generics,
            }
        }
        Data::Union(u) => {
            return Err(syn::Error::new(
                u.union_token.span(),
                "`Redact` cannot be derived for unions",
            ));
        }
    };

    let bounded_generics = add_traverse_bounds(generics, &derive_output.used_generics);
    let (impl_generics, ty_generics, where_clause) = bounded_generics.split_for_impl();
    let DeriveOutput {
        shape_name_body,
        fields_body,
        field_mut_body,
        ..
    } = derive_output;

    Ok(quote! {
        impl #impl_generics #crate_root::Describe for #ident #ty_generics #where_clause {
            fn shape_name(&self) -> &'static str {
                #shape_name_body
            }

            fn describe_fields(&self) -> &'static [#crate_root::FieldMetadata] {
                #fields_body
            }

            #[allow(unused_variables, clippy::match_single_binding)]
            fn field_mut(
                &mut self,
                accessor: usize,
            ) -> ::core::option::Option<#crate_root::Slot<'_>> {
                #field_mut_body
            }
        }

        impl #impl_generics #crate_root::Traverse for #ident #ty_generics #where_clause {
            fn shape(&mut self) -> #crate_root::Shape<'_> {
                #crate_root::Shape::Graph(self)
            }
        }
    })
}
