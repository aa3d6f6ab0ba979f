//! Struct-specific `Describe` derivation.
//!
//! This module builds the field table and accessors for struct fields and
//! collects generic parameters that require trait bounds.

use proc_macro2::{Ident, TokenStream};
use quote::quote;
use syn::{ext::IdentExt, spanned::Spanned, DataStruct, Fields, Member, Result};

use crate::{
    crate_path,
    strategy::parse_field_strategy,
    transform::{describe_field, DeriveContext, FieldInput},
};

pub(crate) struct StructDeriveOutput {
    pub(crate) shape_name_body: TokenStream,
    pub(crate) fields_body: TokenStream,
    pub(crate) field_mut_body: TokenStream,
    pub(crate) used_generics: Vec<Ident>,
}

pub(crate) fn derive_struct(
    name: &Ident,
    data: DataStruct,
    generics: &syn::Generics,
) -> Result<StructDeriveOutput> {
    let mut used_generics = Vec::new();
    let mut ctx = DeriveContext {
        generics,
        used_generics: &mut used_generics,
    };

    let mut entries = Vec::new();
    let members: Vec<(Member, syn::Field)> = match data.fields {
        Fields::Named(fields) => fields
            .named
            .into_iter()
            .map(|field| {
                let ident = field.ident.clone().expect("named field should have an identifier");
                (Member::Named(ident), field)
            })
            .collect(),
        Fields::Unnamed(fields) => fields
            .unnamed
            .into_iter()
            .enumerate()
            .map(|(index, field)| (Member::Unnamed(index.into()), field))
            .collect(),
        Fields::Unit => Vec::new(),
    };

    for (member, field) in &members {
        let strategy = parse_field_strategy(&field.attrs)?;
        let input = FieldInput {
            ty: &field.ty,
            name: member_name(member),
            accessor: entries.len(),
            place: quote! { &mut self.#member },
            span: field.span(),
        };
        if let Some(entry) = describe_field(&mut ctx, input, &strategy)? {
            entries.push(entry);
        }
    }

    let metadata = entries.iter().map(|entry| &entry.metadata);
    let arms = entries.iter().enumerate().map(|(accessor, entry)| {
        let slot = &entry.slot;
        quote! { #accessor => ::core::option::Option::Some(#slot), }
    });

    let metadata_path = crate_path("FieldMetadata");

    Ok(StructDeriveOutput {
        shape_name_body: quote! { ::core::stringify!(#name) },
        fields_body: quote! {
            const FIELDS: &[#metadata_path] = &[ #(#metadata),* ];
            FIELDS
        },
        field_mut_body: quote! {
            match accessor {
                #(#arms)*
                _ => ::core::option::Option::None,
            }
        },
        used_generics,
    })
}

pub(crate) fn member_name(member: &Member) -> String {
    match member {
        Member::Named(ident) => ident.unraw().to_string(),
        Member::Unnamed(index) => index.index.to_string(),
    }
}
