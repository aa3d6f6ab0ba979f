//! Enum-specific `Describe` derivation.
//!
//! Every variant is its own runtime shape with its own field table, named
//! `Enum::Variant`. Accessors are indexed per variant.

use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};
use syn::{spanned::Spanned, DataEnum, Fields, Member, Result};

use crate::{
    crate_path,
    derive_struct::member_name,
    strategy::parse_field_strategy,
    transform::{describe_field, DeriveContext, FieldInput},
};

pub(crate) struct EnumDeriveOutput {
    pub(crate) shape_name_body: TokenStream,
    pub(crate) fields_body: TokenStream,
    pub(crate) field_mut_body: TokenStream,
    pub(crate) used_generics: Vec<Ident>,
}

pub(crate) fn derive_enum(
    name: &Ident,
    data: DataEnum,
    generics: &syn::Generics,
) -> Result<EnumDeriveOutput> {
    let mut used_generics = Vec::new();
    let mut ctx = DeriveContext {
        generics,
        used_generics: &mut used_generics,
    };

    let metadata_path = crate_path("FieldMetadata");
    let mut shape_arms = Vec::new();
    let mut fields_arms = Vec::new();
    let mut field_mut_arms = Vec::new();

    for variant in data.variants {
        let variant_ident = &variant.ident;
        let members: Vec<(Member, syn::Field)> = match variant.fields {
            Fields::Named(fields) => fields
                .named
                .into_iter()
                .map(|field| {
                    let ident = field
                        .ident
                        .clone()
                        .expect("named field should have an identifier");
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

        let mut entries = Vec::new();
        let mut bindings = Vec::new();
        for (member, field) in &members {
            let strategy = parse_field_strategy(&field.attrs)?;
            let binding = format_ident!("field_{}", entries.len());
            let input = FieldInput {
                ty: &field.ty,
                name: member_name(member),
                accessor: entries.len(),
                place: quote! { #binding },
                span: field.span(),
            };
            if let Some(entry) = describe_field(&mut ctx, input, &strategy)? {
                bindings.push(quote! { #member: #binding });
                entries.push(entry);
            }
        }

        shape_arms.push(quote! {
            Self::#variant_ident { .. } => ::core::concat!(
                ::core::stringify!(#name),
                "::",
                ::core::stringify!(#variant_ident)
            )
        });

        let metadata = entries.iter().map(|entry| &entry.metadata);
        fields_arms.push(quote! {
            Self::#variant_ident { .. } => {
                const FIELDS: &[#metadata_path] = &[ #(#metadata),* ];
                FIELDS
            }
        });

        let arms = entries.iter().enumerate().map(|(accessor, entry)| {
            let slot = &entry.slot;
            quote! { #accessor => ::core::option::Option::Some(#slot), }
        });
        field_mut_arms.push(quote! {
            Self::#variant_ident { #(#bindings,)* .. } => match accessor {
                #(#arms)*
                _ => ::core::option::Option::None,
            }
        });
    }

    Ok(EnumDeriveOutput {
        shape_name_body: quote! {
            match *self {
                #(#shape_arms),*
            }
        },
        fields_body: quote! {
            match *self {
                #(#fields_arms),*
            }
        },
        field_mut_body: if field_mut_arms.is_empty() {
            quote! { match *self {} }
        } else {
            quote! {
                match self {
                    #(#field_mut_arms),*
                }
            }
        },
        used_generics,
    })
}
