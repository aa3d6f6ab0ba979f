//! Parsing of `#[redact(...)]` field attributes.
//!
//! This module maps attribute syntax to traversal decisions and produces
//! structured errors for invalid forms.

use proc_macro2::Span;
use syn::{
    parse::{ParseStream, Parser},
    spanned::Spanned,
    Attribute, Ident, LitStr, Meta, Result, Token,
};

/// Field visibility strategy based on `#[redact(...)]` attributes.
///
/// ## Strategy Mapping
///
/// | Attribute | Strategy | Behavior |
/// |-----------|----------|----------|
/// | None | `PassThrough` | Not described; never walked |
/// | `#[redact]` | `Walk` | Always visible; walked into |
/// | `#[redact("cap")]` | `Gate` | Withheld unless `cap` is granted, then walked |
/// | `#[redact("cap", opaque)]` | `Gate` (opaque) | Withheld unless `cap` is granted, never walked |
#[derive(Clone, Debug)]
pub(crate) enum Strategy {
    /// No annotation: the field is left out of the table.
    ///
    /// External types like `DateTime<Utc>` work without implementing `Traverse`.
    PassThrough,
    /// Bare `#[redact]` (or an empty capability): walk into the field.
    Walk,
    /// `#[redact("capability")]`: withhold unless the capability is granted.
    Gate {
        capability: LitStr,
        /// The wrapped type is never walked, so it need not implement `Traverse`.
        opaque: bool,
    },
}

fn set_strategy(target: &mut Option<Strategy>, next: Strategy, span: Span) -> Result<()> {
    if target.is_some() {
        return Err(syn::Error::new(
            span,
            "multiple #[redact] attributes specified on the same field",
        ));
    }
    *target = Some(next);
    Ok(())
}

/// Parses `"capability"` optionally followed by `, opaque`.
fn parse_gate(input: ParseStream<'_>) -> Result<Strategy> {
    let capability: LitStr = input.parse().map_err(|err| {
        syn::Error::new(
            err.span(),
            "expected a capability string (e.g., #[redact(\"salary:read\")])",
        )
    })?;

    let mut opaque = false;
    if input.parse::<Option<Token![,]>>()?.is_some() && !input.is_empty() {
        let option: Ident = input.parse()?;
        if option != "opaque" {
            return Err(syn::Error::new(
                option.span(),
                format!("unknown #[redact] option `{option}`, expected `opaque`"),
            ));
        }
        opaque = true;
        input.parse::<Option<Token![,]>>()?;
    }
    if !input.is_empty() {
        return Err(input.error("unexpected tokens in #[redact(...)]"));
    }

    if capability.value().is_empty() {
        // Nothing to gate: an opaque field is then never touched at all.
        return Ok(if opaque {
            Strategy::PassThrough
        } else {
            Strategy::Walk
        });
    }
    Ok(Strategy::Gate { capability, opaque })
}

pub(crate) fn parse_field_strategy(attrs: &[Attribute]) -> Result<Strategy> {
    let mut strategy: Option<Strategy> = None;
    for attr in attrs {
        if !attr.path().is_ident("redact") {
            continue;
        }

        match &attr.meta {
            Meta::Path(_) => {
                set_strategy(&mut strategy, Strategy::Walk, attr.span())?;
            }
            Meta::List(list) => {
                let parsed = parse_gate.parse2(list.tokens.clone())?;
                set_strategy(&mut strategy, parsed, attr.span())?;
            }
            Meta::NameValue(_) => {
                return Err(syn::Error::new(
                    attr.span(),
                    "name-value syntax is not supported for #[redact]",
                ));
            }
        }
    }

    Ok(strategy.unwrap_or(Strategy::PassThrough))
}
