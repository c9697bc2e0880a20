//! Input parsing for the `DataParser` derive macro.
//!
//! This module gathers the struct identifier, fields, and attribute metadata
//! in one pass so macro expansion can fail fast with useful errors.

use syn::{Data, DeriveInput, Fields};

use super::{FieldAttrs, StructAttrs, parse_field_attrs, parse_struct_attrs};

/// Gathers information from the user-provided struct.
///
/// The returned tuple contains the struct identifier, its named fields, the
/// struct-level attributes, and one [`FieldAttrs`] per field in declaration
/// order.
pub(crate) fn parse_input(
    input: &DeriveInput,
) -> syn::Result<(syn::Ident, Vec<syn::Field>, StructAttrs, Vec<FieldAttrs>)> {
    let ident = input.ident.clone();
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "DataParser cannot be derived for generic structs",
        ));
    }
    let struct_attrs = parse_struct_attrs(&input.attrs)?;
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => named.named.iter().cloned().collect::<Vec<_>>(),
            _ => {
                return Err(syn::Error::new_spanned(
                    data.struct_token,
                    "DataParser requires named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                ident,
                "DataParser can only be derived for structs",
            ));
        }
    };

    let field_attrs = fields
        .iter()
        .map(|f| parse_field_attrs(&f.attrs))
        .collect::<syn::Result<Vec<_>>>()?;
    Ok((ident, fields, struct_attrs, field_attrs))
}
