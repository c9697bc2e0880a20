//! Expansion of `#[derive(DataParser)]`.

use proc_macro2::TokenStream;
use syn::DeriveInput;

mod crate_path;
mod generate;
mod parse;

/// Parses the annotated struct and emits its trait implementation.
pub(crate) fn expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    let (ident, fields, struct_attrs, field_attrs) = parse::parse_input(input)?;
    let krate = crate_path::resolve(struct_attrs.crate_path.as_ref());
    generate::generate_impl(&ident, &krate, &fields, &struct_attrs, &field_attrs)
}

#[cfg(test)]
mod tests;
