//! Procedural macros for `dataparsers`.
//!
//! `#[derive(DataParser)]` turns a struct with named fields into a
//! `dataparsers::DataParser` implementation. Each field becomes one field
//! descriptor, in declaration order, and struct-level `#[dataparser(...)]`
//! attributes become the record's parser configuration.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod derive;

/// Derive macro for `dataparsers::DataParser`.
#[proc_macro_derive(DataParser, attributes(dataparser))]
pub fn derive_data_parser(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive::expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
