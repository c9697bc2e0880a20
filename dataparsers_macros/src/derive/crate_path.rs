//! Crate path resolution for renamed dependencies.
//!
//! Converts the optional `#[dataparser(crate = "...")]` attribute value into
//! the path generated code uses in place of `dataparsers`.

use proc_macro2::TokenStream;
use quote::quote;

/// Resolve the crate path from the parsed struct attribute.
///
/// Defaults to `::dataparsers` when no override is present.
pub(crate) fn resolve(crate_path: Option<&syn::Path>) -> TokenStream {
    crate_path.map_or_else(|| quote! { ::dataparsers }, |path| quote! { #path })
}

#[cfg(test)]
mod tests {
    //! Unit tests for crate path resolution.

    use super::*;
    use anyhow::{Context, Result, ensure};
    use rstest::rstest;

    #[rstest]
    #[case::default(None, ":: dataparsers")]
    #[case::custom(Some("my_alias"), "my_alias")]
    #[case::nested(Some("vendor::dataparsers"), "vendor :: dataparsers")]
    fn resolve_produces_expected_tokens(
        #[case] input: Option<&str>,
        #[case] expected: &str,
    ) -> Result<()> {
        let parsed = input
            .map(syn::parse_str::<syn::Path>)
            .transpose()
            .context("parse path")?;
        let tokens = resolve(parsed.as_ref()).to_string();
        ensure!(tokens == expected, "expected {expected}, got {tokens}");
        Ok(())
    }
}
