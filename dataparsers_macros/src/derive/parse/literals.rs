//! Literal parsing helpers for derive attributes.

use syn::meta::ParseNestedMeta;
use syn::{Lit, LitStr, Token};

use super::GroupKeyLit;

/// Parses a literal from an attribute using `extractor`.
///
/// # Examples
///
/// ```ignore
/// # use syn::meta::ParseNestedMeta;
/// # use syn::{Lit, LitStr};
/// # fn demo(meta: &ParseNestedMeta) -> syn::Result<()> {
/// let s: LitStr = parse_lit(meta, "help", "a string", |lit| match lit {
///     Lit::Str(s) => Some(s),
///     _ => None,
/// })?;
/// # Ok(())
/// # }
/// ```
fn parse_lit<T, F>(meta: &ParseNestedMeta, key: &str, expected: &str, extractor: F) -> syn::Result<T>
where
    F: FnOnce(Lit) -> Option<T>,
{
    let literal = meta.value()?.parse::<Lit>()?;
    let span = literal.span();
    extractor(literal).ok_or_else(|| syn::Error::new(span, format!("{key} must be {expected}")))
}

/// Parses a string literal from an attribute.
pub(crate) fn lit_str(meta: &ParseNestedMeta, key: &str) -> syn::Result<LitStr> {
    parse_lit(meta, key, "a string", |lit| match lit {
        Lit::Str(s) => Some(s),
        _ => None,
    })
}

/// Parses a boolean literal from an attribute.
pub(crate) fn lit_bool(meta: &ParseNestedMeta, key: &str) -> syn::Result<bool> {
    parse_lit(meta, key, "a boolean", |lit| match lit {
        Lit::Bool(b) => Some(b.value),
        _ => None,
    })
}

/// Parses `key` or `key = <bool>`; the bare form means `true`.
pub(crate) fn switch(meta: &ParseNestedMeta, key: &str) -> syn::Result<bool> {
    if meta.input.peek(Token![=]) {
        lit_bool(meta, key)
    } else {
        Ok(true)
    }
}

/// Parses a group key written as a string or an integer.
pub(crate) fn lit_group_key(meta: &ParseNestedMeta, key: &str) -> syn::Result<GroupKeyLit> {
    let literal = meta.value()?.parse::<Lit>()?;
    match literal {
        Lit::Str(s) => Ok(GroupKeyLit::Name(s.value())),
        Lit::Int(i) => Ok(GroupKeyLit::Index(i.base10_parse()?)),
        other => Err(syn::Error::new(
            other.span(),
            format!("{key} must be a string or an integer"),
        )),
    }
}

/// Parses a `nargs` marker written as a string (`"?"`, `"+"`) or a count.
pub(crate) fn lit_nargs(meta: &ParseNestedMeta) -> syn::Result<String> {
    let literal = meta.value()?.parse::<Lit>()?;
    match literal {
        Lit::Str(s) => Ok(s.value()),
        Lit::Int(i) => Ok(i.base10_digits().to_owned()),
        other => Err(syn::Error::new(
            other.span(),
            "nargs must be a string or an integer",
        )),
    }
}
