//! Type introspection helpers.
//!
//! These utilities perform shallow inspection of `syn::Type` values to
//! recognise `Option<T>` and `Vec<T>` wrappers and to pick the value type a
//! field's element type parses as.

use syn::{GenericArgument, PathArguments, Type};

/// Extract the first type argument from a `PathArguments` container.
fn extract_first_type_argument(args: &PathArguments) -> Option<&Type> {
    let PathArguments::AngleBracketed(angle_args) = args else {
        return None;
    };
    let first = angle_args.args.first()?;
    let GenericArgument::Type(inner) = first else {
        return None;
    };
    Some(inner)
}

/// Final path segment of `ty`, if it is a path type.
fn last_segment(ty: &Type) -> Option<&syn::PathSegment> {
    let Type::Path(p) = ty else {
        return None;
    };
    p.path.segments.last()
}

/// Returns the generic parameter if `ty` is the provided wrapper.
///
/// The check is shallow: only the final path segment is compared, so
/// `std::option::Option<T>` matches as well as `Option<T>`.
fn type_inner<'a>(ty: &'a Type, wrapper: &str) -> Option<&'a Type> {
    let last = last_segment(ty)?;
    if last.ident != wrapper {
        return None;
    }
    extract_first_type_argument(&last.arguments)
}

/// Returns the inner type if `ty` is `Option<T>`.
pub(crate) fn option_inner(ty: &Type) -> Option<&Type> {
    type_inner(ty, "Option")
}

/// Extracts the element type `T` if `ty` is `Vec<T>`.
pub(crate) fn vec_inner(ty: &Type) -> Option<&Type> {
    type_inner(ty, "Vec")
}

/// Name of the `ValueType` variant `ty` parses as.
///
/// Unrecognised types parse as strings and rely on deserialisation into
/// the record.
pub(crate) fn value_kind(ty: &Type) -> &'static str {
    let ident = match ty {
        Type::Reference(reference) => return value_kind(&reference.elem),
        _ => last_segment(ty).map(|seg| seg.ident.to_string()),
    };
    match ident.as_deref() {
        Some("i8" | "i16" | "i32" | "i64" | "i128" | "isize") => "Integer",
        Some("u8" | "u16" | "u32" | "u64" | "u128" | "usize") => "Unsigned",
        Some("f32" | "f64") => "Float",
        Some("bool") => "Bool",
        Some("PathBuf" | "Path" | "Utf8PathBuf" | "Utf8Path") => "Path",
        _ => "String",
    }
}

/// Shape of a field's Rust type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TypeShape {
    /// `ValueType` variant name for the element type.
    pub value_kind: &'static str,
    /// The field is `Option<T>`.
    pub optional: bool,
    /// The field is `Vec<T>` (or `Option<Vec<T>>`).
    pub multiple: bool,
}

/// Classifies `ty` for descriptor generation.
pub(crate) fn shape(ty: &Type) -> TypeShape {
    let (optional, unwrapped) = option_inner(ty).map_or((false, ty), |inner| (true, inner));
    let (multiple, element) = vec_inner(unwrapped).map_or((false, unwrapped), |inner| (true, inner));
    TypeShape {
        value_kind: value_kind(element),
        optional,
        multiple,
    }
}
