//! Deterministic member ordering.
//!
//! Declared members are sorted by a 32-bit polynomial hash of their name,
//! then by name, then by signature. The order is stable across runs but
//! deliberately not alphabetical.

use heritage_model::{DeclarationSource, FieldDecl, MethodDecl};

/// Returns the wrapping `h = 31 * h + c` hash of a name over UTF-16 units.
#[must_use]
pub fn name_hash(name: &str) -> i32 {
    name.encode_utf16()
        .fold(0_i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)))
}

/// Renders a method signature as `declaring.name(param, ...)`.
pub fn method_signature<S: DeclarationSource + ?Sized>(source: &S, method: &MethodDecl) -> String {
    let params: Vec<&str> = method
        .parameter_types()
        .map(|ty| source.class_name(ty))
        .collect();
    format!(
        "{}.{}({})",
        source.class_name(method.declaring),
        source.name(method.name),
        params.join(",")
    )
}

/// Sorts methods into declared-member order.
pub fn sort_methods<S: DeclarationSource + ?Sized>(source: &S, methods: &mut [&MethodDecl]) {
    methods.sort_by_cached_key(|m| {
        let name = source.name(m.name);
        (name_hash(name), name.to_owned(), method_signature(source, m))
    });
}

/// Sorts fields into declared-member order.
pub fn sort_fields<S: DeclarationSource + ?Sized>(source: &S, fields: &mut [&FieldDecl]) {
    fields.sort_by_cached_key(|f| {
        let name = source.name(f.name);
        (name_hash(name), name.to_owned())
    });
}
