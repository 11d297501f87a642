//! The provider interface the engine queries.
//!
//! Anything that can resolve declaration identifiers can back the engine.
//! [`DeclarationGraph`](crate::DeclarationGraph) is the in-memory provider.

use std::sync::Arc;

use heritage_foundation::{
    ClassId, Error, FieldId, MethodId, NameId, ParameterRef, Result, TagInstance,
};

use crate::class::{ClassDecl, ClassKind, TagTypeInfo};
use crate::declaration::{Declaration, Tagged};
use crate::member::{FieldDecl, MethodDecl, ParameterDecl};

/// A loaded declaration graph.
///
/// Lookups fail with an unresolved-type error when a referenced type has a
/// name but was never loaded.
pub trait DeclarationSource: Send + Sync {
    /// Resolves a class.
    ///
    /// # Errors
    ///
    /// Returns an error if the class is unknown or unresolved.
    fn class(&self, id: ClassId) -> Result<&ClassDecl>;

    /// Resolves a field.
    ///
    /// # Errors
    ///
    /// Returns an error if the field is unknown.
    fn field(&self, id: FieldId) -> Result<&FieldDecl>;

    /// Resolves a method.
    ///
    /// # Errors
    ///
    /// Returns an error if the method is unknown.
    fn method(&self, id: MethodId) -> Result<&MethodDecl>;

    /// Resolves an interned name. Unknown names resolve to `""`.
    fn name(&self, id: NameId) -> &str;

    /// Returns the qualified name of a class, resolved or not.
    fn class_name(&self, id: ClassId) -> &str;

    /// The universal root supertype, never searched.
    fn root_class(&self) -> Option<ClassId>;

    /// The interface every tag type implements, never searched.
    fn marker_interface(&self) -> Option<ClassId>;

    /// Packages whose tag types are never searched for meta-tags.
    fn reserved_namespaces(&self) -> &[Arc<str>];

    /// Resolves a parameter.
    ///
    /// # Errors
    ///
    /// Returns an error if the method is unknown or has no such parameter.
    fn parameter(&self, r: ParameterRef) -> Result<&ParameterDecl> {
        self.method(r.method)?
            .parameters
            .get(r.index as usize)
            .ok_or_else(|| Error::unknown_declaration(format!("{r:?}")))
    }

    /// Returns the directly attached tags of any declaration.
    ///
    /// # Errors
    ///
    /// Returns an error if the declaration cannot be resolved.
    fn direct_tags(&self, decl: Declaration) -> Result<&[TagInstance]> {
        Ok(match decl {
            Declaration::Class(id) => self.class(id)?.direct_tags(),
            Declaration::Field(id) => self.field(id)?.direct_tags(),
            Declaration::Method(id) => self.method(id)?.direct_tags(),
            Declaration::Parameter(r) => self.parameter(r)?.direct_tags(),
        })
    }

    /// Returns the tag type information of a tag type.
    ///
    /// # Errors
    ///
    /// Returns an error if the class cannot be resolved or is not a tag type.
    fn tag_info(&self, id: ClassId) -> Result<&TagTypeInfo> {
        self.class(id)?
            .tag_info
            .as_ref()
            .ok_or_else(|| Error::not_a_tag_type(self.class_name(id)))
    }

    /// Returns true if `class` is present and is not the root type.
    fn is_searchable(&self, class: Option<ClassId>) -> bool {
        class.is_some_and(|c| Some(c) != self.root_class())
    }

    /// Returns the package of a class (empty for the default package).
    fn package_of(&self, id: ClassId) -> &str {
        self.class_name(id)
            .rsplit_once('.')
            .map_or("", |(package, _)| package)
    }

    /// Returns true if the tag type lives in a reserved namespace.
    fn is_reserved_tag_type(&self, id: ClassId) -> bool {
        let package = self.package_of(id);
        self.reserved_namespaces().iter().any(|ns| {
            package
                .strip_prefix(&**ns)
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
        })
    }

    /// Returns true if a value of type `from` can be used where `to` is expected.
    ///
    /// Unresolvable supertypes are treated as unrelated.
    fn is_assignable(&self, from: ClassId, to: ClassId) -> bool {
        if from == to {
            return true;
        }
        let Ok(class) = self.class(from) else {
            return false;
        };
        if class.kind == ClassKind::Primitive {
            return false;
        }
        if Some(to) == self.root_class() {
            return true;
        }
        class.superclass.is_some_and(|s| self.is_assignable(s, to))
            || class.interfaces.iter().any(|&i| self.is_assignable(i, to))
    }
}
