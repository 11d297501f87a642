//! Field, method, and parameter declarations.

use heritage_foundation::{ClassId, FieldId, MethodId, NameId, TagInstance};

use crate::class::{Modifiers, Visibility};

/// A type use in a member signature.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TypeRef {
    /// The erased class.
    pub class: ClassId,
    /// True if the source signature used a type variable here.
    pub type_variable: bool,
}

impl TypeRef {
    /// A concrete type use.
    #[must_use]
    pub const fn of(class: ClassId) -> Self {
        Self {
            class,
            type_variable: false,
        }
    }

    /// A type variable erased to `bound`.
    #[must_use]
    pub const fn variable(bound: ClassId) -> Self {
        Self {
            class: bound,
            type_variable: true,
        }
    }
}

/// A field declared by a class.
#[derive(Clone, Debug)]
pub struct FieldDecl {
    /// This field's identifier.
    pub id: FieldId,
    /// Field name.
    pub name: NameId,
    /// The declaring class.
    pub declaring: ClassId,
    /// Field type.
    pub ty: TypeRef,
    /// Access level.
    pub visibility: Visibility,
    /// Modifier flags.
    pub modifiers: Modifiers,
    /// Directly attached tags in order.
    pub tags: Vec<TagInstance>,
}

/// A method parameter.
#[derive(Clone, Debug)]
pub struct ParameterDecl {
    /// Zero-based position.
    pub index: u32,
    /// Parameter name, when recorded.
    pub name: Option<NameId>,
    /// Parameter type.
    pub ty: TypeRef,
    /// Directly attached tags in order.
    pub tags: Vec<TagInstance>,
}

/// A method declared by a class or interface.
#[derive(Clone, Debug)]
pub struct MethodDecl {
    /// This method's identifier.
    pub id: MethodId,
    /// Method name.
    pub name: NameId,
    /// The declaring class.
    pub declaring: ClassId,
    /// Parameters in order.
    pub parameters: Vec<ParameterDecl>,
    /// Return type; `None` for `void`.
    pub return_type: Option<TypeRef>,
    /// Access level.
    pub visibility: Visibility,
    /// Modifier flags.
    pub modifiers: Modifiers,
    /// Directly attached tags in order.
    pub tags: Vec<TagInstance>,
}

impl MethodDecl {
    /// Returns the number of parameters.
    #[must_use]
    pub fn parameter_count(&self) -> usize {
        self.parameters.len()
    }

    /// Returns the erased parameter types in order.
    pub fn parameter_types(&self) -> impl Iterator<Item = ClassId> + '_ {
        self.parameters.iter().map(|p| p.ty.class)
    }

    /// Returns true if any parameter is declared with a type variable.
    #[must_use]
    pub fn is_generic(&self) -> bool {
        self.parameters.iter().any(|p| p.ty.type_variable)
    }

    /// Returns true if the method has exactly these erased parameter types.
    #[must_use]
    pub fn has_parameter_types(&self, types: &[ClassId]) -> bool {
        self.parameters.len() == types.len() && self.parameter_types().eq(types.iter().copied())
    }

    /// Returns true if this method has the same name and erased parameter
    /// types as `other`.
    #[must_use]
    pub fn same_signature(&self, other: &MethodDecl) -> bool {
        self.name == other.name && self.parameter_types().eq(other.parameter_types())
    }
}
