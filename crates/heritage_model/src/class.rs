//! Class declarations and the modifiers shared with members.

use heritage_foundation::{AttrType, ClassId, FieldId, MethodId, NameId, TagInstance};

/// What kind of type a class declaration describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClassKind {
    /// A concrete or abstract class.
    Class,
    /// An interface.
    Interface,
    /// A tag (annotation) type.
    TagType,
    /// A primitive type, only assignable to itself.
    Primitive,
}

/// Access level of a class or member.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    /// Visible everywhere.
    #[default]
    Public,
    /// Visible to subclasses and the same package.
    Protected,
    /// Visible within the declaring package only.
    Package,
    /// Visible within the declaring class only.
    Private,
}

/// Modifier flags of a class or member.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers(u8);

impl Modifiers {
    /// No modifiers.
    pub const NONE: Modifiers = Modifiers(0);
    /// `static`
    pub const STATIC: Modifiers = Modifiers(1);
    /// `final`
    pub const FINAL: Modifiers = Modifiers(1 << 1);
    /// `abstract`
    pub const ABSTRACT: Modifiers = Modifiers(1 << 2);
    /// Concrete method declared on an interface.
    pub const DEFAULT: Modifiers = Modifiers(1 << 3);
    /// Compiler-generated member, never reported by walks.
    pub const SYNTHETIC: Modifiers = Modifiers(1 << 4);

    /// Returns the union of two modifier sets.
    #[must_use]
    pub const fn union(self, other: Modifiers) -> Modifiers {
        Modifiers(self.0 | other.0)
    }

    /// Returns true if all flags of `other` are set.
    #[must_use]
    pub const fn contains(self, other: Modifiers) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns true if `static` is set.
    #[must_use]
    pub const fn is_static(self) -> bool {
        self.contains(Self::STATIC)
    }

    /// Returns true if `final` is set.
    #[must_use]
    pub const fn is_final(self) -> bool {
        self.contains(Self::FINAL)
    }

    /// Returns true if `abstract` is set.
    #[must_use]
    pub const fn is_abstract(self) -> bool {
        self.contains(Self::ABSTRACT)
    }

    /// Returns true if this is a concrete interface method.
    #[must_use]
    pub const fn is_default(self) -> bool {
        self.contains(Self::DEFAULT)
    }

    /// Returns true if the member is compiler-generated.
    #[must_use]
    pub const fn is_synthetic(self) -> bool {
        self.contains(Self::SYNTHETIC)
    }
}

impl std::ops::BitOr for Modifiers {
    type Output = Modifiers;

    fn bitor(self, rhs: Modifiers) -> Modifiers {
        self.union(rhs)
    }
}

impl std::fmt::Debug for Modifiers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names = [
            (Self::STATIC, "static"),
            (Self::FINAL, "final"),
            (Self::ABSTRACT, "abstract"),
            (Self::DEFAULT, "default"),
            (Self::SYNTHETIC, "synthetic"),
        ];
        let set: Vec<&str> = names
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect();
        write!(f, "Modifiers({})", set.join(" "))
    }
}

/// A declared attribute of a tag type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttributeDecl {
    /// Attribute name.
    pub name: NameId,
    /// Attribute type.
    pub ty: AttrType,
}

/// Extra information carried by tag types.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TagTypeInfo {
    /// Whether the tag applies down a class's superclass chain.
    pub inherited: bool,
    /// Container tag type aggregating repeated occurrences.
    ///
    /// A tag type with a container is repeatable.
    pub container: Option<ClassId>,
    /// Declared attributes in declaration order.
    pub attributes: Vec<AttributeDecl>,
}

impl TagTypeInfo {
    /// Returns true if this tag type can be applied repeatedly.
    #[must_use]
    pub const fn is_repeatable(&self) -> bool {
        self.container.is_some()
    }

    /// Gets an attribute declaration by name.
    #[must_use]
    pub fn attribute(&self, name: NameId) -> Option<&AttributeDecl> {
        self.attributes.iter().find(|a| a.name == name)
    }
}

/// A class, interface, tag type, or primitive type.
#[derive(Clone, Debug)]
pub struct ClassDecl {
    /// This class's identifier.
    pub id: ClassId,
    /// Fully qualified name; the package is everything before the last `.`.
    pub name: NameId,
    /// Kind of type.
    pub kind: ClassKind,
    /// Access level.
    pub visibility: Visibility,
    /// Modifier flags (`static` marks a nested class as not inner).
    pub modifiers: Modifiers,
    /// Direct superclass.
    pub superclass: Option<ClassId>,
    /// Directly implemented (or, for interfaces, extended) interfaces in order.
    pub interfaces: Vec<ClassId>,
    /// Directly nested classes in declaration order.
    pub nested: Vec<ClassId>,
    /// The class this one is declared in, for nested classes.
    pub enclosing: Option<ClassId>,
    /// Directly attached tags in order.
    pub tags: Vec<TagInstance>,
    /// Declared fields in load order.
    pub fields: Vec<FieldId>,
    /// Declared methods in load order.
    pub methods: Vec<MethodId>,
    /// Tag type information, present for tag types only.
    pub tag_info: Option<TagTypeInfo>,
}

impl ClassDecl {
    /// Creates an empty declaration of the given kind.
    #[must_use]
    pub fn new(id: ClassId, name: NameId, kind: ClassKind) -> Self {
        Self {
            id,
            name,
            kind,
            visibility: Visibility::Public,
            modifiers: Modifiers::NONE,
            superclass: None,
            interfaces: Vec::new(),
            nested: Vec::new(),
            enclosing: None,
            tags: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            tag_info: (kind == ClassKind::TagType).then(TagTypeInfo::default),
        }
    }

    /// Returns true if this is an interface (tag types included).
    #[must_use]
    pub const fn is_interface(&self) -> bool {
        matches!(self.kind, ClassKind::Interface | ClassKind::TagType)
    }

    /// Returns true if this is a tag type.
    #[must_use]
    pub const fn is_tag_type(&self) -> bool {
        matches!(self.kind, ClassKind::TagType)
    }

    /// Returns true if this is a non-static nested class.
    #[must_use]
    pub const fn is_inner(&self) -> bool {
        self.enclosing.is_some() && !self.modifiers.is_static() && !self.is_interface()
    }
}
