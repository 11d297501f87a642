//! Immutable declaration graph snapshots.
//!
//! A graph is built once by a [`GraphBuilder`] and never mutated. Loading more
//! declarations goes through [`DeclarationGraph::to_builder`], which produces a
//! new snapshot sharing structure with this one.

use std::sync::Arc;

use heritage_foundation::{
    ClassId, DeclVec, Error, FieldId, Interner, MethodId, NameId, Result,
};

use crate::builder::GraphBuilder;
use crate::class::ClassDecl;
use crate::member::{FieldDecl, MethodDecl};
use crate::source::DeclarationSource;

/// A class slot: either loaded, or only known by name.
#[derive(Clone, Debug)]
pub(crate) enum ClassSlot {
    Loaded(Arc<ClassDecl>),
    Unresolved(NameId),
}

/// Immutable snapshot of loaded declarations.
#[derive(Clone, Debug)]
pub struct DeclarationGraph {
    pub(crate) interner: Arc<Interner>,
    pub(crate) classes: DeclVec<ClassSlot>,
    pub(crate) fields: DeclVec<Arc<FieldDecl>>,
    pub(crate) methods: DeclVec<Arc<MethodDecl>>,
    pub(crate) by_name: im::HashMap<NameId, ClassId>,
    pub(crate) root: Option<ClassId>,
    pub(crate) marker: Option<ClassId>,
    pub(crate) reserved: Vec<Arc<str>>,
}

impl DeclarationGraph {
    /// Looks up a class (resolved or not) by qualified name.
    #[must_use]
    pub fn class_by_name(&self, name: &str) -> Option<ClassId> {
        let id = self.interner.lookup(name)?;
        self.by_name.get(&id).copied()
    }

    /// Looks up an interned name without interning it.
    #[must_use]
    pub fn lookup_name(&self, name: &str) -> Option<NameId> {
        self.interner.lookup(name)
    }

    /// Returns true if the class has a loaded declaration.
    #[must_use]
    pub fn is_loaded(&self, id: ClassId) -> bool {
        matches!(self.classes.get(id.index()), Some(ClassSlot::Loaded(_)))
    }

    /// Returns the number of class slots, resolved or not.
    #[must_use]
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Returns the number of declared methods.
    #[must_use]
    pub fn method_count(&self) -> usize {
        self.methods.len()
    }

    /// Returns the number of declared fields.
    #[must_use]
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Iterates over all loaded classes in load order.
    pub fn classes(&self) -> impl Iterator<Item = &ClassDecl> {
        self.classes.iter().filter_map(|slot| match slot {
            ClassSlot::Loaded(class) => Some(&**class),
            ClassSlot::Unresolved(_) => None,
        })
    }

    /// Finds a declared method of a class by name and exact parameter types.
    #[must_use]
    pub fn declared_method(
        &self,
        class: ClassId,
        name: &str,
        parameter_types: &[ClassId],
    ) -> Option<MethodId> {
        let name = self.interner.lookup(name)?;
        let class = self.class(class).ok()?;
        class.methods.iter().copied().find(|&m| {
            self.method(m)
                .is_ok_and(|m| m.name == name && m.has_parameter_types(parameter_types))
        })
    }

    /// Finds a declared field of a class by name.
    #[must_use]
    pub fn declared_field(&self, class: ClassId, name: &str) -> Option<FieldId> {
        let name = self.interner.lookup(name)?;
        let class = self.class(class).ok()?;
        class
            .fields
            .iter()
            .copied()
            .find(|&f| self.field(f).is_ok_and(|f| f.name == name))
    }

    /// Starts a builder that extends this snapshot.
    ///
    /// The returned builder shares structure with this graph; building it
    /// yields a new snapshot and leaves this one untouched.
    #[must_use]
    pub fn to_builder(&self) -> GraphBuilder {
        GraphBuilder::from_graph(self)
    }
}

impl DeclarationSource for DeclarationGraph {
    fn class(&self, id: ClassId) -> Result<&ClassDecl> {
        match self.classes.get(id.index()) {
            Some(ClassSlot::Loaded(class)) => Ok(class),
            Some(ClassSlot::Unresolved(name)) => Err(Error::unresolved_type(self.name(*name))),
            None => Err(Error::unknown_declaration(format!("{id:?}"))),
        }
    }

    fn field(&self, id: FieldId) -> Result<&FieldDecl> {
        self.fields
            .get(id.index())
            .map(|f| &**f)
            .ok_or_else(|| Error::unknown_declaration(format!("{id:?}")))
    }

    fn method(&self, id: MethodId) -> Result<&MethodDecl> {
        self.methods
            .get(id.index())
            .map(|m| &**m)
            .ok_or_else(|| Error::unknown_declaration(format!("{id:?}")))
    }

    fn name(&self, id: NameId) -> &str {
        self.interner.resolve(id).unwrap_or("")
    }

    fn class_name(&self, id: ClassId) -> &str {
        match self.classes.get(id.index()) {
            Some(ClassSlot::Loaded(class)) => self.name(class.name),
            Some(ClassSlot::Unresolved(name)) => self.name(*name),
            None => "<unknown>",
        }
    }

    fn root_class(&self) -> Option<ClassId> {
        self.root
    }

    fn marker_interface(&self) -> Option<ClassId> {
        self.marker
    }

    fn reserved_namespaces(&self) -> &[Arc<str>] {
        &self.reserved
    }
}
