//! Loading declarations into a graph.
//!
//! The builder accepts forward references: [`GraphBuilder::reference`] hands
//! out a [`ClassId`] for a name before (or without) its declaration. Names that
//! are never declared stay unresolved, and looking them up in the finished
//! graph fails the way a missing type fails during loading.

use std::sync::Arc;

use heritage_foundation::{
    AttrType, AttrValue, ClassId, DeclVec, Error, FieldId, Interner, MethodId, NameId, Result,
    TagInstance,
};
use rustc_hash::FxHashMap;

use crate::class::{AttributeDecl, ClassDecl, ClassKind, Modifiers, Visibility};
use crate::graph::{ClassSlot, DeclarationGraph};
use crate::member::{FieldDecl, MethodDecl, ParameterDecl, TypeRef};

/// Name of the root supertype declared by [`GraphBuilder::new`].
pub const DEFAULT_ROOT: &str = "lang.Object";

/// Name of the tag marker interface declared by [`GraphBuilder::new`].
pub const DEFAULT_MARKER: &str = "lang.tag.Tag";

/// Reserved tag namespace registered by [`GraphBuilder::new`].
pub const DEFAULT_RESERVED_NAMESPACE: &str = "lang.tag";

/// Builds a [`DeclarationGraph`].
#[derive(Debug)]
pub struct GraphBuilder {
    interner: Interner,
    classes: DeclVec<ClassSlot>,
    fields: DeclVec<Arc<FieldDecl>>,
    methods: DeclVec<Arc<MethodDecl>>,
    by_name: im::HashMap<NameId, ClassId>,
    root: Option<ClassId>,
    marker: Option<ClassId>,
    reserved: Vec<Arc<str>>,
    /// `(outer, nested)` pairs, linked at build time in declaration order.
    pending_nested: Vec<(ClassId, ClassId)>,
    errors: Vec<Error>,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphBuilder {
    /// Creates a builder with the platform root class, the tag marker
    /// interface, and the reserved tag namespace already declared.
    #[must_use]
    pub fn new() -> Self {
        let mut builder = Self::bare();
        let root = builder.class(DEFAULT_ROOT).finish();
        let marker = builder.interface(DEFAULT_MARKER).finish();
        builder.root = Some(root);
        builder.marker = Some(marker);
        builder.reserve_namespace(DEFAULT_RESERVED_NAMESPACE);
        builder
    }

    /// Creates a builder without any platform declarations.
    #[must_use]
    pub fn bare() -> Self {
        Self {
            interner: Interner::new(),
            classes: DeclVec::new(),
            fields: DeclVec::new(),
            methods: DeclVec::new(),
            by_name: im::HashMap::new(),
            root: None,
            marker: None,
            reserved: Vec::new(),
            pending_nested: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub(crate) fn from_graph(graph: &DeclarationGraph) -> Self {
        Self {
            interner: (*graph.interner).clone(),
            classes: graph.classes.clone(),
            fields: graph.fields.clone(),
            methods: graph.methods.clone(),
            by_name: graph.by_name.clone(),
            root: graph.root,
            marker: graph.marker,
            reserved: graph.reserved.clone(),
            pending_nested: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Returns the root class, if declared.
    #[must_use]
    pub fn root(&self) -> Option<ClassId> {
        self.root
    }

    /// Returns the tag marker interface, if declared.
    #[must_use]
    pub fn marker(&self) -> Option<ClassId> {
        self.marker
    }

    /// Sets the root class.
    pub fn set_root(&mut self, root: Option<ClassId>) {
        self.root = root;
    }

    /// Sets the tag marker interface.
    pub fn set_marker(&mut self, marker: Option<ClassId>) {
        self.marker = marker;
    }

    /// Registers a reserved tag namespace.
    pub fn reserve_namespace(&mut self, namespace: &str) {
        self.reserved.push(namespace.into());
    }

    /// Interns a name.
    pub fn name(&mut self, s: &str) -> NameId {
        self.interner.intern(s)
    }

    /// Returns the id for a qualified class name, declared or not.
    pub fn reference(&mut self, name: &str) -> ClassId {
        let name = self.interner.intern(name);
        if let Some(&id) = self.by_name.get(&name) {
            return id;
        }
        let index = self.classes.push(ClassSlot::Unresolved(name));
        let id = ClassId(u32::try_from(index).expect("too many classes"));
        self.by_name.insert(name, id);
        id
    }

    /// Creates a tag instance with named attribute values.
    pub fn tag_with<'n>(
        &mut self,
        tag_type: ClassId,
        attributes: impl IntoIterator<Item = (&'n str, AttrValue)>,
    ) -> TagInstance {
        let attributes: Vec<_> = attributes
            .into_iter()
            .map(|(name, value)| (self.interner.intern(name), value))
            .collect();
        TagInstance::with_attributes(tag_type, attributes)
    }

    /// Starts declaring a class.
    pub fn class(&mut self, name: &str) -> ClassBuilder<'_> {
        ClassBuilder::new(self, name, ClassKind::Class)
    }

    /// Starts declaring an interface.
    pub fn interface(&mut self, name: &str) -> ClassBuilder<'_> {
        ClassBuilder::new(self, name, ClassKind::Interface)
    }

    /// Starts declaring a tag type. Tag types implement the marker interface.
    pub fn tag_type(&mut self, name: &str) -> ClassBuilder<'_> {
        let marker = self.marker;
        let mut builder = ClassBuilder::new(self, name, ClassKind::TagType);
        if let Some(marker) = marker {
            builder.decl.interfaces.push(marker);
        }
        builder
    }

    /// Declares a primitive type.
    pub fn primitive(&mut self, name: &str) -> ClassId {
        ClassBuilder::new(self, name, ClassKind::Primitive).finish()
    }

    /// Declares a repeatable tag type together with its container.
    ///
    /// The container declares a `value` attribute holding an array of the
    /// repeatable tag. `inherited` applies to the container, which is what
    /// decides whether repeated occurrences are inherited.
    pub fn repeatable_tag(
        &mut self,
        name: &str,
        container_name: &str,
        inherited: bool,
    ) -> (ClassId, ClassId) {
        let tag = self.reference(name);
        let container = self.reference(container_name);

        let mut container_builder = self
            .tag_type(container_name)
            .attribute("value", AttrType::array(AttrType::Tag(tag)));
        if inherited {
            container_builder = container_builder.inherited();
        }
        container_builder.finish();

        let mut tag_builder = self.tag_type(name).repeatable(container);
        if inherited {
            tag_builder = tag_builder.inherited();
        }
        tag_builder.finish();

        (tag, container)
    }

    /// Starts declaring a field on a class.
    pub fn field(&mut self, class: ClassId, name: &str, ty: ClassId) -> FieldBuilder<'_> {
        let name = self.interner.intern(name);
        FieldBuilder {
            builder: self,
            decl: FieldDecl {
                id: FieldId(0),
                name,
                declaring: class,
                ty: TypeRef::of(ty),
                visibility: Visibility::Public,
                modifiers: Modifiers::NONE,
                tags: Vec::new(),
            },
        }
    }

    /// Starts declaring a method on a class.
    pub fn method(&mut self, class: ClassId, name: &str) -> MethodBuilder<'_> {
        let name = self.interner.intern(name);
        MethodBuilder {
            builder: self,
            decl: MethodDecl {
                id: MethodId(0),
                name,
                declaring: class,
                parameters: Vec::new(),
                return_type: None,
                visibility: Visibility::Public,
                modifiers: Modifiers::NONE,
                tags: Vec::new(),
            },
        }
    }

    /// Finishes loading and validates the graph.
    ///
    /// # Errors
    ///
    /// Returns the first error recorded while declaring (duplicate names,
    /// members on undeclared classes), or an inheritance cycle error if a
    /// superclass/interface chain loops back on itself.
    pub fn build(mut self) -> Result<DeclarationGraph> {
        if let Some(err) = self.errors.into_iter().next() {
            return Err(err);
        }

        for (outer, nested) in std::mem::take(&mut self.pending_nested) {
            match self.classes.get_mut(outer.index()) {
                Some(ClassSlot::Loaded(class)) => Arc::make_mut(class).nested.push(nested),
                _ => {
                    // Nested classes of unloaded outers stay reachable through
                    // their own `enclosing` link only.
                }
            }
        }

        let graph = DeclarationGraph {
            interner: Arc::new(self.interner),
            classes: self.classes,
            fields: self.fields,
            methods: self.methods,
            by_name: self.by_name,
            root: self.root,
            marker: self.marker,
            reserved: self.reserved,
        };
        check_inheritance_acyclic(&graph)?;
        check_tag_attributes(&graph)?;
        Ok(graph)
    }

    fn loaded_class_mut(&mut self, id: ClassId) -> Option<&mut ClassDecl> {
        match self.classes.get_mut(id.index()) {
            Some(ClassSlot::Loaded(class)) => Some(Arc::make_mut(class)),
            _ => None,
        }
    }

    fn class_name(&self, id: ClassId) -> String {
        let name = match self.classes.get(id.index()) {
            Some(ClassSlot::Loaded(class)) => class.name,
            Some(ClassSlot::Unresolved(name)) => *name,
            None => return format!("{id:?}"),
        };
        self.interner.resolve(name).unwrap_or_default().to_string()
    }
}

/// Rejects superclass/interface chains that loop.
fn check_inheritance_acyclic(graph: &DeclarationGraph) -> Result<()> {
    #[derive(Clone, Copy, PartialEq, Eq)]
    enum Mark {
        Visiting,
        Done,
    }

    fn visit(
        graph: &DeclarationGraph,
        id: ClassId,
        marks: &mut FxHashMap<ClassId, Mark>,
    ) -> Result<()> {
        match marks.get(&id) {
            Some(Mark::Done) => return Ok(()),
            Some(Mark::Visiting) => {
                return Err(Error::inheritance_cycle(
                    crate::source::DeclarationSource::class_name(graph, id),
                ));
            }
            None => {}
        }
        let Some(ClassSlot::Loaded(class)) = graph.classes.get(id.index()) else {
            marks.insert(id, Mark::Done);
            return Ok(());
        };
        marks.insert(id, Mark::Visiting);
        for &parent in class.superclass.iter().chain(&class.interfaces) {
            visit(graph, parent, marks)?;
        }
        marks.insert(id, Mark::Done);
        Ok(())
    }

    let mut marks = FxHashMap::default();
    for class in graph.classes() {
        visit(graph, class.id, &mut marks)?;
    }
    Ok(())
}

/// Rejects tag instances whose declared attributes carry values of the wrong
/// type. Attributes the tag type does not declare are left alone.
fn check_tag_attributes(graph: &DeclarationGraph) -> Result<()> {
    let check = |tag: &TagInstance| -> Result<()> {
        let Some(ClassSlot::Loaded(decl)) = graph.classes.get(tag.tag_type().index()) else {
            return Ok(());
        };
        let Some(info) = decl.tag_info.as_ref() else {
            return Ok(());
        };
        for (name, value) in tag.attributes() {
            if let Some(attr) = info.attribute(*name) {
                if !attr.ty.accepts(value) {
                    return Err(Error::invalid_attribute(
                        graph.interner.resolve(decl.name).unwrap_or_default(),
                        graph.interner.resolve(*name).unwrap_or_default(),
                        attr.ty.to_string(),
                    ));
                }
            }
        }
        Ok(())
    };

    let class_tags = graph.classes().flat_map(|c| c.tags.iter());
    let field_tags = graph.fields.iter().flat_map(|f| f.tags.iter());
    let method_tags = graph.methods.iter().flat_map(|m| {
        m.tags
            .iter()
            .chain(m.parameters.iter().flat_map(|p| p.tags.iter()))
    });
    class_tags.chain(field_tags).chain(method_tags).try_for_each(check)
}

/// Declares one class. Nothing is recorded until [`ClassBuilder::finish`].
#[must_use = "a class is only declared once `finish` is called"]
pub struct ClassBuilder<'a> {
    builder: &'a mut GraphBuilder,
    decl: ClassDecl,
    explicit_superclass: bool,
}

impl<'a> ClassBuilder<'a> {
    fn new(builder: &'a mut GraphBuilder, name: &str, kind: ClassKind) -> Self {
        let name = builder.interner.intern(name);
        Self {
            builder,
            decl: ClassDecl::new(ClassId(0), name, kind),
            explicit_superclass: false,
        }
    }

    /// Sets the superclass.
    pub fn extends(mut self, superclass: ClassId) -> Self {
        self.decl.superclass = Some(superclass);
        self.explicit_superclass = true;
        self
    }

    /// Adds an implemented (or extended) interface. Duplicates are ignored.
    pub fn implements(mut self, interface: ClassId) -> Self {
        if !self.decl.interfaces.contains(&interface) {
            self.decl.interfaces.push(interface);
        }
        self
    }

    /// Declares this class as an inner (non-static nested) class of `outer`.
    pub fn enclosed_by(mut self, outer: ClassId) -> Self {
        self.decl.enclosing = Some(outer);
        self
    }

    /// Declares this class as a static nested class of `outer`.
    pub fn nested_in(mut self, outer: ClassId) -> Self {
        self.decl.enclosing = Some(outer);
        self.decl.modifiers = self.decl.modifiers | Modifiers::STATIC;
        self
    }

    /// Sets the access level.
    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.decl.visibility = visibility;
        self
    }

    /// Adds modifier flags.
    pub fn modifiers(mut self, modifiers: Modifiers) -> Self {
        self.decl.modifiers = self.decl.modifiers | modifiers;
        self
    }

    /// Attaches a tag.
    pub fn tag(mut self, tag: TagInstance) -> Self {
        self.decl.tags.push(tag);
        self
    }

    /// Marks a tag type as inherited.
    pub fn inherited(mut self) -> Self {
        if let Some(info) = self.decl.tag_info.as_mut() {
            info.inherited = true;
        }
        self
    }

    /// Marks a tag type as repeatable with the given container.
    pub fn repeatable(mut self, container: ClassId) -> Self {
        if let Some(info) = self.decl.tag_info.as_mut() {
            info.container = Some(container);
        }
        self
    }

    /// Declares an attribute on a tag type.
    pub fn attribute(mut self, name: &str, ty: AttrType) -> Self {
        let name = self.builder.interner.intern(name);
        if let Some(info) = self.decl.tag_info.as_mut() {
            info.attributes.push(AttributeDecl { name, ty });
        }
        self
    }

    /// Records the class and returns its id.
    ///
    /// Classes without an explicit superclass extend the root class.
    /// Declaring the same name twice is reported by [`GraphBuilder::build`].
    pub fn finish(self) -> ClassId {
        let Self {
            builder,
            mut decl,
            explicit_superclass,
        } = self;
        let name = builder
            .interner
            .resolve(decl.name)
            .unwrap_or_default()
            .to_string();
        let id = builder.reference(&name);

        if let Some(ClassSlot::Loaded(_)) = builder.classes.get(id.index()) {
            builder.errors.push(Error::duplicate_declaration(name));
            return id;
        }

        decl.id = id;
        if decl.kind == ClassKind::Class && !explicit_superclass && builder.root != Some(id) {
            decl.superclass = builder.root;
        }
        if let Some(outer) = decl.enclosing {
            builder.pending_nested.push((outer, id));
        }
        if let Some(slot) = builder.classes.get_mut(id.index()) {
            *slot = ClassSlot::Loaded(Arc::new(decl));
        }
        id
    }
}

/// Declares one field. Nothing is recorded until [`FieldBuilder::finish`].
#[must_use = "a field is only declared once `finish` is called"]
pub struct FieldBuilder<'a> {
    builder: &'a mut GraphBuilder,
    decl: FieldDecl,
}

impl FieldBuilder<'_> {
    /// Sets the access level.
    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.decl.visibility = visibility;
        self
    }

    /// Adds modifier flags.
    pub fn modifiers(mut self, modifiers: Modifiers) -> Self {
        self.decl.modifiers = self.decl.modifiers | modifiers;
        self
    }

    /// Attaches a tag.
    pub fn tag(mut self, tag: TagInstance) -> Self {
        self.decl.tags.push(tag);
        self
    }

    /// Records the field and returns its id.
    pub fn finish(self) -> FieldId {
        let Self { builder, mut decl } = self;
        let id = FieldId(u32::try_from(builder.fields.len()).expect("too many fields"));
        decl.id = id;
        let declaring = decl.declaring;
        match builder.loaded_class_mut(declaring) {
            Some(class) => class.fields.push(id),
            None => {
                let name = builder.class_name(declaring);
                builder.errors.push(Error::internal(format!(
                    "field declared on undeclared class {name}"
                )));
            }
        }
        builder.fields.push(Arc::new(decl));
        id
    }
}

/// Declares one method. Nothing is recorded until [`MethodBuilder::finish`].
#[must_use = "a method is only declared once `finish` is called"]
pub struct MethodBuilder<'a> {
    builder: &'a mut GraphBuilder,
    decl: MethodDecl,
}

impl MethodBuilder<'_> {
    /// Appends a parameter of a concrete type.
    pub fn param(self, ty: ClassId) -> Self {
        self.parameter(TypeRef::of(ty), None, [])
    }

    /// Appends a parameter declared with a type variable erased to `bound`.
    pub fn type_param(self, bound: ClassId) -> Self {
        self.parameter(TypeRef::variable(bound), None, [])
    }

    /// Appends a parameter with a name and tags.
    pub fn parameter(
        mut self,
        ty: TypeRef,
        name: Option<&str>,
        tags: impl IntoIterator<Item = TagInstance>,
    ) -> Self {
        let name = name.map(|n| self.builder.interner.intern(n));
        let index = u32::try_from(self.decl.parameters.len()).expect("too many parameters");
        self.decl.parameters.push(ParameterDecl {
            index,
            name,
            ty,
            tags: tags.into_iter().collect(),
        });
        self
    }

    /// Sets the return type.
    pub fn returns(mut self, ty: ClassId) -> Self {
        self.decl.return_type = Some(TypeRef::of(ty));
        self
    }

    /// Sets the access level.
    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.decl.visibility = visibility;
        self
    }

    /// Adds modifier flags.
    pub fn modifiers(mut self, modifiers: Modifiers) -> Self {
        self.decl.modifiers = self.decl.modifiers | modifiers;
        self
    }

    /// Attaches a tag.
    pub fn tag(mut self, tag: TagInstance) -> Self {
        self.decl.tags.push(tag);
        self
    }

    /// Records the method and returns its id.
    ///
    /// Methods declared on interfaces are abstract unless marked `static`,
    /// `default`, or private.
    pub fn finish(self) -> MethodId {
        let Self { builder, mut decl } = self;
        let id = MethodId(u32::try_from(builder.methods.len()).expect("too many methods"));
        decl.id = id;
        let declaring = decl.declaring;
        match builder.loaded_class_mut(declaring) {
            Some(class) => {
                let concrete = decl.modifiers.is_static()
                    || decl.modifiers.is_default()
                    || decl.visibility == Visibility::Private;
                if class.is_interface() && !concrete {
                    decl.modifiers = decl.modifiers | Modifiers::ABSTRACT;
                }
                class.methods.push(id);
            }
            None => {
                let name = builder.class_name(declaring);
                builder.errors.push(Error::internal(format!(
                    "method declared on undeclared class {name}"
                )));
            }
        }
        builder.methods.push(Arc::new(decl));
        id
    }
}
