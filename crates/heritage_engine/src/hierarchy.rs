//! Hierarchy walking: fields and methods across superclasses and interfaces.
//!
//! A class contributes its locally declared members plus everything its
//! superclass and interfaces contribute, minus inherited members that a local
//! member overrides (or, for fields under legacy shadowing, hides).
//! Unresolvable branches contribute nothing.

use heritage_foundation::{ClassId, FieldId, MethodId, OrderedSet, Result};
use heritage_model::{
    ClassDecl, Declaration, DeclarationSource, FieldDecl, MethodDecl, Visibility,
};
use rustc_hash::FxHashSet;

use crate::config::TraversalDirection;
use crate::engine::Engine;
use crate::ordering::{sort_fields, sort_methods};

/// Concatenates inherited and local members in traversal order.
fn merge<T>(
    direction: TraversalDirection,
    local: Vec<T>,
    superclass: Vec<T>,
    interfaces: Vec<T>,
) -> Vec<T> {
    let mut out = Vec::with_capacity(local.len() + superclass.len() + interfaces.len());
    match direction {
        TraversalDirection::TopDown => {
            out.extend(superclass);
            out.extend(interfaces);
            out.extend(local);
        }
        TraversalDirection::BottomUp => {
            out.extend(local);
            out.extend(superclass);
            out.extend(interfaces);
        }
    }
    out
}

impl<S: DeclarationSource> Engine<S> {
    // =========================================================================
    // Methods
    // =========================================================================

    /// Finds all methods in the hierarchy of `class` matching `predicate`.
    ///
    /// Overridden methods are dropped; each method appears once.
    ///
    /// # Errors
    ///
    /// Returns an error if `class` itself cannot be resolved.
    pub fn find_methods(
        &self,
        class: ClassId,
        predicate: impl Fn(&MethodDecl) -> bool,
        direction: TraversalDirection,
    ) -> Result<Vec<MethodId>> {
        self.source.class(class)?;
        let found: OrderedSet<MethodId> = self
            .methods_in_hierarchy(class, direction)
            .into_iter()
            .filter(|m| predicate(m))
            .map(|m| m.id)
            .collect();
        Ok(found.into_vec())
    }

    /// Finds all methods in the hierarchy of `class` with the given name.
    ///
    /// # Errors
    ///
    /// Returns an error if `class` itself cannot be resolved.
    pub fn find_methods_by_name(
        &self,
        class: ClassId,
        name: &str,
        direction: TraversalDirection,
    ) -> Result<Vec<MethodId>> {
        self.find_methods(class, |m| self.source.name(m.name) == name, direction)
    }

    /// Finds the most specific method with exactly this name and these
    /// parameter types.
    ///
    /// The class is searched before its interfaces, and both before the
    /// superclass. The first match wins.
    ///
    /// # Errors
    ///
    /// Returns an error if `class` itself cannot be resolved.
    pub fn find_method(
        &self,
        class: ClassId,
        name: &str,
        parameter_types: &[ClassId],
    ) -> Result<Option<MethodId>> {
        self.source.class(class)?;
        Ok(self.find_method_matching(class, &|m: &MethodDecl| {
            self.source.name(m.name) == name && m.has_parameter_types(parameter_types)
        }))
    }

    /// Returns true if any method in the hierarchy matches `predicate`.
    ///
    /// # Errors
    ///
    /// Returns an error if `class` itself cannot be resolved.
    pub fn is_method_present(
        &self,
        class: ClassId,
        predicate: impl Fn(&MethodDecl) -> bool,
    ) -> Result<bool> {
        self.source.class(class)?;
        Ok(self.find_method_matching(class, &predicate).is_some())
    }

    /// Finds methods in the hierarchy carrying `tag_type` (directly or through
    /// meta-tags).
    ///
    /// # Errors
    ///
    /// Returns an error if `class` cannot be resolved or `tag_type` is not a
    /// tag type.
    pub fn find_annotated_methods(
        &self,
        class: ClassId,
        tag_type: ClassId,
        direction: TraversalDirection,
    ) -> Result<Vec<MethodId>> {
        let inherited = self.require_tag_type(tag_type)?.inherited;
        self.find_methods(
            class,
            |m| self.has_tag(Declaration::Method(m.id), tag_type, inherited),
            direction,
        )
    }

    /// Returns the public methods of `class` and its supertypes, sorted.
    ///
    /// A method hides supertype methods with the same signature. Static
    /// methods of superinterfaces are not members of the list.
    ///
    /// # Errors
    ///
    /// Returns an error if `class` itself cannot be resolved.
    pub fn public_methods(&self, class: ClassId) -> Result<Vec<MethodId>> {
        self.source.class(class)?;
        Ok(self.public_methods_of(class).into_iter().map(|m| m.id).collect())
    }

    pub(crate) fn find_method_matching(
        &self,
        class: ClassId,
        predicate: &dyn Fn(&MethodDecl) -> bool,
    ) -> Option<MethodId> {
        let mut current = Some(class);
        while self.source.is_searchable(current) {
            let decl = self.load(current?)?;
            let candidates = if decl.is_interface() {
                self.public_methods_of(decl.id)
            } else {
                self.local_methods(decl, TraversalDirection::BottomUp)
            };
            if let Some(found) = candidates.into_iter().find(|m| predicate(m)) {
                return Some(found.id);
            }
            for &ifc in &decl.interfaces {
                if let Some(found) = self.find_method_matching(ifc, predicate) {
                    return Some(found);
                }
            }
            current = decl.superclass;
        }
        None
    }

    fn methods_in_hierarchy(
        &self,
        class: ClassId,
        direction: TraversalDirection,
    ) -> Vec<&MethodDecl> {
        let Some(decl) = self.load(class) else {
            return Vec::new();
        };
        let local = self.local_methods(decl, direction);

        let superclass = match decl.superclass {
            Some(s) if self.source.is_searchable(Some(s)) => self
                .methods_in_hierarchy(s, direction)
                .into_iter()
                .filter(|m| !self.is_shadowed_by_local_methods(m, &local))
                .collect(),
            _ => Vec::new(),
        };
        let interfaces = self
            .interface_methods(decl, direction)
            .into_iter()
            .filter(|m| !self.is_shadowed_by_local_methods(m, &local))
            .collect();

        merge(direction, local, superclass, interfaces)
    }

    /// Declared non-synthetic methods, sorted, with visible default methods
    /// placed before (top-down) or after (bottom-up) them.
    fn local_methods(&self, decl: &ClassDecl, direction: TraversalDirection) -> Vec<&MethodDecl> {
        let declared = self.declared_methods(decl);
        let defaults = self.default_methods(decl);
        if defaults.is_empty() {
            return declared;
        }
        match direction {
            TraversalDirection::TopDown => defaults.into_iter().chain(declared).collect(),
            TraversalDirection::BottomUp => declared.into_iter().chain(defaults).collect(),
        }
    }

    fn declared_methods(&self, decl: &ClassDecl) -> Vec<&MethodDecl> {
        let mut methods: Vec<&MethodDecl> = decl
            .methods
            .iter()
            .filter_map(|&m| self.load_method(m))
            .filter(|m| !m.modifiers.is_synthetic())
            .collect();
        sort_methods(&self.source, &mut methods);
        methods
    }

    /// Default methods of directly implemented interfaces that are still
    /// members of this class's public method list.
    fn default_methods(&self, decl: &ClassDecl) -> Vec<&MethodDecl> {
        let visible: FxHashSet<MethodId> = self
            .public_methods_of(decl.id)
            .into_iter()
            .filter(|m| m.modifiers.is_default())
            .map(|m| m.id)
            .collect();
        if visible.is_empty() {
            return Vec::new();
        }
        decl.interfaces
            .iter()
            .flat_map(|&ifc| self.public_methods_of(ifc))
            .filter(|m| visible.contains(&m.id))
            .collect()
    }

    fn interface_methods(
        &self,
        decl: &ClassDecl,
        direction: TraversalDirection,
    ) -> Vec<&MethodDecl> {
        let mut all = Vec::new();
        for &ifc in &decl.interfaces {
            let Some(ifc_decl) = self.load(ifc) else {
                continue;
            };
            let local: Vec<&MethodDecl> = self
                .public_methods_of(ifc)
                .into_iter()
                .filter(|m| !m.modifiers.is_abstract())
                .collect();
            let inherited: Vec<&MethodDecl> = self
                .interface_methods(ifc_decl, direction)
                .into_iter()
                .filter(|m| !self.is_shadowed_by_local_methods(m, &local))
                .collect();
            match direction {
                TraversalDirection::TopDown => {
                    all.extend(inherited);
                    all.extend(local);
                }
                TraversalDirection::BottomUp => {
                    all.extend(local);
                    all.extend(inherited);
                }
            }
        }
        all
    }

    pub(crate) fn public_methods_of(&self, class: ClassId) -> Vec<&MethodDecl> {
        let mut out = Vec::new();
        let mut seen = FxHashSet::default();
        self.collect_public_methods(class, true, &mut out, &mut seen);
        sort_methods(&self.source, &mut out);
        out
    }

    fn collect_public_methods<'a>(
        &'a self,
        class: ClassId,
        start: bool,
        out: &mut Vec<&'a MethodDecl>,
        seen: &mut FxHashSet<ClassId>,
    ) {
        if !seen.insert(class) {
            return;
        }
        let Some(decl) = self.load(class) else {
            return;
        };
        for method in decl.methods.iter().filter_map(|&m| self.load_method(m)) {
            let inherited_static = !start && decl.is_interface() && method.modifiers.is_static();
            if method.visibility == Visibility::Public
                && !method.modifiers.is_synthetic()
                && !inherited_static
                && !out.iter().any(|m| m.same_signature(method))
            {
                out.push(method);
            }
        }
        if let Some(superclass) = decl.superclass {
            self.collect_public_methods(superclass, false, out, seen);
        }
        for &ifc in &decl.interfaces {
            self.collect_public_methods(ifc, false, out, seen);
        }
    }

    fn is_shadowed_by_local_methods(&self, upper: &MethodDecl, local: &[&MethodDecl]) -> bool {
        local.iter().any(|lower| self.is_overridden_by(upper, lower))
    }

    /// Returns true if `lower` overrides `upper`.
    fn is_overridden_by(&self, upper: &MethodDecl, lower: &MethodDecl) -> bool {
        if upper.visibility == Visibility::Private
            || upper.modifiers.is_static()
            || upper.modifiers.is_final()
        {
            return false;
        }
        if upper.visibility == Visibility::Package
            && self.source.package_of(upper.declaring) != self.source.package_of(lower.declaring)
        {
            return false;
        }
        self.has_compatible_signature(upper, lower)
    }

    /// Same name and arity, and either identical parameter types or a generic
    /// `upper` whose parameter types are all assignable from `lower`'s.
    fn has_compatible_signature(&self, upper: &MethodDecl, lower: &MethodDecl) -> bool {
        if upper.name != lower.name || upper.parameter_count() != lower.parameter_count() {
            return false;
        }
        if upper.parameter_types().eq(lower.parameter_types()) {
            return true;
        }
        let assignable = upper
            .parameter_types()
            .zip(lower.parameter_types())
            .all(|(u, l)| self.source.is_assignable(l, u));
        assignable && upper.is_generic()
    }

    // =========================================================================
    // Fields
    // =========================================================================

    /// Finds all fields in the hierarchy of `class` matching `predicate`.
    ///
    /// Fields are never hidden by same-named fields of subtypes unless
    /// [`legacy_field_shadowing`](crate::EngineConfig::legacy_field_shadowing)
    /// is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if `class` itself cannot be resolved.
    pub fn find_fields(
        &self,
        class: ClassId,
        predicate: impl Fn(&FieldDecl) -> bool,
        direction: TraversalDirection,
    ) -> Result<Vec<FieldId>> {
        self.source.class(class)?;
        let found: OrderedSet<FieldId> = self
            .fields_in_hierarchy(class, direction)
            .into_iter()
            .filter(|f| predicate(f))
            .map(|f| f.id)
            .collect();
        Ok(found.into_vec())
    }

    /// Finds fields in the hierarchy carrying `tag_type` and matching
    /// `predicate`.
    ///
    /// # Errors
    ///
    /// Returns an error if `class` cannot be resolved or `tag_type` is not a
    /// tag type.
    pub fn find_annotated_fields(
        &self,
        class: ClassId,
        tag_type: ClassId,
        predicate: impl Fn(&FieldDecl) -> bool,
        direction: TraversalDirection,
    ) -> Result<Vec<FieldId>> {
        let inherited = self.require_tag_type(tag_type)?.inherited;
        self.find_fields(
            class,
            |f| self.has_tag(Declaration::Field(f.id), tag_type, inherited) && predicate(f),
            direction,
        )
    }

    /// Finds public fields of `class` and its supertypes whose type is
    /// assignable to `field_type` and which carry `tag_type`.
    ///
    /// # Errors
    ///
    /// Returns an error if `class` cannot be resolved or `tag_type` is not a
    /// tag type.
    pub fn find_public_annotated_fields(
        &self,
        class: ClassId,
        field_type: ClassId,
        tag_type: ClassId,
    ) -> Result<Vec<FieldId>> {
        let inherited = self.require_tag_type(tag_type)?.inherited;
        self.source.class(class)?;
        let mut out = Vec::new();
        let mut seen = FxHashSet::default();
        self.collect_public_fields(class, &mut out, &mut seen);
        Ok(out
            .into_iter()
            .filter(|f| self.source.is_assignable(f.ty.class, field_type))
            .filter(|f| self.has_tag(Declaration::Field(f.id), tag_type, inherited))
            .map(|f| f.id)
            .collect())
    }

    fn fields_in_hierarchy(&self, class: ClassId, direction: TraversalDirection) -> Vec<&FieldDecl> {
        let Some(decl) = self.load(class) else {
            return Vec::new();
        };
        let local = self.declared_fields(decl, false);

        let superclass = match decl.superclass {
            Some(s) if self.source.is_searchable(Some(s)) => self
                .fields_in_hierarchy(s, direction)
                .into_iter()
                .filter(|f| !self.is_shadowed_by_local_fields(f, &local))
                .collect(),
            _ => Vec::new(),
        };
        let interfaces = self
            .interface_fields(decl, direction)
            .into_iter()
            .filter(|f| !self.is_shadowed_by_local_fields(f, &local))
            .collect();

        merge(direction, local, superclass, interfaces)
    }

    fn declared_fields(&self, decl: &ClassDecl, public_only: bool) -> Vec<&FieldDecl> {
        let mut fields: Vec<&FieldDecl> = decl
            .fields
            .iter()
            .filter_map(|&f| self.load_field(f))
            .filter(|f| !f.modifiers.is_synthetic())
            .filter(|f| !public_only || f.visibility == Visibility::Public)
            .collect();
        sort_fields(&self.source, &mut fields);
        fields
    }

    fn interface_fields(&self, decl: &ClassDecl, direction: TraversalDirection) -> Vec<&FieldDecl> {
        let mut all = Vec::new();
        for &ifc in &decl.interfaces {
            let Some(ifc_decl) = self.load(ifc) else {
                continue;
            };
            let local = self.declared_fields(ifc_decl, true);
            let inherited: Vec<&FieldDecl> = self
                .interface_fields(ifc_decl, direction)
                .into_iter()
                .filter(|f| !self.is_shadowed_by_local_fields(f, &local))
                .collect();
            match direction {
                TraversalDirection::TopDown => {
                    all.extend(inherited);
                    all.extend(local);
                }
                TraversalDirection::BottomUp => {
                    all.extend(local);
                    all.extend(inherited);
                }
            }
        }
        all
    }

    fn collect_public_fields<'a>(
        &'a self,
        class: ClassId,
        out: &mut Vec<&'a FieldDecl>,
        seen: &mut FxHashSet<ClassId>,
    ) {
        if !seen.insert(class) {
            return;
        }
        let Some(decl) = self.load(class) else {
            return;
        };
        out.extend(self.declared_fields(decl, true));
        for &ifc in &decl.interfaces {
            self.collect_public_fields(ifc, out, seen);
        }
        if let Some(superclass) = decl.superclass {
            self.collect_public_fields(superclass, out, seen);
        }
    }

    fn is_shadowed_by_local_fields(&self, field: &FieldDecl, local: &[&FieldDecl]) -> bool {
        self.config.legacy_field_shadowing && local.iter().any(|f| f.name == field.name)
    }

    // =========================================================================
    // Types
    // =========================================================================

    /// Returns true if `from` can be used where `to` is expected.
    #[must_use]
    pub fn is_assignable(&self, from: ClassId, to: ClassId) -> bool {
        self.source.is_assignable(from, to)
    }

    /// Returns `class` followed by its searchable superclasses, nearest first.
    ///
    /// # Errors
    ///
    /// Returns an error if `class` itself cannot be resolved.
    pub fn class_hierarchy(&self, class: ClassId) -> Result<Vec<ClassId>> {
        let mut out = vec![class];
        let mut current = self.source.class(class)?.superclass;
        while self.source.is_searchable(current) {
            let Some(id) = current else {
                break;
            };
            let Some(decl) = self.load(id) else {
                break;
            };
            out.push(id);
            current = decl.superclass;
        }
        Ok(out)
    }
}
