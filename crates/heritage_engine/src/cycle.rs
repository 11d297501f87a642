//! Nested-class discovery and the inner-class cycle guard.
//!
//! An inner class that extends one of its own enclosing classes inherits its
//! own declaration as a nested class, so expanding nested classes recursively
//! would never end. The detector stops that expansion according to a
//! [`CyclePolicy`].

use heritage_foundation::{ClassId, Error, OrderedSet, Result};
use heritage_model::{ClassDecl, ClassKind, DeclarationSource};
use rustc_hash::FxHashSet;

use crate::config::CyclePolicy;
use crate::engine::Engine;

impl<S: DeclarationSource> Engine<S> {
    /// Checks whether an inner class extends one of its enclosing classes.
    ///
    /// Returns `Ok(true)` when a cycle was found under
    /// [`CyclePolicy::AbortBranch`] and `Ok(false)` when there is none.
    /// Classes proven cycle-free are remembered by name.
    ///
    /// # Errors
    ///
    /// Returns an inner-class-cycle error under [`CyclePolicy::Fail`], or an
    /// error if `class` cannot be resolved.
    pub fn detect_inner_class_cycle(&self, class: ClassId, policy: CyclePolicy) -> Result<bool> {
        let decl = self.source.class(class)?;
        let name = self.source.class_name(class);
        if self.caches.is_cycle_free(name) {
            return Ok(false);
        }

        if decl.is_inner() && self.source.is_searchable(decl.superclass) {
            let mut seen = FxHashSet::default();
            let mut enclosing = decl.enclosing;
            while let Some(outer) = enclosing {
                if Some(outer) == decl.superclass {
                    let outer_name = self.source.class_name(outer);
                    return match policy {
                        CyclePolicy::Fail => Err(Error::inner_class_cycle(name, outer_name)),
                        CyclePolicy::AbortBranch => {
                            tracing::debug!(
                                class = name,
                                enclosing = outer_name,
                                "inner class cycle; aborting branch"
                            );
                            Ok(true)
                        }
                    };
                }
                if !seen.insert(outer) {
                    break;
                }
                enclosing = self.load(outer).and_then(|o| o.enclosing);
            }
        }

        self.caches.mark_cycle_free(name);
        Ok(false)
    }

    /// Finds nested classes declared by `class`, its superclasses and its
    /// interfaces that match `predicate`, without duplicates.
    ///
    /// # Errors
    ///
    /// Returns an error if `class` cannot be resolved, or an inner-class cycle
    /// is found under [`CyclePolicy::Fail`].
    pub fn find_nested_classes(
        &self,
        class: ClassId,
        predicate: impl Fn(&ClassDecl) -> bool,
        policy: CyclePolicy,
    ) -> Result<Vec<ClassId>> {
        self.source.class(class)?;
        let mut found = OrderedSet::new();
        self.visit_nested_classes(Some(class), &predicate, policy, &mut found)
            .map_err(|err| self.with_query_context(err, "find_nested_classes", class))?;
        Ok(found.into_vec())
    }

    /// Returns true if any nested class matches `predicate`.
    ///
    /// # Errors
    ///
    /// Same as [`find_nested_classes`](Self::find_nested_classes).
    pub fn is_nested_class_present(
        &self,
        class: ClassId,
        predicate: impl Fn(&ClassDecl) -> bool,
        policy: CyclePolicy,
    ) -> Result<bool> {
        Ok(!self.find_nested_classes(class, predicate, policy)?.is_empty())
    }

    /// Discovers nested classes recursively, depth first.
    ///
    /// Branches rooted at a cyclic inner class are not expanded.
    ///
    /// # Errors
    ///
    /// Same as [`find_nested_classes`](Self::find_nested_classes).
    pub fn nested_class_tree(
        &self,
        class: ClassId,
        predicate: impl Fn(&ClassDecl) -> bool,
        policy: CyclePolicy,
    ) -> Result<Vec<ClassId>> {
        self.source.class(class)?;
        let mut out = OrderedSet::new();
        self.expand_nested_tree(class, &predicate, policy, &mut out)
            .map_err(|err| self.with_query_context(err, "nested_class_tree", class))?;
        Ok(out.into_vec())
    }

    fn with_query_context(&self, err: Error, operation: &str, class: ClassId) -> Error {
        let context = err
            .context
            .clone()
            .unwrap_or_default()
            .with_operation(operation)
            .with_step(self.source.class_name(class));
        err.with_context(context)
    }

    fn expand_nested_tree(
        &self,
        class: ClassId,
        predicate: &dyn Fn(&ClassDecl) -> bool,
        policy: CyclePolicy,
        out: &mut OrderedSet<ClassId>,
    ) -> Result<()> {
        let mut nested = OrderedSet::new();
        self.visit_nested_classes(Some(class), predicate, policy, &mut nested)?;
        for child in nested {
            if !out.insert(child) || self.detect_inner_class_cycle(child, policy)? {
                continue;
            }
            self.expand_nested_tree(child, predicate, policy, out)?;
        }
        Ok(())
    }

    fn visit_nested_classes(
        &self,
        class: Option<ClassId>,
        predicate: &dyn Fn(&ClassDecl) -> bool,
        policy: CyclePolicy,
        found: &mut OrderedSet<ClassId>,
    ) -> Result<()> {
        let Some(class) = class.filter(|&c| self.source.is_searchable(Some(c))) else {
            return Ok(());
        };
        let Some(decl) = self.load(class) else {
            return Ok(());
        };
        if decl.is_tag_type() || decl.kind == ClassKind::Primitive {
            return Ok(());
        }

        for &nested in &decl.nested {
            let Some(nested_decl) = self.load(nested) else {
                continue;
            };
            if predicate(nested_decl) {
                found.insert(nested);
                // A cyclic class is recorded but never expanded.
                self.detect_inner_class_cycle(nested, policy)?;
            }
        }

        self.visit_nested_classes(decl.superclass, predicate, policy, found)?;
        for &ifc in &decl.interfaces {
            self.visit_nested_classes(Some(ifc), predicate, policy, found)?;
        }
        Ok(())
    }
}
