//! Repeatable-tag flattening.
//!
//! Collects every occurrence of a repeatable tag type, whether attached
//! directly, packed into its container, packed into some other container, or
//! reachable through meta-tags. Supertypes are searched before the
//! declaration itself, so inherited occurrences come first.

use heritage_foundation::{AttrType, ClassId, Error, NameId, OrderedSet, Result, TagInstance};
use heritage_model::{Declaration, DeclarationSource};
use rustc_hash::FxHashSet;

use crate::engine::Engine;

/// The fixed parameters of one flattening query.
struct RepeatableSearch {
    tag_type: ClassId,
    container: ClassId,
    inherited: bool,
}

/// Per-query accumulators.
#[derive(Default)]
struct Collector {
    found: OrderedSet<TagInstance>,
    visited: FxHashSet<TagInstance>,
}

impl<S: DeclarationSource> Engine<S> {
    /// Finds all occurrences of a repeatable tag type on `decl`, in
    /// first-seen order without duplicates.
    ///
    /// Superclasses are searched only when the container type is inherited.
    ///
    /// # Errors
    ///
    /// Returns an error if `tag_type` is not a tag type, has no container, or
    /// `decl` cannot be resolved.
    pub fn find_repeatable_tags(
        &self,
        decl: impl Into<Declaration>,
        tag_type: ClassId,
    ) -> Result<Vec<TagInstance>> {
        let container = self
            .require_tag_type(tag_type)?
            .container
            .ok_or_else(|| Error::not_repeatable(self.source.class_name(tag_type)))?;
        let inherited = self.source.tag_info(container)?.inherited;
        let decl = decl.into();
        self.source.direct_tags(decl)?;

        let search = RepeatableSearch {
            tag_type,
            container,
            inherited,
        };
        let mut collector = Collector::default();
        self.collect_repeatable(decl, &search, &mut collector);
        Ok(collector.found.into_vec())
    }

    /// Returns true if `candidate` is a container of some repeatable tag type.
    ///
    /// A container declares an array-valued `value` attribute whose element
    /// tag type names `candidate` as its container. Results are cached.
    pub fn is_repeatable_container(&self, candidate: ClassId) -> bool {
        self.caches.repeatable_container(candidate, || {
            let Ok(info) = self.source.tag_info(candidate) else {
                return false;
            };
            info.attribute(NameId::VALUE)
                .and_then(|attr| attr.ty.element())
                .and_then(AttrType::tag_type)
                .and_then(|element| self.source.tag_info(element).ok())
                .is_some_and(|element| element.container == Some(candidate))
        })
    }

    fn collect_repeatable(
        &self,
        decl: Declaration,
        search: &RepeatableSearch,
        collector: &mut Collector,
    ) {
        if let Declaration::Class(id) = decl {
            let Some(class) = self.load(id) else {
                return;
            };
            if search.inherited && self.source.is_searchable(class.superclass) {
                if let Some(superclass) = class.superclass {
                    self.collect_repeatable(Declaration::Class(superclass), search, collector);
                }
            }
            let marker = self.source.marker_interface();
            for &ifc in &class.interfaces {
                if Some(ifc) != marker {
                    self.collect_repeatable(Declaration::Class(ifc), search, collector);
                }
            }
        }

        let direct = match self.source.direct_tags(decl) {
            Ok(tags) => tags,
            Err(err) => {
                tracing::debug!(declaration = ?decl, error = %err, "failed to load tags");
                return;
            }
        };
        self.collect_from(direct, search, collector);
        let full = self.full_tags(decl);
        self.collect_from(&full, search, collector);
    }

    fn collect_from(
        &self,
        candidates: &[TagInstance],
        search: &RepeatableSearch,
        collector: &mut Collector,
    ) {
        for candidate in candidates {
            let candidate_type = candidate.tag_type();
            if self.source.is_reserved_tag_type(candidate_type)
                || !collector.visited.insert(candidate.clone())
            {
                continue;
            }
            if candidate_type == search.tag_type {
                collector.found.insert(candidate.clone());
            } else if candidate_type == search.container {
                collector.found.extend(candidate.contained_tags().cloned());
            } else if self.is_repeatable_container(candidate_type) {
                for contained in candidate.contained_tags() {
                    self.collect_repeatable(
                        Declaration::Class(contained.tag_type()),
                        search,
                        collector,
                    );
                }
            } else {
                self.collect_repeatable(Declaration::Class(candidate_type), search, collector);
            }
        }
    }
}
