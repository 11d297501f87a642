//! Single-tag lookup.
//!
//! A tag is found when it is directly attached, meta-present (attached to the
//! type of an attached tag, transitively), present on an interface, or, for
//! inherited tag types, present on a superclass. The visited set is owned by
//! the top-level call and keeps mutually tagged tag types from looping.

use heritage_foundation::{ClassId, Result, TagInstance};
use heritage_model::{Declaration, DeclarationSource, TagTypeInfo};
use rustc_hash::FxHashSet;

use crate::config::EnclosingSearch;
use crate::engine::Engine;

impl<S: DeclarationSource> Engine<S> {
    /// Finds the first tag of `tag_type` present on `decl`.
    ///
    /// # Errors
    ///
    /// Returns an error if `tag_type` is not a tag type or `decl` cannot be
    /// resolved.
    pub fn find_tag(
        &self,
        decl: impl Into<Declaration>,
        tag_type: ClassId,
    ) -> Result<Option<TagInstance>> {
        let inherited = self.require_tag_type(tag_type)?.inherited;
        let decl = decl.into();
        self.source.direct_tags(decl)?;
        let mut visited = FxHashSet::default();
        Ok(self.find_tag_in(decl, tag_type, inherited, &mut visited))
    }

    /// Returns true if a tag of `tag_type` is present on `decl`.
    ///
    /// # Errors
    ///
    /// Returns an error if `tag_type` is not a tag type or `decl` cannot be
    /// resolved.
    pub fn is_tagged(&self, decl: impl Into<Declaration>, tag_type: ClassId) -> Result<bool> {
        Ok(self.find_tag(decl, tag_type)?.is_some())
    }

    /// Finds a tag on a class, optionally continuing outward through the
    /// enclosing classes of inner classes.
    ///
    /// # Errors
    ///
    /// Returns an error if `tag_type` is not a tag type or `class` cannot be
    /// resolved.
    pub fn find_tag_with_enclosing(
        &self,
        class: ClassId,
        tag_type: ClassId,
        search: EnclosingSearch,
    ) -> Result<Option<TagInstance>> {
        let inherited = self.require_tag_type(tag_type)?.inherited;
        self.source.class(class)?;

        let mut current = class;
        let mut seen = FxHashSet::default();
        loop {
            let mut visited = FxHashSet::default();
            if let Some(found) =
                self.find_tag_in(Declaration::Class(current), tag_type, inherited, &mut visited)
            {
                return Ok(Some(found));
            }
            if search == EnclosingSearch::Default {
                return Ok(None);
            }
            let Some(decl) = self.load(current) else {
                return Ok(None);
            };
            match decl.enclosing {
                Some(outer) if decl.is_inner() && seen.insert(outer) => current = outer,
                _ => return Ok(None),
            }
        }
    }

    pub(crate) fn require_tag_type(&self, tag_type: ClassId) -> Result<&TagTypeInfo> {
        self.source.tag_info(tag_type)
    }

    /// Lookup without the tag-type precondition; used as a member filter.
    pub(crate) fn has_tag(&self, decl: Declaration, tag_type: ClassId, inherited: bool) -> bool {
        let mut visited = FxHashSet::default();
        self.find_tag_in(decl, tag_type, inherited, &mut visited).is_some()
    }

    fn find_tag_in(
        &self,
        decl: Declaration,
        tag_type: ClassId,
        inherited: bool,
        visited: &mut FxHashSet<TagInstance>,
    ) -> Option<TagInstance> {
        let direct = match self.source.direct_tags(decl) {
            Ok(tags) => tags,
            Err(err) => {
                tracing::debug!(declaration = ?decl, error = %err, "failed to load tags");
                return None;
            }
        };

        if let Some(tag) = direct.iter().find(|t| t.tag_type() == tag_type) {
            return Some(tag.clone());
        }
        if let Some(tag) = self.find_meta_tag(direct, tag_type, inherited, visited) {
            return Some(tag);
        }

        if let Declaration::Class(id) = decl {
            let class = self.load(id)?;
            let marker = self.source.marker_interface();
            for &ifc in &class.interfaces {
                if Some(ifc) == marker {
                    continue;
                }
                if let Some(tag) = self.find_tag_in(Declaration::Class(ifc), tag_type, inherited, visited) {
                    return Some(tag);
                }
            }
            if inherited && self.source.is_searchable(class.superclass) {
                if let Some(superclass) = class.superclass {
                    if let Some(tag) =
                        self.find_tag_in(Declaration::Class(superclass), tag_type, inherited, visited)
                    {
                        return Some(tag);
                    }
                }
            }
        }

        let full = self.full_tags(decl);
        self.find_meta_tag(&full, tag_type, inherited, visited)
    }

    fn find_meta_tag(
        &self,
        candidates: &[TagInstance],
        tag_type: ClassId,
        inherited: bool,
        visited: &mut FxHashSet<TagInstance>,
    ) -> Option<TagInstance> {
        for candidate in candidates {
            let candidate_type = candidate.tag_type();
            if self.source.is_reserved_tag_type(candidate_type) || !visited.insert(candidate.clone()) {
                continue;
            }
            if let Some(tag) =
                self.find_tag_in(Declaration::Class(candidate_type), tag_type, inherited, visited)
            {
                return Some(tag);
            }
        }
        None
    }

    /// Direct tags plus, for classes, tags of inherited types found on the
    /// superclass chain whose type the subclass does not declare itself.
    pub(crate) fn full_tags(&self, decl: Declaration) -> Vec<TagInstance> {
        let Declaration::Class(id) = decl else {
            return self
                .source
                .direct_tags(decl)
                .map(<[TagInstance]>::to_vec)
                .unwrap_or_default();
        };
        let Some(class) = self.load(id) else {
            return Vec::new();
        };

        let mut tags = class.tags.clone();
        let mut present: FxHashSet<ClassId> = tags.iter().map(TagInstance::tag_type).collect();
        let mut chain = FxHashSet::default();
        let mut current = class.superclass;
        while let Some(superclass) = current {
            if !chain.insert(superclass) {
                break;
            }
            let Some(decl) = self.load(superclass) else {
                break;
            };
            let mut level = FxHashSet::default();
            for tag in &decl.tags {
                let ty = tag.tag_type();
                if !present.contains(&ty) && self.is_inherited_tag_type(ty) {
                    tags.push(tag.clone());
                    level.insert(ty);
                }
            }
            present.extend(level);
            current = decl.superclass;
        }
        tags
    }

    pub(crate) fn is_inherited_tag_type(&self, tag_type: ClassId) -> bool {
        self.source.tag_info(tag_type).is_ok_and(|info| info.inherited)
    }
}
