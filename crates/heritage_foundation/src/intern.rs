//! String interning for declaration names.
//!
//! Qualified class names and member names are interned so that signature
//! comparisons during hierarchy walks compare integers instead of strings.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Interned name identifier.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NameId(pub(crate) u32);

impl NameId {
    /// Returns the raw index of this name.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }

    // =========================================================================
    // Reserved Names
    // =========================================================================
    // These are always interned at startup with fixed indices.

    /// Reserved name of the array attribute of a container tag: `value`
    pub const VALUE: NameId = NameId(0);
}

impl fmt::Debug for NameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NameId({})", self.0)
    }
}

/// Interner for declaration names.
///
/// Not synchronized: a graph builder owns its interner while loading, and the
/// finished graph only reads from it.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Interner {
    /// String storage, indexed by `NameId`.
    strings: Vec<Arc<str>>,
    /// Map from string to `NameId`.
    name_map: FxHashMap<Arc<str>, NameId>,
}

impl Interner {
    /// Reserved names that are pre-interned at startup.
    const RESERVED_NAMES: &'static [&'static str] = &[
        "value", // NameId(0) = VALUE
    ];

    /// Creates a new interner with reserved names pre-interned.
    #[must_use]
    pub fn new() -> Self {
        let mut interner = Self::default();

        for (i, &name) in Self::RESERVED_NAMES.iter().enumerate() {
            let id = interner.intern(name);
            debug_assert_eq!(
                id.0 as usize, i,
                "Reserved name '{}' should have index {}, got {}",
                name, i, id.0
            );
        }

        interner
    }

    /// Interns a name, returning its [`NameId`].
    ///
    /// # Panics
    ///
    /// Panics if the number of interned names exceeds `u32::MAX`.
    pub fn intern(&mut self, s: &str) -> NameId {
        if let Some(&id) = self.name_map.get(s) {
            return id;
        }

        let idx = u32::try_from(self.strings.len()).expect("too many interned names");
        let arc: Arc<str> = s.into();
        self.strings.push(arc.clone());
        let id = NameId(idx);
        self.name_map.insert(arc, id);
        id
    }

    /// Looks up a name without interning it.
    #[must_use]
    pub fn lookup(&self, s: &str) -> Option<NameId> {
        self.name_map.get(s).copied()
    }

    /// Gets the string for a name.
    #[must_use]
    pub fn resolve(&self, id: NameId) -> Option<&str> {
        self.strings.get(id.0 as usize).map(AsRef::as_ref)
    }

    /// Gets the shared string for a name.
    #[must_use]
    pub fn resolve_arc(&self, id: NameId) -> Option<Arc<str>> {
        self.strings.get(id.0 as usize).cloned()
    }

    /// Returns the number of interned names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Returns true if only the reserved names are interned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strings.len() <= Self::RESERVED_NAMES.len()
    }
}
