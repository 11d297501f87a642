//! Equivalent interface methods.

use heritage_foundation::{ClassId, MethodId, Result};
use heritage_model::{DeclarationSource, MethodDecl, Visibility};

use crate::engine::Engine;

impl<S: DeclarationSource> Engine<S> {
    /// Returns the interface method that a public class method implements,
    /// or the method itself if there is none.
    ///
    /// Interfaces are searched from the declaring class up. When nothing is
    /// found there and `target_class` is given, the search is repeated from
    /// `target_class` up to the declaring class, which finds interfaces a
    /// subclass adds for an inherited method. Only the first search is cached.
    ///
    /// # Errors
    ///
    /// Returns an error if the method or its declaring class cannot be
    /// resolved.
    pub fn interface_method_if_possible(
        &self,
        method: MethodId,
        target_class: Option<ClassId>,
    ) -> Result<MethodId> {
        let decl = self.source.method(method)?;
        if decl.visibility != Visibility::Public || self.source.class(decl.declaring)?.is_interface() {
            return Ok(method);
        }

        let result = self.caches.interface_method(method, || {
            self.find_interface_method(decl, decl.declaring, self.source.root_class())
        });
        match target_class {
            Some(target) if result == method => {
                Ok(self.find_interface_method(decl, target, Some(decl.declaring)))
            }
            _ => Ok(result),
        }
    }

    fn find_interface_method(
        &self,
        method: &MethodDecl,
        start: ClassId,
        end: Option<ClassId>,
    ) -> MethodId {
        let mut current = Some(start);
        while let Some(class) = current.filter(|&c| Some(c) != end) {
            let Some(decl) = self.load(class) else {
                break;
            };
            for &ifc in &decl.interfaces {
                let found = self.public_methods_of(ifc).into_iter().find(|m| {
                    m.name == method.name && m.parameter_types().eq(method.parameter_types())
                });
                if let Some(found) = found {
                    return found.id;
                }
            }
            current = decl.superclass;
        }
        method.id
    }
}
