// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Owning handle for objects created through a DSO or a builtin class.

use super::scene_object::SceneObject;
use crate::dso::{Dso, ObjectDestroyFn};
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::ptr::NonNull;
use std::sync::Arc;

enum Owner {
    /// Allocated by a DSO, freed by its destroy entry point.
    Dso {
        dso: Arc<Dso>,
        destroy: ObjectDestroyFn,
    },
    /// Allocated by the host (`Box`).
    Builtin,
}

/// Exclusive owner of one [`SceneObject`].
///
/// Dereferences to the object. Dropping the handle (or calling
/// [`SceneObjectHandle::destroy`]) releases the object through whoever
/// allocated it. A DSO-backed handle keeps its module loaded.
pub struct SceneObjectHandle {
    object: NonNull<SceneObject>,
    owner: Owner,
}

// SAFETY: the handle owns the object exclusively, SceneObject is Send, and the
// destroy entry point may be called from any thread.
unsafe impl Send for SceneObjectHandle {}
// SAFETY: shared access only hands out &SceneObject, and SceneObject is Sync.
unsafe impl Sync for SceneObjectHandle {}

impl SceneObjectHandle {
    /// Wrap a host-allocated object.
    pub fn from_builtin(object: SceneObject) -> Self {
        Self {
            object: NonNull::from(Box::leak(Box::new(object))),
            owner: Owner::Builtin,
        }
    }

    /// Wrap an object returned by a DSO's create entry point.
    ///
    /// # Safety
    ///
    /// `object` was returned by the create entry point of `dso`, is not owned
    /// by anything else, and `destroy` is `dso`'s destroy entry point.
    pub(crate) unsafe fn from_dso(
        object: NonNull<SceneObject>,
        dso: Arc<Dso>,
        destroy: ObjectDestroyFn,
    ) -> Self {
        Self {
            object,
            owner: Owner::Dso { dso, destroy },
        }
    }

    /// Module that created the object (None for builtin classes).
    pub fn dso(&self) -> Option<&Arc<Dso>> {
        match &self.owner {
            Owner::Dso { dso, .. } => Some(dso),
            Owner::Builtin => None,
        }
    }

    /// Release the object now.
    pub fn destroy(self) {
        drop(self);
    }
}

impl Deref for SceneObjectHandle {
    type Target = SceneObject;

    fn deref(&self) -> &SceneObject {
        // SAFETY: the pointer stays valid and exclusively owned until drop.
        unsafe { self.object.as_ref() }
    }
}

impl DerefMut for SceneObjectHandle {
    fn deref_mut(&mut self) -> &mut SceneObject {
        // SAFETY: see Deref; &mut self guarantees exclusivity.
        unsafe { self.object.as_mut() }
    }
}

impl Drop for SceneObjectHandle {
    fn drop(&mut self) {
        match &self.owner {
            Owner::Dso { dso, destroy } => {
                log::trace!(
                    "[SceneObjectHandle::drop] {}('{}') via {}",
                    self.class_name(),
                    self.name(),
                    dso.path().display()
                );
                // SAFETY: contract of from_dso. The Arc<Dso> field is dropped
                // after this call, so the module is still loaded.
                unsafe { (*destroy)(self.object.as_ptr()) };
            }
            Owner::Builtin => {
                // SAFETY: created by Box::leak in from_builtin.
                drop(unsafe { Box::from_raw(self.object.as_ptr()) });
            }
        }
    }
}

impl fmt::Debug for SceneObjectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneObjectHandle")
            .field("class", &self.class_name())
            .field("name", &self.name())
            .field("dso", &self.dso().map(|d| d.path().to_path_buf()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{AttributeFlags, SceneClass};

    #[test]
    fn test_builtin_handle_derefs_and_drops() {
        let mut sc = SceneClass::new("Group");
        let visible = sc.declare_attribute("visible", true, AttributeFlags::NONE).unwrap();
        sc.finalize();
        let sc = Arc::new(sc);

        let mut handle = SceneObjectHandle::from_builtin(SceneObject::new(sc.clone(), "root"));
        assert!(handle.dso().is_none());
        handle.set(visible, false).unwrap();
        assert_eq!(handle.get(visible).unwrap(), &false);
        assert_eq!(Arc::strong_count(&sc), 2);

        handle.destroy();
        assert_eq!(Arc::strong_count(&sc), 1);
    }

    #[test]
    fn test_handle_is_send() {
        fn assert_send<T: Send + Sync>() {}
        assert_send::<SceneObjectHandle>();
    }
}
