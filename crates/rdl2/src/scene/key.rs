// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Typed attribute handles.

use super::value::AttributeValueType;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_CLASS_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a [`crate::SceneClass`] instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(u64);

impl ClassId {
    pub(crate) fn next() -> Self {
        Self(NEXT_CLASS_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

/// Handle to one attribute slot, typed by the attribute's Rust type.
///
/// Keys are only issued by [`crate::SceneClass`], which checks `T` against the
/// declared type at that point. Accessors then trust the key and only verify
/// that it belongs to the object's class.
pub struct AttributeKey<T> {
    class_id: ClassId,
    index: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T: AttributeValueType> AttributeKey<T> {
    pub(crate) fn new(class_id: ClassId, index: usize) -> Self {
        Self {
            class_id,
            index,
            _marker: PhantomData,
        }
    }
}

impl<T> AttributeKey<T> {
    /// Storage slot in the object's value table.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Class that issued this key.
    pub fn class_id(&self) -> ClassId {
        self.class_id
    }
}

impl<T> Clone for AttributeKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for AttributeKey<T> {}

impl<T> PartialEq for AttributeKey<T> {
    fn eq(&self, other: &Self) -> bool {
        self.class_id == other.class_id && self.index == other.index
    }
}

impl<T> Eq for AttributeKey<T> {}

impl<T> Hash for AttributeKey<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.class_id.hash(state);
        self.index.hash(state);
    }
}

impl<T: AttributeValueType> fmt::Debug for AttributeKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeKey")
            .field("class_id", &self.class_id.0)
            .field("index", &self.index)
            .field("type", &T::TYPE)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_ids_are_unique() {
        let a = ClassId::next();
        let b = ClassId::next();
        assert_ne!(a, b);
        assert!(b > a);
    }

    #[test]
    fn test_key_is_copy_and_comparable() {
        let id = ClassId::next();
        let key = AttributeKey::<f32>::new(id, 2);
        let copy = key;
        assert_eq!(key, copy);
        assert_eq!(copy.index(), 2);
        assert_eq!(copy.class_id(), id);
        assert_ne!(key, AttributeKey::<f32>::new(id, 3));

        let far = AttributeKey::<i32>::new(id, usize::MAX);
        assert_eq!(far.index(), usize::MAX);
    }
}
