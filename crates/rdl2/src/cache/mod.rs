// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Attribute value cache.
//!
//! # Buffer layout
//!
//! ```text
//! +-----------------------+-----------+-----------+-----+
//! | total length (u64 LE) | value #0  | value #1  | ... |
//! +-----------------------+-----------+-----------+-----+
//! ```
//!
//! A length of 0 means "not recorded". Values follow the class declaration
//! order with no type tags:
//!
//! | Type         | Encoding                                          |
//! |--------------|---------------------------------------------------|
//! | Bool         | 1 byte, 0 or 1                                    |
//! | Int / Float  | 4 bytes LE                                        |
//! | Long / Double| 8 bytes LE                                        |
//! | Rgb, Rgba, Vec2f/3f/4f | 3, 4, 2, 3 or 4 f32 LE                  |
//! | String       | vl-uint byte count, UTF-8 bytes                   |
//! | SceneObject  | presence byte, then class name and name strings   |
//! | vectors      | vl-uint element count, elements                   |
//!
//! Vector elements of SceneObjectVector are class name and name strings
//! (no presence byte).

mod dequeue;
mod enqueue;

pub use dequeue::ValueContainerDequeue;
pub use enqueue::ValueContainerEnqueue;

use crate::error::{Error, Result};
use crate::scene::{AttributeValue, SceneObject};

/// Encode every attribute of `object`, in slot order.
pub fn encode_object(object: &SceneObject) -> Vec<u8> {
    let mut enq = ValueContainerEnqueue::new();
    encode_object_into(object, &mut enq);
    let buf = enq.finalize();
    log::trace!(
        "[cache::encode_object] {}('{}') -> {} bytes",
        object.class_name(),
        object.name(),
        buf.len()
    );
    buf
}

/// Append the attributes of `object` to an open container.
///
/// Several objects can share one container. They are read back in the same
/// order with [`decode_object_from`].
pub fn encode_object_into(object: &SceneObject, enq: &mut ValueContainerEnqueue) {
    for value in object.values() {
        enq.enq_value(value);
    }
}

/// Decode a buffer produced by [`encode_object`] into `object` (strict mode).
///
/// The buffer must hold exactly one object. The object is left untouched on
/// error.
pub fn decode_object(object: &mut SceneObject, buf: &[u8]) -> Result<()> {
    let mut deq = ValueContainerDequeue::new(buf)?;
    let values = dequeue_values(object, &mut deq)?;
    if !deq.is_done() {
        return Err(Error::InvalidData(format!(
            "{} trailing bytes after {} attributes of '{}'",
            deq.remaining(),
            values.len(),
            object.class_name()
        )));
    }
    object.replace_values(values);
    Ok(())
}

/// Decode one object's attributes from an existing dequeue.
///
/// Reads exactly as many values as the class declares and leaves the rest
/// of the data for the next record. The object is left untouched on error.
/// Attributes whose value changed are marked dirty.
pub fn decode_object_from(
    object: &mut SceneObject,
    deq: &mut ValueContainerDequeue<'_>,
) -> Result<()> {
    let values = dequeue_values(object, deq)?;
    object.replace_values(values);
    Ok(())
}

fn dequeue_values(
    object: &SceneObject,
    deq: &mut ValueContainerDequeue<'_>,
) -> Result<Vec<AttributeValue>> {
    let mut values = Vec::with_capacity(object.values().len());
    for attr in object.scene_class().attributes() {
        values.push(deq.deq_value(attr.attribute_type())?);
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{AttributeFlags, AttributeKey, SceneClass};
    use std::sync::Arc;

    fn light() -> (Arc<SceneClass>, AttributeKey<bool>, AttributeKey<f32>) {
        let mut sc = SceneClass::new("Light");
        let on = sc.declare_attribute("on", true, AttributeFlags::NONE).unwrap();
        let intensity = sc
            .declare_attribute("intensity", 1.0f32, AttributeFlags::NONE)
            .unwrap();
        sc.finalize();
        (Arc::new(sc), on, intensity)
    }

    #[test]
    fn test_on_intensity_scenario() {
        let (sc, on, intensity) = light();
        let mut obj = SceneObject::new(sc.clone(), "key");
        obj.set(on, false).unwrap();
        obj.set(intensity, 2.5).unwrap();

        let buf = encode_object(&obj);
        assert_eq!(buf.len(), 8 + 1 + 4);
        assert_eq!(u64::from_le_bytes(buf[..8].try_into().unwrap()), buf.len() as u64);

        let mut restored = SceneObject::new(sc, "key");
        decode_object(&mut restored, &buf).unwrap();
        assert_eq!(restored.get(on).unwrap(), &false);
        assert_eq!(restored.get(intensity).unwrap(), &2.5);
        assert_eq!(restored.dirty_indices(), vec![0, 1]);
    }

    #[test]
    fn test_failed_decode_leaves_object_untouched() {
        let (sc, on, intensity) = light();
        let mut obj = SceneObject::new(sc.clone(), "key");
        obj.set(intensity, 9.0).unwrap();
        let mut buf = encode_object(&obj);
        buf.pop();

        let mut target = SceneObject::new(sc, "key");
        let err = decode_object(&mut target, &buf).unwrap_err();
        assert!(matches!(err, Error::SizeMismatch { .. }));
        assert_eq!(target.get(on).unwrap(), &true);
        assert_eq!(target.get(intensity).unwrap(), &1.0);
        assert!(!target.any_dirty());

        let mut deq = ValueContainerDequeue::new_unchecked(&buf).unwrap();
        let err = decode_object_from(&mut target, &mut deq).unwrap_err();
        assert!(matches!(err, Error::TruncatedDecode { .. }));
        assert_eq!(target.get(intensity).unwrap(), &1.0);
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let (sc, _, intensity) = light();
        let obj = SceneObject::new(sc.clone(), "key");
        let mut enq = ValueContainerEnqueue::new();
        for value in obj.values() {
            enq.enq_value(value);
        }
        enq.enq_int(0);
        let buf = enq.finalize();

        let mut target = SceneObject::new(sc, "key");
        target.set(intensity, 4.0).unwrap();
        let err = decode_object(&mut target, &buf).unwrap_err();
        assert!(matches!(err, Error::InvalidData(_)));
        assert_eq!(target.get(intensity).unwrap(), &4.0);
    }

    #[test]
    fn test_several_objects_in_one_container() {
        let (sc, on, intensity) = light();
        let mut first = SceneObject::new(sc.clone(), "key");
        first.set(intensity, 2.0).unwrap();
        let mut second = SceneObject::new(sc.clone(), "fill");
        second.set(on, false).unwrap();
        second.set(intensity, 0.5).unwrap();

        let mut enq = ValueContainerEnqueue::new();
        encode_object_into(&first, &mut enq);
        encode_object_into(&second, &mut enq);
        let buf = enq.finalize();

        let mut deq = ValueContainerDequeue::new(&buf).unwrap();
        let mut a = SceneObject::new(sc.clone(), "a");
        let mut b = SceneObject::new(sc.clone(), "b");
        decode_object_from(&mut a, &mut deq).unwrap();
        assert!(!deq.is_done());
        decode_object_from(&mut b, &mut deq).unwrap();
        assert!(deq.is_done());
        assert_eq!(a.values(), first.values());
        assert_eq!(b.values(), second.values());

        // As a single-object buffer the same bytes carry a trailing record.
        let mut whole = SceneObject::new(sc, "whole");
        let err = decode_object(&mut whole, &buf).unwrap_err();
        assert!(matches!(err, Error::InvalidData(_)));
        assert!(!whole.any_dirty());
    }
}
