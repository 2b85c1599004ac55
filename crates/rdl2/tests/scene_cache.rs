// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::float_cmp)] // Test assertions with constants
#![allow(clippy::missing_panics_doc)] // Tests panic on failure

//! End-to-end attribute and cache behavior on builtin classes.

use rdl2::cache::{self, ValueContainerDequeue, ValueContainerEnqueue};
use rdl2::{
    class_name_from_file_name, AttributeFlags, AttributeType, AttributeValue, Dso, Error,
    LoaderConfig, Result, Rgb, Rgba, SceneClass, SceneClassRegistry, SceneObject,
    SceneObjectInterface, SceneObjectRef, Vec2f, Vec3f, Vec4f,
};
use std::sync::Arc;

fn declare_light(sc: &mut SceneClass) -> Result<SceneObjectInterface> {
    sc.declare_attribute("on", true, AttributeFlags::NONE)?;
    sc.declare_attribute("intensity", 1.0f32, AttributeFlags::BLURRABLE)?;
    Ok(SceneObjectInterface::LIGHT)
}

fn declare_everything(sc: &mut SceneClass) -> Result<SceneObjectInterface> {
    for t in AttributeType::ALL {
        sc.declare_value(t.name(), AttributeValue::zero(t), AttributeFlags::NONE)?;
    }
    Ok(SceneObjectInterface::GENERIC)
}

fn create(sc: Arc<SceneClass>, name: &str) -> SceneObject {
    SceneObject::new(sc, name)
}

fn registry() -> SceneClassRegistry {
    SceneClassRegistry::new(LoaderConfig::new().search_path([std::env::temp_dir()]))
        .with_builtin("Light", declare_light, create)
        .with_builtin("Everything", declare_everything, create)
}

fn sample_value(t: AttributeType) -> AttributeValue {
    match t {
        AttributeType::Bool => true.into(),
        AttributeType::Int => (-42i32).into(),
        AttributeType::Long => (1i64 << 50).into(),
        AttributeType::Float => 3.5f32.into(),
        AttributeType::Double => std::f64::consts::PI.into(),
        AttributeType::String => "héllo".into(),
        AttributeType::Rgb => Rgb::new(0.1, 0.2, 0.3).into(),
        AttributeType::Rgba => Rgba::new(0.1, 0.2, 0.3, 0.5).into(),
        AttributeType::Vec2f => Vec2f::new(1.0, 2.0).into(),
        AttributeType::Vec3f => Vec3f::new(1.0, 2.0, 3.0).into(),
        AttributeType::Vec4f => Vec4f::new(1.0, 2.0, 3.0, 4.0).into(),
        AttributeType::SceneObject => Some(SceneObjectRef::new("Material", "/mtl/gold")).into(),
        AttributeType::BoolVector => vec![false, true].into(),
        AttributeType::IntVector => (0..300).collect::<Vec<i32>>().into(),
        AttributeType::LongVector => vec![i64::MIN, i64::MAX].into(),
        AttributeType::FloatVector => vec![f32::MIN_POSITIVE, 1.0].into(),
        AttributeType::DoubleVector => vec![0.5f64].into(),
        AttributeType::StringVector => vec!["x".to_string(), "yz".to_string()].into(),
        AttributeType::RgbVector => vec![Rgb::WHITE].into(),
        AttributeType::RgbaVector => vec![Rgba::TRANSPARENT, Rgba::from(Rgb::BLACK)].into(),
        AttributeType::Vec2fVector => vec![Vec2f::X, Vec2f::Y].into(),
        AttributeType::Vec3fVector => vec![Vec3f::ONE].into(),
        AttributeType::Vec4fVector => vec![Vec4f::ONE, Vec4f::ZERO].into(),
        AttributeType::SceneObjectVector => vec![
            SceneObjectRef::new("SpotLight", "/l/0"),
            SceneObjectRef::new("SpotLight", "/l/1"),
        ]
        .into(),
    }
}

#[test]
fn test_fresh_instance_returns_declared_default() {
    let reg = registry();
    let sc = reg.load_class("Light").unwrap();
    let intensity = sc.attribute_key::<f32>("intensity").unwrap();
    let obj = reg.create_object("Light", "key").unwrap();
    assert_eq!(obj.get(intensity).unwrap(), &1.0);
}

#[test]
fn test_duplicate_declaration_keeps_count() {
    let mut sc = SceneClass::new("Light");
    declare_light(&mut sc).unwrap();
    let before = sc.attribute_count();
    let err = sc
        .declare_attribute("intensity", 5.0f32, AttributeFlags::NONE)
        .unwrap_err();
    assert!(matches!(err, Error::DuplicateAttributeDeclaration { .. }));
    assert_eq!(sc.attribute_count(), before);
}

#[test]
fn test_concrete_on_intensity_scenario() {
    let reg = registry();
    let sc = reg.load_class("Light").unwrap();
    let on = sc.attribute_key::<bool>("on").unwrap();
    let intensity = sc.attribute_key::<f32>("intensity").unwrap();

    let mut obj = reg.create_object("Light", "key").unwrap();
    obj.set(on, false).unwrap();
    obj.set(intensity, 2.5).unwrap();
    let buf = cache::encode_object(&obj);

    let deq = ValueContainerDequeue::new(&buf).unwrap();
    assert_eq!(deq.header(), buf.len() as u64);

    let mut restored = reg.create_object("Light", "key").unwrap();
    cache::decode_object(&mut restored, &buf).unwrap();
    assert_eq!(restored.get(on).unwrap(), &false);
    assert_eq!(restored.get(intensity).unwrap(), &2.5);
}

#[test]
fn test_round_trip_every_type() {
    let reg = registry();
    let sc = reg.load_class("Everything").unwrap();
    assert_eq!(sc.attribute_count(), AttributeType::ALL.len());

    let mut obj = reg.create_object("Everything", "all").unwrap();
    for (index, t) in AttributeType::ALL.into_iter().enumerate() {
        obj.set_value_at(index, sample_value(t)).unwrap();
    }
    let buf = cache::encode_object(&obj);

    let mut restored = reg.create_object("Everything", "all").unwrap();
    cache::decode_object(&mut restored, &buf).unwrap();
    assert_eq!(restored.values(), obj.values());

    // Defaults (empty strings, null references, empty vectors) survive too.
    let defaults = reg.create_object("Everything", "defaults").unwrap();
    let buf = cache::encode_object(&defaults);
    cache::decode_object(&mut restored, &buf).unwrap();
    assert_eq!(restored.values(), defaults.values());
}

#[test]
fn test_strict_size_mismatch_leaves_object_untouched() {
    let reg = registry();
    let sc = reg.load_class("Light").unwrap();
    let intensity = sc.attribute_key::<f32>("intensity").unwrap();

    let mut source = reg.create_object("Light", "a").unwrap();
    source.set(intensity, 7.0).unwrap();
    let mut buf = cache::encode_object(&source);
    buf.extend_from_slice(&[0, 0, 0, 0]);

    let mut target = reg.create_object("Light", "b").unwrap();
    let err = cache::decode_object(&mut target, &buf).unwrap_err();
    assert_eq!(
        err,
        Error::SizeMismatch {
            data_size: buf.len(),
            header: (buf.len() - 4) as u64,
        }
    );
    assert!(err.is_codec_error());
    assert_eq!(target.get(intensity).unwrap(), &1.0);
    assert!(!target.any_dirty());
}

#[test]
fn test_trusting_decode_of_streamed_view() {
    let reg = registry();
    let obj = reg.create_object("Light", "a").unwrap();
    let buf = cache::encode_object(&obj);

    // Concatenated records: the header of the first no longer matches.
    let mut stream = buf.clone();
    stream.extend_from_slice(&buf);
    assert!(ValueContainerDequeue::new(&stream).is_err());

    let mut deq = ValueContainerDequeue::new_unchecked(&stream[..buf.len()]).unwrap();
    let mut target = reg.create_object("Light", "b").unwrap();
    cache::decode_object_from(&mut target, &mut deq).unwrap();
    assert_eq!(target.values(), obj.values());
}

#[test]
fn test_handwritten_buffer_decodes_positionally() {
    let mut enq = ValueContainerEnqueue::new();
    enq.enq_bool(false);
    enq.enq_float(2.5);
    let buf = enq.finalize();
    assert_eq!(buf.len(), 13);

    let reg = registry();
    let sc = reg.load_class("Light").unwrap();
    let mut obj = reg.create_object("Light", "k").unwrap();
    cache::decode_object(&mut obj, &buf).unwrap();
    assert_eq!(obj.get(sc.attribute_key::<bool>("on").unwrap()).unwrap(), &false);
}

#[test]
fn test_keys_do_not_cross_classes() {
    let reg = registry();
    let light = reg.load_class("Light").unwrap();
    let on = light.attribute_key::<bool>("on").unwrap();
    let obj = reg.create_object("Everything", "x").unwrap();
    assert!(matches!(obj.get(on), Err(Error::KeyRegistryMismatch { .. })));
}

#[test]
fn test_module_lookup_failures() {
    let dir = tempfile::tempdir().unwrap();
    let err = Dso::open("Nope", &[dir.path().to_path_buf()], false).unwrap_err();
    assert!(matches!(err, Error::ModuleNotFound { .. }));

    let reg = SceneClassRegistry::new(LoaderConfig::new().search_path([dir.path()]));
    assert!(matches!(
        reg.create_object("Nope", "x"),
        Err(Error::ModuleNotFound { .. })
    ));
    assert!(reg.class_names().is_empty());
}

#[test]
fn test_class_name_from_file_name_cases() {
    assert_eq!(class_name_from_file_name("Foo.so"), "Foo");
    assert_eq!(class_name_from_file_name("Foo.so.proxy"), "Foo");
    assert_eq!(class_name_from_file_name("Foo.txt"), "");
}
