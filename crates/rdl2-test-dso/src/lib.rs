// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! `TestLight` DSO.
//!
//! Declares one attribute of every supported type. Built as a `cdylib` for
//! the loader tests and as an `rlib` so tests can reuse the declaration as a
//! builtin class.

use rdl2::{
    AttributeFlags, DsoClass, Result, Rgb, Rgba, SceneClass, SceneObjectInterface, SceneObjectRef,
    Vec2f, Vec3f, Vec4f,
};

/// Class name, and DSO file stem.
pub const CLASS_NAME: &str = "TestLight";

/// Number of attributes declared by [`TestLight`].
pub const ATTRIBUTE_COUNT: usize = 25;

pub struct TestLight;

impl DsoClass for TestLight {
    fn declare(sc: &mut SceneClass) -> Result<SceneObjectInterface> {
        let blur = AttributeFlags::BLURRABLE;
        let none = AttributeFlags::NONE;

        sc.declare_attribute("on", true, none)?;
        let intensity = sc.declare_attribute("intensity", 1.0f32, blur)?;
        sc.add_alias(intensity, "brightness")?;
        sc.set_metadata(intensity, "label", "intensity")?;
        sc.set_metadata(intensity, "comment", "light multiplier")?;
        sc.set_group("Properties", intensity)?;

        let mode = sc.declare_attribute("mode", 0i32, AttributeFlags::ENUMERABLE)?;
        sc.set_enum_value(mode, 0, "point")?;
        sc.set_enum_value(mode, 1, "spot")?;
        sc.set_enum_value(mode, 2, "area")?;

        sc.declare_attribute("seed", 0i64, none)?;
        sc.declare_attribute("exposure", 0.0f64, blur)?;
        sc.declare_attribute("label", String::new(), none)?;
        sc.declare_attribute("texture", String::new(), AttributeFlags::FILENAME)?;
        sc.declare_attribute("color", Rgb::WHITE, blur)?;
        sc.declare_attribute("tint", Rgba::new(1.0, 1.0, 1.0, 1.0), none)?;
        sc.declare_attribute("uv", Vec2f::ZERO, none)?;
        sc.declare_attribute("direction", Vec3f::NEG_Z, blur)?;
        sc.declare_attribute("plane", Vec4f::ZERO, none)?;
        sc.declare_attribute("geometry", None::<SceneObjectRef>, none)?;

        sc.declare_attribute("mask", Vec::<bool>::new(), none)?;
        sc.declare_attribute("ids", Vec::<i32>::new(), none)?;
        sc.declare_attribute("stamps", Vec::<i64>::new(), none)?;
        sc.declare_attribute("weights", Vec::<f32>::new(), none)?;
        sc.declare_attribute("samples", Vec::<f64>::new(), none)?;
        sc.declare_attribute("tags", Vec::<String>::new(), none)?;
        sc.declare_attribute("palette", Vec::<Rgb>::new(), none)?;
        sc.declare_attribute("tints", Vec::<Rgba>::new(), none)?;
        sc.declare_attribute("uvs", Vec::<Vec2f>::new(), none)?;
        sc.declare_attribute("points", Vec::<Vec3f>::new(), none)?;
        sc.declare_attribute("planes", Vec::<Vec4f>::new(), none)?;
        sc.declare_attribute("light_set", Vec::<SceneObjectRef>::new(), none)?;

        Ok(SceneObjectInterface::LIGHT)
    }
}

rdl2::rdl2_dso_class!(TestLight);
