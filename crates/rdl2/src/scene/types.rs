// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Attribute type tags and the Rust types backing them.

use std::fmt;

pub use glam::{Vec2 as Vec2f, Vec3 as Vec3f, Vec4 as Vec4f};

pub type Bool = bool;
pub type Int = i32;
pub type Long = i64;
pub type Float = f32;
pub type Double = f64;
pub type String = std::string::String;

pub type BoolVector = Vec<Bool>;
pub type IntVector = Vec<Int>;
pub type LongVector = Vec<Long>;
pub type FloatVector = Vec<Float>;
pub type DoubleVector = Vec<Double>;
pub type StringVector = Vec<String>;
pub type RgbVector = Vec<Rgb>;
pub type RgbaVector = Vec<Rgba>;
pub type Vec2fVector = Vec<Vec2f>;
pub type Vec3fVector = Vec<Vec3f>;
pub type Vec4fVector = Vec<Vec4f>;
pub type SceneObjectVector = Vec<SceneObjectRef>;

/// Attribute type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeType {
    Bool,
    Int,
    Long,
    Float,
    Double,
    String,
    Rgb,
    Rgba,
    Vec2f,
    Vec3f,
    Vec4f,
    SceneObject,
    BoolVector,
    IntVector,
    LongVector,
    FloatVector,
    DoubleVector,
    StringVector,
    RgbVector,
    RgbaVector,
    Vec2fVector,
    Vec3fVector,
    Vec4fVector,
    SceneObjectVector,
}

impl AttributeType {
    /// Every type tag, scalars first.
    pub const ALL: [AttributeType; 24] = [
        Self::Bool,
        Self::Int,
        Self::Long,
        Self::Float,
        Self::Double,
        Self::String,
        Self::Rgb,
        Self::Rgba,
        Self::Vec2f,
        Self::Vec3f,
        Self::Vec4f,
        Self::SceneObject,
        Self::BoolVector,
        Self::IntVector,
        Self::LongVector,
        Self::FloatVector,
        Self::DoubleVector,
        Self::StringVector,
        Self::RgbVector,
        Self::RgbaVector,
        Self::Vec2fVector,
        Self::Vec3fVector,
        Self::Vec4fVector,
        Self::SceneObjectVector,
    ];

    /// Type name as used in messages and tool output.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bool => "Bool",
            Self::Int => "Int",
            Self::Long => "Long",
            Self::Float => "Float",
            Self::Double => "Double",
            Self::String => "String",
            Self::Rgb => "Rgb",
            Self::Rgba => "Rgba",
            Self::Vec2f => "Vec2f",
            Self::Vec3f => "Vec3f",
            Self::Vec4f => "Vec4f",
            Self::SceneObject => "SceneObject*",
            Self::BoolVector => "BoolVector",
            Self::IntVector => "IntVector",
            Self::LongVector => "LongVector",
            Self::FloatVector => "FloatVector",
            Self::DoubleVector => "DoubleVector",
            Self::StringVector => "StringVector",
            Self::RgbVector => "RgbVector",
            Self::RgbaVector => "RgbaVector",
            Self::Vec2fVector => "Vec2fVector",
            Self::Vec3fVector => "Vec3fVector",
            Self::Vec4fVector => "Vec4fVector",
            Self::SceneObjectVector => "SceneObjectVector",
        }
    }

    /// Check if this is a homogeneous vector type.
    pub fn is_vector(&self) -> bool {
        self.element_type().is_some()
    }

    /// Element type of a vector type (None for scalars).
    pub fn element_type(&self) -> Option<AttributeType> {
        match self {
            Self::BoolVector => Some(Self::Bool),
            Self::IntVector => Some(Self::Int),
            Self::LongVector => Some(Self::Long),
            Self::FloatVector => Some(Self::Float),
            Self::DoubleVector => Some(Self::Double),
            Self::StringVector => Some(Self::String),
            Self::RgbVector => Some(Self::Rgb),
            Self::RgbaVector => Some(Self::Rgba),
            Self::Vec2fVector => Some(Self::Vec2f),
            Self::Vec3fVector => Some(Self::Vec3f),
            Self::Vec4fVector => Some(Self::Vec4f),
            Self::SceneObjectVector => Some(Self::SceneObject),
            _ => None,
        }
    }

    /// Encoded size in bytes for fixed-size scalars (None for strings,
    /// object references and vectors).
    pub fn encoded_size(&self) -> Option<usize> {
        match self {
            Self::Bool => Some(1),
            Self::Int | Self::Float => Some(4),
            Self::Long | Self::Double | Self::Vec2f => Some(8),
            Self::Rgb | Self::Vec3f => Some(12),
            Self::Rgba | Self::Vec4f => Some(16),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Linear RGB color.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

/// Linear RGB color with alpha.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

impl From<Rgb> for Rgba {
    fn from(c: Rgb) -> Self {
        Self::new(c.r, c.g, c.b, 1.0)
    }
}

/// Reference from one scene object to another, by class and object name.
///
/// Objects are owned by the DSOs that created them, so attributes refer to
/// them by identity rather than by address. A null reference is `None` in a
/// `SceneObject` attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SceneObjectRef {
    pub class_name: String,
    pub name: String,
}

impl SceneObjectRef {
    pub fn new(class_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for SceneObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}('{}')", self.class_name, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_element_types() {
        assert_eq!(
            AttributeType::FloatVector.element_type(),
            Some(AttributeType::Float)
        );
        assert_eq!(
            AttributeType::SceneObjectVector.element_type(),
            Some(AttributeType::SceneObject)
        );
        assert!(AttributeType::Rgb.element_type().is_none());

        let vectors = AttributeType::ALL.iter().filter(|t| t.is_vector()).count();
        assert_eq!(vectors, 12);
    }

    #[test]
    fn test_encoded_size() {
        assert_eq!(AttributeType::Bool.encoded_size(), Some(1));
        assert_eq!(AttributeType::Vec3f.encoded_size(), Some(12));
        assert_eq!(AttributeType::String.encoded_size(), None);
        assert_eq!(AttributeType::IntVector.encoded_size(), None);
    }

    #[test]
    fn test_scene_object_ref_display() {
        let r = SceneObjectRef::new("RectLight", "/key");
        assert_eq!(r.to_string(), "RectLight('/key')");
    }
}
