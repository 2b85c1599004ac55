// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Tagged attribute values and the typed bridge used by [`AttributeKey`].
//!
//! [`AttributeKey`]: crate::scene::AttributeKey

use super::types::{AttributeType, Rgb, Rgba, SceneObjectRef, Vec2f, Vec3f, Vec4f};

/// A single attribute slot value.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Bool(bool),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    Rgb(Rgb),
    Rgba(Rgba),
    Vec2f(Vec2f),
    Vec3f(Vec3f),
    Vec4f(Vec4f),
    SceneObject(Option<SceneObjectRef>),
    BoolVector(Vec<bool>),
    IntVector(Vec<i32>),
    LongVector(Vec<i64>),
    FloatVector(Vec<f32>),
    DoubleVector(Vec<f64>),
    StringVector(Vec<String>),
    RgbVector(Vec<Rgb>),
    RgbaVector(Vec<Rgba>),
    Vec2fVector(Vec<Vec2f>),
    Vec3fVector(Vec<Vec3f>),
    Vec4fVector(Vec<Vec4f>),
    SceneObjectVector(Vec<SceneObjectRef>),
}

impl AttributeValue {
    /// Type tag of this value.
    // @audit-ok: Simple pattern matching - one arm per variant
    pub fn attribute_type(&self) -> AttributeType {
        match self {
            Self::Bool(_) => AttributeType::Bool,
            Self::Int(_) => AttributeType::Int,
            Self::Long(_) => AttributeType::Long,
            Self::Float(_) => AttributeType::Float,
            Self::Double(_) => AttributeType::Double,
            Self::String(_) => AttributeType::String,
            Self::Rgb(_) => AttributeType::Rgb,
            Self::Rgba(_) => AttributeType::Rgba,
            Self::Vec2f(_) => AttributeType::Vec2f,
            Self::Vec3f(_) => AttributeType::Vec3f,
            Self::Vec4f(_) => AttributeType::Vec4f,
            Self::SceneObject(_) => AttributeType::SceneObject,
            Self::BoolVector(_) => AttributeType::BoolVector,
            Self::IntVector(_) => AttributeType::IntVector,
            Self::LongVector(_) => AttributeType::LongVector,
            Self::FloatVector(_) => AttributeType::FloatVector,
            Self::DoubleVector(_) => AttributeType::DoubleVector,
            Self::StringVector(_) => AttributeType::StringVector,
            Self::RgbVector(_) => AttributeType::RgbVector,
            Self::RgbaVector(_) => AttributeType::RgbaVector,
            Self::Vec2fVector(_) => AttributeType::Vec2fVector,
            Self::Vec3fVector(_) => AttributeType::Vec3fVector,
            Self::Vec4fVector(_) => AttributeType::Vec4fVector,
            Self::SceneObjectVector(_) => AttributeType::SceneObjectVector,
        }
    }

    /// Zero value for a type (false, 0, empty string, black, null, empty vector).
    pub fn zero(attr_type: AttributeType) -> Self {
        match attr_type {
            AttributeType::Bool => Self::Bool(false),
            AttributeType::Int => Self::Int(0),
            AttributeType::Long => Self::Long(0),
            AttributeType::Float => Self::Float(0.0),
            AttributeType::Double => Self::Double(0.0),
            AttributeType::String => Self::String(String::new()),
            AttributeType::Rgb => Self::Rgb(Rgb::BLACK),
            AttributeType::Rgba => Self::Rgba(Rgba::TRANSPARENT),
            AttributeType::Vec2f => Self::Vec2f(Vec2f::ZERO),
            AttributeType::Vec3f => Self::Vec3f(Vec3f::ZERO),
            AttributeType::Vec4f => Self::Vec4f(Vec4f::ZERO),
            AttributeType::SceneObject => Self::SceneObject(None),
            AttributeType::BoolVector => Self::BoolVector(Vec::new()),
            AttributeType::IntVector => Self::IntVector(Vec::new()),
            AttributeType::LongVector => Self::LongVector(Vec::new()),
            AttributeType::FloatVector => Self::FloatVector(Vec::new()),
            AttributeType::DoubleVector => Self::DoubleVector(Vec::new()),
            AttributeType::StringVector => Self::StringVector(Vec::new()),
            AttributeType::RgbVector => Self::RgbVector(Vec::new()),
            AttributeType::RgbaVector => Self::RgbaVector(Vec::new()),
            AttributeType::Vec2fVector => Self::Vec2fVector(Vec::new()),
            AttributeType::Vec3fVector => Self::Vec3fVector(Vec::new()),
            AttributeType::Vec4fVector => Self::Vec4fVector(Vec::new()),
            AttributeType::SceneObjectVector => Self::SceneObjectVector(Vec::new()),
        }
    }

    /// Element count for vector values (None for scalars).
    pub fn len(&self) -> Option<usize> {
        match self {
            Self::BoolVector(v) => Some(v.len()),
            Self::IntVector(v) => Some(v.len()),
            Self::LongVector(v) => Some(v.len()),
            Self::FloatVector(v) => Some(v.len()),
            Self::DoubleVector(v) => Some(v.len()),
            Self::StringVector(v) => Some(v.len()),
            Self::RgbVector(v) => Some(v.len()),
            Self::RgbaVector(v) => Some(v.len()),
            Self::Vec2fVector(v) => Some(v.len()),
            Self::Vec3fVector(v) => Some(v.len()),
            Self::Vec4fVector(v) => Some(v.len()),
            Self::SceneObjectVector(v) => Some(v.len()),
            _ => None,
        }
    }
}

/// Rust types that can live in an attribute slot.
///
/// Implemented for exactly one Rust type per [`AttributeType`], which is what
/// lets a key's type parameter stand in for the runtime tag.
pub trait AttributeValueType: Clone + Sized + 'static {
    /// Tag this type is stored under.
    const TYPE: AttributeType;

    /// Wrap into a tagged value.
    fn into_value(self) -> AttributeValue;

    /// Borrow from a tagged value (None on tag mismatch).
    fn from_value(value: &AttributeValue) -> Option<&Self>;
}

macro_rules! impl_attribute_value_type {
    ($ty:ty, $variant:ident) => {
        impl AttributeValueType for $ty {
            const TYPE: AttributeType = AttributeType::$variant;

            fn into_value(self) -> AttributeValue {
                AttributeValue::$variant(self)
            }

            fn from_value(value: &AttributeValue) -> Option<&Self> {
                match value {
                    AttributeValue::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }

        impl From<$ty> for AttributeValue {
            fn from(v: $ty) -> Self {
                AttributeValue::$variant(v)
            }
        }
    };
}

impl_attribute_value_type!(bool, Bool);
impl_attribute_value_type!(i32, Int);
impl_attribute_value_type!(i64, Long);
impl_attribute_value_type!(f32, Float);
impl_attribute_value_type!(f64, Double);
impl_attribute_value_type!(String, String);
impl_attribute_value_type!(Rgb, Rgb);
impl_attribute_value_type!(Rgba, Rgba);
impl_attribute_value_type!(Vec2f, Vec2f);
impl_attribute_value_type!(Vec3f, Vec3f);
impl_attribute_value_type!(Vec4f, Vec4f);
impl_attribute_value_type!(Option<SceneObjectRef>, SceneObject);
impl_attribute_value_type!(Vec<bool>, BoolVector);
impl_attribute_value_type!(Vec<i32>, IntVector);
impl_attribute_value_type!(Vec<i64>, LongVector);
impl_attribute_value_type!(Vec<f32>, FloatVector);
impl_attribute_value_type!(Vec<f64>, DoubleVector);
impl_attribute_value_type!(Vec<String>, StringVector);
impl_attribute_value_type!(Vec<Rgb>, RgbVector);
impl_attribute_value_type!(Vec<Rgba>, RgbaVector);
impl_attribute_value_type!(Vec<Vec2f>, Vec2fVector);
impl_attribute_value_type!(Vec<Vec3f>, Vec3fVector);
impl_attribute_value_type!(Vec<Vec4f>, Vec4fVector);
impl_attribute_value_type!(Vec<SceneObjectRef>, SceneObjectVector);

impl From<&str> for AttributeValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}
