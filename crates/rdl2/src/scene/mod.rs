// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Scene object type system: classes, typed keys, values and objects.

mod attribute;
mod handle;
mod key;
mod scene_class;
mod scene_object;
pub mod types;
mod value;

pub use attribute::{Attribute, AttributeFlags, SceneObjectInterface};
pub use handle::SceneObjectHandle;
pub use key::{AttributeKey, ClassId};
pub use scene_class::SceneClass;
pub use scene_object::SceneObject;
pub use types::{AttributeType, Rgb, Rgba, SceneObjectRef, Vec2f, Vec3f, Vec4f};
pub use value::{AttributeValue, AttributeValueType};
