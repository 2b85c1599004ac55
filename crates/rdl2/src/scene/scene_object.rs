// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! SceneObject: one named instance of a [`SceneClass`], holding a value per attribute.

use super::attribute::SceneObjectInterface;
use super::key::AttributeKey;
use super::scene_class::SceneClass;
use super::value::{AttributeValue, AttributeValueType};
use crate::error::{Error, Result};
use std::sync::Arc;

/// A live object bound to a finalized [`SceneClass`].
///
/// The value table has one slot per declared attribute, in declaration order,
/// and starts out holding the declared defaults. Typed access goes through
/// [`AttributeKey`]s issued by the same class.
///
/// Objects backed by a DSO are built and freed by the module; host code sees
/// them through a [`crate::SceneObjectHandle`].
#[derive(Debug, Clone)]
pub struct SceneObject {
    scene_class: Arc<SceneClass>,
    name: String,
    interface: SceneObjectInterface,
    values: Vec<AttributeValue>,
    dirty: Vec<bool>,
}

impl SceneObject {
    /// Create an object with every attribute at its default value.
    pub fn new(scene_class: Arc<SceneClass>, name: impl Into<String>) -> Self {
        let values = scene_class.default_values();
        let dirty = vec![false; values.len()];
        Self {
            interface: scene_class.interface(),
            scene_class,
            name: name.into(),
            values,
            dirty,
        }
    }

    pub fn scene_class(&self) -> &Arc<SceneClass> {
        &self.scene_class
    }

    pub fn class_name(&self) -> &str {
        self.scene_class.name()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn interface(&self) -> SceneObjectInterface {
        self.interface
    }

    /// True if the object implements every bit of `interface`.
    pub fn is_a(&self, interface: SceneObjectInterface) -> bool {
        self.interface.contains(interface)
    }

    /// Read an attribute.
    pub fn get<T: AttributeValueType>(&self, key: AttributeKey<T>) -> Result<&T> {
        let index = self.check_key(key)?;
        T::from_value(&self.values[index]).ok_or_else(|| self.type_mismatch::<T>(index))
    }

    /// Write an attribute and mark it dirty.
    pub fn set<T: AttributeValueType>(&mut self, key: AttributeKey<T>, value: T) -> Result<()> {
        let index = self.check_key(key)?;
        self.values[index] = value.into_value();
        self.dirty[index] = true;
        Ok(())
    }

    /// Untyped read by slot index.
    pub fn value_at(&self, index: usize) -> Option<&AttributeValue> {
        self.values.get(index)
    }

    /// Untyped write by slot index. The value's tag must match the declaration.
    pub fn set_value_at(&mut self, index: usize, value: AttributeValue) -> Result<()> {
        let attr = self
            .scene_class
            .attribute_at(index)
            .ok_or_else(|| Error::UnknownAttribute {
                class: self.scene_class.name().to_string(),
                attribute: format!("#{}", index),
            })?;
        if attr.attribute_type() != value.attribute_type() {
            return Err(Error::AttributeTypeMismatch {
                attribute: attr.name().to_string(),
                expected: value.attribute_type(),
                declared: attr.attribute_type(),
            });
        }
        self.values[index] = value;
        self.dirty[index] = true;
        Ok(())
    }

    /// Values in slot order.
    pub fn values(&self) -> &[AttributeValue] {
        &self.values
    }

    pub fn is_dirty<T: AttributeValueType>(&self, key: AttributeKey<T>) -> Result<bool> {
        let index = self.check_key(key)?;
        Ok(self.dirty[index])
    }

    pub fn any_dirty(&self) -> bool {
        self.dirty.iter().any(|d| *d)
    }

    /// Slots written since the last [`SceneObject::clear_dirty`].
    pub fn dirty_indices(&self) -> Vec<usize> {
        self.dirty
            .iter()
            .enumerate()
            .filter_map(|(i, d)| d.then_some(i))
            .collect()
    }

    pub fn clear_dirty(&mut self) {
        self.dirty.iter_mut().for_each(|d| *d = false);
    }

    /// Restore one attribute to its declared default.
    pub fn reset_to_default<T: AttributeValueType>(&mut self, key: AttributeKey<T>) -> Result<()> {
        let index = self.check_key(key)?;
        self.reset_slot(index);
        Ok(())
    }

    /// Restore every attribute to its declared default.
    pub fn reset_all_to_default(&mut self) {
        for index in 0..self.values.len() {
            self.reset_slot(index);
        }
    }

    /// Swap in a fully decoded value table. Slots whose value changed become dirty.
    ///
    /// The caller guarantees one value per slot with matching tags.
    pub(crate) fn replace_values(&mut self, values: Vec<AttributeValue>) {
        debug_assert_eq!(values.len(), self.values.len());
        for (i, (old, new)) in self.values.iter().zip(values.iter()).enumerate() {
            if old != new {
                self.dirty[i] = true;
            }
        }
        self.values = values;
    }

    fn reset_slot(&mut self, index: usize) {
        if let Some(attr) = self.scene_class.attribute_at(index) {
            if &self.values[index] != attr.default_value() {
                self.values[index] = attr.default_value().clone();
                self.dirty[index] = true;
            }
        }
    }

    fn check_key<T>(&self, key: AttributeKey<T>) -> Result<usize> {
        if key.class_id() != self.scene_class.id() || key.index() >= self.values.len() {
            return Err(Error::KeyRegistryMismatch {
                class: self.scene_class.name().to_string(),
                target: self.name.clone(),
            });
        }
        Ok(key.index())
    }

    fn type_mismatch<T: AttributeValueType>(&self, index: usize) -> Error {
        let attr = self.scene_class.attribute_at(index);
        Error::AttributeTypeMismatch {
            attribute: attr.map(|a| a.name().to_string()).unwrap_or_default(),
            expected: T::TYPE,
            declared: self.values[index].attribute_type(),
        }
    }
}
