// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! SceneClass: the per-class attribute schema filled by a DSO's declare entry point.

use super::attribute::{Attribute, AttributeFlags, SceneObjectInterface};
use super::key::{AttributeKey, ClassId};
use super::types::AttributeType;
use super::value::{AttributeValue, AttributeValueType};
use crate::error::{Error, Result};
use std::collections::HashMap;

/// Attribute schema of one scene object class.
///
/// Attributes are appended while the class is being declared and the table
/// is frozen by [`SceneClass::finalize`]. Each attribute's declaration
/// position is its storage slot in every [`crate::SceneObject`] of the class.
///
/// # Example
///
/// ```rust
/// use rdl2::{AttributeFlags, SceneClass};
///
/// let mut sc = SceneClass::new("SpotLight");
/// let on = sc.declare_attribute("on", true, AttributeFlags::NONE).unwrap();
/// let intensity = sc.declare_attribute("intensity", 1.0f32, AttributeFlags::BLURRABLE).unwrap();
/// sc.finalize();
///
/// assert_eq!(sc.attribute_count(), 2);
/// assert_eq!(intensity.index(), 1);
/// assert_eq!(sc.attribute_key::<bool>("on").unwrap(), on);
/// ```
#[derive(Debug)]
pub struct SceneClass {
    id: ClassId,
    name: String,
    interface: SceneObjectInterface,
    attributes: Vec<Attribute>,
    /// Names and aliases -> attribute index.
    lookup: HashMap<String, usize>,
    finalized: bool,
    declare_error: Option<Error>,
}

impl SceneClass {
    /// Create an empty, mutable class.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ClassId::next(),
            name: name.into(),
            interface: SceneObjectInterface::GENERIC,
            attributes: Vec::new(),
            lookup: HashMap::new(),
            finalized: false,
            declare_error: None,
        }
    }

    pub fn id(&self) -> ClassId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Interface tag returned by the declaration.
    pub fn interface(&self) -> SceneObjectInterface {
        self.interface
    }

    pub(crate) fn set_interface(&mut self, interface: SceneObjectInterface) {
        self.interface = interface;
    }

    /// Declare a new attribute and get its key.
    ///
    /// The attribute type is the one `T` is stored as. Fails if the name (or an
    /// alias) is already taken, or if the class is finalized. A failed call
    /// leaves the class unchanged.
    pub fn declare_attribute<T: AttributeValueType>(
        &mut self,
        name: &str,
        default: T,
        flags: AttributeFlags,
    ) -> Result<AttributeKey<T>> {
        let index = self.declare_value(name, default.into_value(), flags)?;
        Ok(AttributeKey::new(self.id, index))
    }

    /// Untyped declaration, the attribute type comes from the default value.
    ///
    /// Returns the attribute's slot index.
    pub fn declare_value(
        &mut self,
        name: &str,
        default: AttributeValue,
        flags: AttributeFlags,
    ) -> Result<usize> {
        self.check_mutable(name)?;
        if self.lookup.contains_key(name) {
            return Err(Error::DuplicateAttributeDeclaration {
                class: self.name.clone(),
                attribute: name.to_string(),
            });
        }

        let index = self.attributes.len();
        log::trace!(
            "[SceneClass::declare] {}.{} : {} @ {}",
            self.name,
            name,
            default.attribute_type(),
            index
        );
        self.attributes
            .push(Attribute::new(name.to_string(), default, flags, index));
        self.lookup.insert(name.to_string(), index);
        Ok(index)
    }

    /// Add an alternative name for an attribute.
    pub fn add_alias<T: AttributeValueType>(
        &mut self,
        key: AttributeKey<T>,
        alias: &str,
    ) -> Result<()> {
        self.check_mutable(alias)?;
        let index = self.check_key(key)?;
        if self.lookup.contains_key(alias) {
            return Err(Error::DuplicateAttributeDeclaration {
                class: self.name.clone(),
                attribute: alias.to_string(),
            });
        }
        self.lookup.insert(alias.to_string(), index);
        self.attributes[index].aliases.push(alias.to_string());
        Ok(())
    }

    /// Attach a metadata string (label, comment, ...) to an attribute.
    pub fn set_metadata<T: AttributeValueType>(
        &mut self,
        key: AttributeKey<T>,
        meta_key: &str,
        value: &str,
    ) -> Result<()> {
        let index = self.check_key(key)?;
        self.check_mutable(&self.attributes[index].name.clone())?;
        self.attributes[index]
            .metadata
            .insert(meta_key.to_string(), value.to_string());
        Ok(())
    }

    /// Put an attribute in a named UI group.
    pub fn set_group<T: AttributeValueType>(
        &mut self,
        group: &str,
        key: AttributeKey<T>,
    ) -> Result<()> {
        let index = self.check_key(key)?;
        self.check_mutable(&self.attributes[index].name.clone())?;
        self.attributes[index].group = Some(group.to_string());
        Ok(())
    }

    /// Declare one allowed value of an ENUMERABLE Int attribute.
    pub fn set_enum_value(
        &mut self,
        key: AttributeKey<i32>,
        value: i32,
        description: &str,
    ) -> Result<()> {
        let index = self.check_key(key)?;
        let attr_name = self.attributes[index].name.clone();
        self.check_mutable(&attr_name)?;
        let attr = &mut self.attributes[index];
        if !attr.is_enumerable() {
            return Err(Error::DeclarationFailed {
                class: self.name.clone(),
                reason: format!("attribute '{}' is not ENUMERABLE", attr_name),
            });
        }
        match attr.enum_values.iter_mut().find(|(v, _)| *v == value) {
            Some(entry) => entry.1 = description.to_string(),
            None => attr.enum_values.push((value, description.to_string())),
        }
        Ok(())
    }

    /// Freeze the attribute table.
    pub fn finalize(&mut self) {
        if !self.finalized {
            log::debug!(
                "[SceneClass::finalize] '{}' with {} attributes",
                self.name,
                self.attributes.len()
            );
        }
        self.finalized = true;
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }

    /// Attribute at a storage slot.
    pub fn attribute_at(&self, index: usize) -> Option<&Attribute> {
        self.attributes.get(index)
    }

    /// All attributes in declaration order.
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Attribute by name or alias.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.lookup.get(name).map(|&i| &self.attributes[i])
    }

    /// Typed key for an attribute by name or alias.
    ///
    /// This is where the type check happens: `T` must be the declared type.
    pub fn attribute_key<T: AttributeValueType>(&self, name: &str) -> Result<AttributeKey<T>> {
        let attr = self.attribute(name).ok_or_else(|| Error::UnknownAttribute {
            class: self.name.clone(),
            attribute: name.to_string(),
        })?;
        if attr.attr_type != T::TYPE {
            return Err(Error::AttributeTypeMismatch {
                attribute: attr.name.clone(),
                expected: T::TYPE,
                declared: attr.attr_type,
            });
        }
        Ok(AttributeKey::new(self.id, attr.index))
    }

    /// Type of the attribute at a slot.
    pub fn attribute_type_at(&self, index: usize) -> Option<AttributeType> {
        self.attributes.get(index).map(Attribute::attribute_type)
    }

    /// Default values of every attribute, in slot order.
    pub fn default_values(&self) -> Vec<AttributeValue> {
        self.attributes.iter().map(|a| a.default.clone()).collect()
    }

    /// True if `other` declares the same schema (name, interface and
    /// attribute table). Class identities are not compared.
    pub fn same_declaration(&self, other: &SceneClass) -> bool {
        self.name == other.name
            && self.interface == other.interface
            && self.attributes == other.attributes
    }

    /// Record a failure raised inside a DSO's declare entry point.
    ///
    /// Only the first error is kept. The host checks it after the entry
    /// point returns and discards the class.
    #[doc(hidden)]
    pub fn record_declare_error(&mut self, error: Error) {
        if self.declare_error.is_none() {
            self.declare_error = Some(error);
        }
    }

    pub(crate) fn take_declare_error(&mut self) -> Option<Error> {
        self.declare_error.take()
    }

    fn check_mutable(&self, attribute: &str) -> Result<()> {
        if self.finalized {
            return Err(Error::RegistryFinalized {
                class: self.name.clone(),
                attribute: attribute.to_string(),
            });
        }
        Ok(())
    }

    fn check_key<T>(&self, key: AttributeKey<T>) -> Result<usize> {
        if key.class_id() != self.id || key.index() >= self.attributes.len() {
            return Err(Error::KeyRegistryMismatch {
                class: self.name.clone(),
                target: self.name.clone(),
            });
        }
        Ok(key.index())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::types::{Rgb, Vec3f};

    fn light_class() -> (SceneClass, AttributeKey<bool>, AttributeKey<f32>) {
        let mut sc = SceneClass::new("Light");
        let on = sc
            .declare_attribute("on", true, AttributeFlags::NONE)
            .expect("declare on");
        let intensity = sc
            .declare_attribute("intensity", 1.0f32, AttributeFlags::BLURRABLE)
            .expect("declare intensity");
        (sc, on, intensity)
    }

    #[test]
    fn test_declare_assigns_positional_slots() {
        let (sc, on, intensity) = light_class();
        assert_eq!(on.index(), 0);
        assert_eq!(intensity.index(), 1);
        assert_eq!(sc.attribute_count(), 2);
        assert_eq!(sc.attribute_at(1).map(|a| a.name()), Some("intensity"));
        assert_eq!(sc.attribute_type_at(0), Some(AttributeType::Bool));
    }

    #[test]
    fn test_duplicate_declaration_rejected() {
        let (mut sc, _, _) = light_class();
        let err = sc
            .declare_attribute("intensity", 2.0f32, AttributeFlags::NONE)
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateAttributeDeclaration { .. }));
        assert_eq!(sc.attribute_count(), 2);

        // Same name with a different type is rejected too.
        let err = sc
            .declare_attribute("on", 1i32, AttributeFlags::NONE)
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateAttributeDeclaration { .. }));
        assert_eq!(sc.attribute_count(), 2);
    }

    #[test]
    fn test_finalized_class_is_frozen() {
        let (mut sc, on, _) = light_class();
        sc.finalize();
        assert!(sc.is_finalized());

        let err = sc
            .declare_attribute("color", Rgb::WHITE, AttributeFlags::NONE)
            .unwrap_err();
        assert!(matches!(err, Error::RegistryFinalized { .. }));
        assert!(matches!(
            sc.set_metadata(on, "label", "enabled"),
            Err(Error::RegistryFinalized { .. })
        ));
        assert_eq!(sc.attribute_count(), 2);
    }

    #[test]
    fn test_attribute_key_checks_type() {
        let (sc, _, intensity) = light_class();
        assert_eq!(sc.attribute_key::<f32>("intensity").expect("key"), intensity);

        let err = sc.attribute_key::<i32>("intensity").unwrap_err();
        assert_eq!(
            err,
            Error::AttributeTypeMismatch {
                attribute: "intensity".into(),
                expected: AttributeType::Int,
                declared: AttributeType::Float,
            }
        );
        assert!(matches!(
            sc.attribute_key::<f32>("exposure"),
            Err(Error::UnknownAttribute { .. })
        ));
    }

    #[test]
    fn test_aliases_resolve() {
        let (mut sc, _, intensity) = light_class();
        sc.add_alias(intensity, "brightness").expect("alias");
        assert_eq!(sc.attribute_key::<f32>("brightness").expect("key"), intensity);
        assert_eq!(
            sc.attribute("brightness").map(|a| a.aliases().to_vec()),
            Some(vec!["brightness".to_string()])
        );
        assert!(matches!(
            sc.add_alias(intensity, "on"),
            Err(Error::DuplicateAttributeDeclaration { .. })
        ));
        assert!(matches!(
            sc.declare_attribute("brightness", 0.0f32, AttributeFlags::NONE),
            Err(Error::DuplicateAttributeDeclaration { .. })
        ));
    }

    #[test]
    fn test_metadata_group_and_enums() {
        let mut sc = SceneClass::new("Camera");
        let mode = sc
            .declare_attribute("mode", 0i32, AttributeFlags::ENUMERABLE)
            .expect("declare mode");
        let fov = sc
            .declare_attribute("fov", 45.0f32, AttributeFlags::NONE)
            .expect("declare fov");
        sc.set_enum_value(mode, 0, "perspective").expect("enum 0");
        sc.set_enum_value(mode, 1, "orthographic").expect("enum 1");
        sc.set_metadata(fov, "label", "field of view").expect("meta");
        sc.set_group("Projection", fov).expect("group");

        let mode_attr = sc.attribute("mode").expect("mode");
        assert_eq!(mode_attr.enum_description(1), Some("orthographic"));
        let fov_attr = sc.attribute("fov").expect("fov");
        assert_eq!(fov_attr.metadata("label"), Some("field of view"));
        assert_eq!(fov_attr.group(), Some("Projection"));

        let not_enum = sc.declare_attribute("count", 0i32, AttributeFlags::NONE).expect("count");
        assert!(matches!(
            sc.set_enum_value(not_enum, 0, "zero"),
            Err(Error::DeclarationFailed { .. })
        ));
    }

    #[test]
    fn test_foreign_key_rejected() {
        let (mut sc, _, _) = light_class();
        let mut other = SceneClass::new("Other");
        let foreign = other
            .declare_attribute("dir", Vec3f::Z, AttributeFlags::NONE)
            .expect("declare");
        assert!(matches!(
            sc.set_metadata(foreign, "label", "x"),
            Err(Error::KeyRegistryMismatch { .. })
        ));
    }

    #[test]
    fn test_same_declaration() {
        let (mut a, _, _) = light_class();
        let (mut b, _, _) = light_class();
        a.finalize();
        b.finalize();
        assert_ne!(a.id(), b.id());
        assert!(a.same_declaration(&b));

        let (mut c, _, _) = light_class();
        c.declare_attribute("exposure", 0.0f32, AttributeFlags::NONE)
            .expect("declare");
        assert!(!a.same_declaration(&c));
    }

    #[test]
    fn test_declare_error_keeps_first() {
        let mut sc = SceneClass::new("Broken");
        sc.record_declare_error(Error::ClassNotFound("a".into()));
        sc.record_declare_error(Error::ClassNotFound("b".into()));
        assert_eq!(sc.take_declare_error(), Some(Error::ClassNotFound("a".into())));
        assert_eq!(sc.take_declare_error(), None);
    }
}
