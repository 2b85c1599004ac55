// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Attribute definitions, attribute flags and object interface tags.

use super::types::AttributeType;
use super::value::AttributeValue;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Attribute behavior flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AttributeFlags(u32);

impl AttributeFlags {
    pub const NONE: AttributeFlags = AttributeFlags(0);
    /// Value may differ between motion blur timesteps.
    pub const BLURRABLE: AttributeFlags = AttributeFlags(1 << 0);
    /// Int attribute restricted to a declared set of enum values.
    pub const ENUMERABLE: AttributeFlags = AttributeFlags(1 << 1);
    /// String attribute holding a file path.
    pub const FILENAME: AttributeFlags = AttributeFlags(1 << 2);
    /// Changing the value never requires a geometry reload.
    pub const CAN_SKIP_GEOM_RELOAD: AttributeFlags = AttributeFlags(1 << 3);

    pub const fn bits(&self) -> u32 {
        self.0
    }

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn contains(&self, other: AttributeFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl BitOr for AttributeFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for AttributeFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Object kinds a class implements, returned by the declare entry point.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SceneObjectInterface(u32);

impl SceneObjectInterface {
    pub const GENERIC: SceneObjectInterface = SceneObjectInterface(1 << 0);
    pub const GEOMETRY: SceneObjectInterface = SceneObjectInterface(1 << 1);
    pub const GEOMETRY_SET: SceneObjectInterface = SceneObjectInterface(1 << 2);
    pub const LAYER: SceneObjectInterface = SceneObjectInterface(1 << 3);
    pub const LIGHT: SceneObjectInterface = SceneObjectInterface(1 << 4);
    pub const LIGHT_SET: SceneObjectInterface = SceneObjectInterface(1 << 5);
    pub const LIGHT_FILTER: SceneObjectInterface = SceneObjectInterface(1 << 6);
    pub const MATERIAL: SceneObjectInterface = SceneObjectInterface(1 << 7);
    pub const MAP: SceneObjectInterface = SceneObjectInterface(1 << 8);
    pub const DISPLACEMENT: SceneObjectInterface = SceneObjectInterface(1 << 9);
    pub const VOLUME_SHADER: SceneObjectInterface = SceneObjectInterface(1 << 10);
    pub const CAMERA: SceneObjectInterface = SceneObjectInterface(1 << 11);
    pub const ENV_MAP: SceneObjectInterface = SceneObjectInterface(1 << 12);
    pub const RENDER_OUTPUT: SceneObjectInterface = SceneObjectInterface(1 << 13);
    pub const USER_DATA: SceneObjectInterface = SceneObjectInterface(1 << 14);
    pub const SCENE_VARIABLES: SceneObjectInterface = SceneObjectInterface(1 << 15);

    const NAMES: [(SceneObjectInterface, &'static str); 16] = [
        (Self::GENERIC, "GENERIC"),
        (Self::GEOMETRY, "GEOMETRY"),
        (Self::GEOMETRY_SET, "GEOMETRY_SET"),
        (Self::LAYER, "LAYER"),
        (Self::LIGHT, "LIGHT"),
        (Self::LIGHT_SET, "LIGHT_SET"),
        (Self::LIGHT_FILTER, "LIGHT_FILTER"),
        (Self::MATERIAL, "MATERIAL"),
        (Self::MAP, "MAP"),
        (Self::DISPLACEMENT, "DISPLACEMENT"),
        (Self::VOLUME_SHADER, "VOLUME_SHADER"),
        (Self::CAMERA, "CAMERA"),
        (Self::ENV_MAP, "ENV_MAP"),
        (Self::RENDER_OUTPUT, "RENDER_OUTPUT"),
        (Self::USER_DATA, "USER_DATA"),
        (Self::SCENE_VARIABLES, "SCENE_VARIABLES"),
    ];

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn bits(&self) -> u32 {
        self.0
    }

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn contains(&self, other: SceneObjectInterface) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl BitOr for SceneObjectInterface {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl fmt::Display for SceneObjectInterface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = Self::NAMES
            .iter()
            .filter(|(bit, _)| self.contains(*bit))
            .map(|(_, name)| *name)
            .collect();
        if names.is_empty() {
            f.write_str("NONE")
        } else {
            f.write_str(&names.join(" | "))
        }
    }
}

/// One declared attribute of a [`crate::SceneClass`].
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub(crate) name: String,
    pub(crate) attr_type: AttributeType,
    pub(crate) default: AttributeValue,
    pub(crate) flags: AttributeFlags,
    pub(crate) index: usize,
    pub(crate) aliases: Vec<String>,
    pub(crate) metadata: BTreeMap<String, String>,
    pub(crate) enum_values: Vec<(i32, String)>,
    pub(crate) group: Option<String>,
}

impl Attribute {
    pub(crate) fn new(
        name: String,
        default: AttributeValue,
        flags: AttributeFlags,
        index: usize,
    ) -> Self {
        Self {
            name,
            attr_type: default.attribute_type(),
            default,
            flags,
            index,
            aliases: Vec::new(),
            metadata: BTreeMap::new(),
            enum_values: Vec::new(),
            group: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attribute_type(&self) -> AttributeType {
        self.attr_type
    }

    pub fn default_value(&self) -> &AttributeValue {
        &self.default
    }

    pub fn flags(&self) -> AttributeFlags {
        self.flags
    }

    /// Storage slot of this attribute (its declaration position).
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn metadata(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }

    pub fn metadata_entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.metadata.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn enum_values(&self) -> &[(i32, String)] {
        &self.enum_values
    }

    /// Description of an enum value (None if not declared).
    pub fn enum_description(&self, value: i32) -> Option<&str> {
        self.enum_values
            .iter()
            .find(|(v, _)| *v == value)
            .map(|(_, d)| d.as_str())
    }

    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    pub fn is_blurrable(&self) -> bool {
        self.flags.contains(AttributeFlags::BLURRABLE)
    }

    pub fn is_enumerable(&self) -> bool {
        self.flags.contains(AttributeFlags::ENUMERABLE)
    }

    pub fn is_filename(&self) -> bool {
        self.flags.contains(AttributeFlags::FILENAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_combine() {
        let flags = AttributeFlags::BLURRABLE | AttributeFlags::FILENAME;
        assert!(flags.contains(AttributeFlags::BLURRABLE));
        assert!(flags.contains(AttributeFlags::FILENAME));
        assert!(!flags.contains(AttributeFlags::ENUMERABLE));
        assert!(AttributeFlags::NONE.is_empty());
    }

    #[test]
    fn test_interface_display() {
        let iface = SceneObjectInterface::GENERIC | SceneObjectInterface::LIGHT;
        assert_eq!(iface.to_string(), "GENERIC | LIGHT");
        assert_eq!(SceneObjectInterface::empty().to_string(), "NONE");
    }

    #[test]
    fn test_attribute_accessors() {
        let mut attr = Attribute::new(
            "mode".into(),
            AttributeValue::Int(0),
            AttributeFlags::ENUMERABLE,
            3,
        );
        attr.enum_values.push((0, "off".into()));
        attr.enum_values.push((1, "on".into()));

        assert_eq!(attr.attribute_type(), AttributeType::Int);
        assert_eq!(attr.index(), 3);
        assert!(attr.is_enumerable());
        assert_eq!(attr.enum_description(1), Some("on"));
        assert_eq!(attr.enum_description(7), None);
    }
}
