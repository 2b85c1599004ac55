// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # rdl2 - Scene object type system with DSO plugins
//!
//! Scene object classes live in separately compiled modules (DSOs). A DSO
//! declares the typed attributes of its class and builds objects of it; the
//! host loads the DSO by class name, reads and writes attributes through
//! typed keys, and snapshots attribute values into compact binary buffers.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rdl2::{LoaderConfig, Result, SceneClassRegistry};
//!
//! fn main() -> Result<()> {
//!     let registry = SceneClassRegistry::new(LoaderConfig::from_env());
//!
//!     // Loads SpotLight.so from the search path and runs its declaration
//!     let spot = registry.load_class("SpotLight")?;
//!     let intensity = spot.attribute_key::<f32>("intensity")?;
//!
//!     let mut light = registry.create_object("SpotLight", "/key_light")?;
//!     light.set(intensity, 2.5)?;
//!
//!     let snapshot = rdl2::cache::encode_object(&light);
//!     rdl2::cache::decode_object(&mut light, &snapshot)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------------------------------------------------+
//! |  DsoFinder         explicit path | . | RDL2_DSO_PATH | launcher guess |
//! +---------------------------------------------------------------------+
//! |  Dso               open <Class>.so, resolve rdl2_declare/create/destroy |
//! +---------------------------------------------------------------------+
//! |  SceneClass        attribute schema, issues AttributeKey<T>          |
//! +---------------------------------------------------------------------+
//! |  SceneObject       value table, typed get/set, dirty tracking        |
//! +---------------------------------------------------------------------+
//! |  cache             ValueContainerEnqueue / ValueContainerDequeue     |
//! +---------------------------------------------------------------------+
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`DsoFinder`] | Builds the DSO search path |
//! | [`Dso`] | One loaded module and its entry points |
//! | [`SceneClass`] | Attribute schema of a class |
//! | [`AttributeKey`] | Typed handle to one attribute |
//! | [`SceneObject`] | Object holding one value per attribute |
//! | [`SceneClassRegistry`] | Loads and caches classes by name |
//! | [`ValueContainerDequeue`] | Positional attribute value decoder |

/// Cached attribute value containers.
pub mod cache;
/// Naming conventions, entry point names and loader configuration.
pub mod config;
/// DSO discovery, loading and entry point ABI.
pub mod dso;
/// Error type and result alias.
pub mod error;
/// Class loading and caching.
pub mod registry;
/// Scene classes, attributes, keys and objects.
pub mod scene;

pub use cache::{ValueContainerDequeue, ValueContainerEnqueue};
pub use config::LoaderConfig;
pub use dso::{class_name_from_file_name, Dso, DsoClass, DsoFinder};
pub use error::{Error, Result};
pub use registry::{BuiltinCreateFn, BuiltinDeclareFn, LoadedClass, SceneClassRegistry};
pub use scene::{
    Attribute, AttributeFlags, AttributeKey, AttributeType, AttributeValue, AttributeValueType,
    ClassId, Rgb, Rgba, SceneClass, SceneObject, SceneObjectHandle, SceneObjectInterface,
    SceneObjectRef, Vec2f, Vec3f, Vec4f,
};
