// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! DSO entry point ABI.
//!
//! A DSO exports three unmangled functions, named after
//! [`crate::config::SYMBOL_PREFIX`]:
//!
//! | Symbol          | Signature           |
//! |-----------------|---------------------|
//! | `rdl2_declare`  | [`ClassDeclareFn`]  |
//! | `rdl2_create`   | [`ObjectCreateFn`]  |
//! | `rdl2_destroy`  | [`ObjectDestroyFn`] |
//!
//! [`SceneClass`] and [`SceneObject`] cross the boundary as plain Rust types,
//! so host and DSO must be built with the same compiler against the same
//! `rdl2` version. Objects are allocated and freed on the DSO side.
//!
//! # Writing a DSO
//!
//! ```rust,ignore
//! use rdl2::{AttributeFlags, DsoClass, Result, SceneClass, SceneObjectInterface};
//!
//! pub struct SpotLight;
//!
//! impl DsoClass for SpotLight {
//!     fn declare(sc: &mut SceneClass) -> Result<SceneObjectInterface> {
//!         sc.declare_attribute("on", true, AttributeFlags::NONE)?;
//!         sc.declare_attribute("intensity", 1.0f32, AttributeFlags::BLURRABLE)?;
//!         Ok(SceneObjectInterface::LIGHT)
//!     }
//! }
//!
//! rdl2::rdl2_dso_class!(SpotLight);
//! ```

use crate::error::{Error, Result};
use crate::scene::{SceneClass, SceneObject, SceneObjectInterface};
use std::ffi::{c_char, CStr};
use std::panic::{self, AssertUnwindSafe};
use std::ptr;
use std::sync::Arc;

/// `rdl2_declare`: fill the class schema, return the interface tag.
///
/// Failures are recorded on the class (see [`SceneClass::record_declare_error`])
/// and the returned tag is empty.
pub type ClassDeclareFn = unsafe extern "C" fn(*mut SceneClass) -> SceneObjectInterface;

/// `rdl2_create`: build one object. The class pointer comes from
/// `Arc::as_ptr` and stays valid for the call. Returns null on failure.
pub type ObjectCreateFn =
    unsafe extern "C" fn(*const SceneClass, *const c_char) -> *mut SceneObject;

/// `rdl2_destroy`: free an object returned by the same module's `rdl2_create`.
pub type ObjectDestroyFn = unsafe extern "C" fn(*mut SceneObject);

/// Class implemented by a DSO.
///
/// Use [`rdl2_dso_class!`](crate::rdl2_dso_class) to export the entry points.
pub trait DsoClass {
    /// Declare the attributes of the class.
    fn declare(scene_class: &mut SceneClass) -> Result<SceneObjectInterface>;

    /// Build an object of the class. Attributes start at their defaults.
    fn create(scene_class: Arc<SceneClass>, name: &str) -> SceneObject {
        SceneObject::new(scene_class, name)
    }
}

/// Body of the generated `rdl2_declare`.
///
/// # Safety
///
/// `scene_class` is null or points to a live, exclusively borrowed class.
#[doc(hidden)]
pub unsafe fn __declare<C: DsoClass>(scene_class: *mut SceneClass) -> SceneObjectInterface {
    // SAFETY: guaranteed by the caller.
    let Some(sc) = (unsafe { scene_class.as_mut() }) else {
        return SceneObjectInterface::empty();
    };

    match panic::catch_unwind(AssertUnwindSafe(|| C::declare(&mut *sc))) {
        Ok(Ok(interface)) => interface,
        Ok(Err(e)) => {
            sc.record_declare_error(e);
            SceneObjectInterface::empty()
        }
        Err(_) => {
            let class = sc.name().to_string();
            sc.record_declare_error(Error::DeclarationFailed {
                class,
                reason: "declare panicked".to_string(),
            });
            SceneObjectInterface::empty()
        }
    }
}

/// Body of the generated `rdl2_create`.
///
/// # Safety
///
/// `scene_class` is null or was obtained with `Arc::as_ptr` from an
/// `Arc<SceneClass>` that outlives the call. `name` is null or a valid
/// NUL-terminated string.
#[doc(hidden)]
pub unsafe fn __create<C: DsoClass>(
    scene_class: *const SceneClass,
    name: *const c_char,
) -> *mut SceneObject {
    if scene_class.is_null() || name.is_null() {
        return ptr::null_mut();
    }

    // SAFETY: non-null and NUL-terminated per the caller contract.
    let name = match unsafe { CStr::from_ptr(name) }.to_str() {
        Ok(n) => n.to_owned(),
        Err(_) => return ptr::null_mut(),
    };

    // SAFETY: the pointer comes from Arc::as_ptr and the host keeps its Arc
    // alive during the call, so taking one more strong reference is sound.
    let scene_class = unsafe {
        Arc::increment_strong_count(scene_class);
        Arc::from_raw(scene_class)
    };

    match panic::catch_unwind(AssertUnwindSafe(|| C::create(scene_class, &name))) {
        Ok(object) => Box::into_raw(Box::new(object)),
        Err(_) => ptr::null_mut(),
    }
}

/// Body of the generated `rdl2_destroy`.
///
/// # Safety
///
/// `object` is null or was returned by [`__create`] in this module and has
/// not been destroyed yet.
#[doc(hidden)]
pub unsafe fn __destroy(object: *mut SceneObject) {
    if !object.is_null() {
        // SAFETY: allocated with Box::into_raw in __create.
        drop(unsafe { Box::from_raw(object) });
    }
}

/// Export the `rdl2_declare`, `rdl2_create` and `rdl2_destroy` entry points
/// for a [`DsoClass`](crate::DsoClass).
///
/// Invoke once per DSO crate (built as a `cdylib`).
#[macro_export]
macro_rules! rdl2_dso_class {
    ($class:ty) => {
        /// DSO declare entry point.
        ///
        /// # Safety
        ///
        /// Called by the rdl2 host loader only.
        #[no_mangle]
        pub unsafe extern "C" fn rdl2_declare(
            scene_class: *mut $crate::SceneClass,
        ) -> $crate::SceneObjectInterface {
            unsafe { $crate::dso::abi::__declare::<$class>(scene_class) }
        }

        /// DSO create entry point.
        ///
        /// # Safety
        ///
        /// Called by the rdl2 host loader only.
        #[no_mangle]
        pub unsafe extern "C" fn rdl2_create(
            scene_class: *const $crate::SceneClass,
            name: *const ::std::ffi::c_char,
        ) -> *mut $crate::SceneObject {
            unsafe { $crate::dso::abi::__create::<$class>(scene_class, name) }
        }

        /// DSO destroy entry point.
        ///
        /// # Safety
        ///
        /// Called by the rdl2 host loader only.
        #[no_mangle]
        pub unsafe extern "C" fn rdl2_destroy(object: *mut $crate::SceneObject) {
            unsafe { $crate::dso::abi::__destroy(object) }
        }
    };
}
