// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dso: one loaded plugin module and its three entry points.

use super::abi::{ClassDeclareFn, ObjectCreateFn, ObjectDestroyFn};
use super::finder::{find_file, join_search_path};
use crate::config::{
    dso_file_name, CREATE_SYMBOL, DECLARE_SYMBOL, DESTROY_SYMBOL, DSO_EXTENSION,
    PROXY_EXTENSION,
};
use crate::error::{Error, Result};
use crate::scene::{SceneClass, SceneObjectHandle, SceneObjectInterface};
use libloading::Library;
use std::ffi::CString;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::ptr::NonNull;
use std::sync::{Arc, OnceLock};

/// A loaded DSO implementing one scene object class.
///
/// Entry points are resolved lazily and memoized, failures included: a
/// missing symbol is reported the same way on every call without asking the
/// loader again. The module is unloaded by [`Dso::close`] or on drop.
pub struct Dso {
    class_name: String,
    path: PathBuf,
    proxy_mode: bool,
    library: Option<Library>,
    declare: OnceLock<Result<ClassDeclareFn>>,
    create: OnceLock<Result<ObjectCreateFn>>,
    destroy: OnceLock<Result<ObjectDestroyFn>>,
}

impl Dso {
    /// Locate and load the DSO for `class_name`.
    ///
    /// With an empty `search_path` the bare file name is handed to the
    /// platform loader (which applies its own search rules).
    pub fn open(class_name: &str, search_path: &[PathBuf], proxy_mode: bool) -> Result<Self> {
        let file_name = dso_file_name(class_name, proxy_mode);
        let path = if search_path.is_empty() {
            PathBuf::from(&file_name)
        } else {
            find_file(&file_name, search_path).ok_or_else(|| Error::ModuleNotFound {
                class: class_name.to_string(),
                search_path: join_search_path(search_path),
            })?
        };

        // SAFETY: loading runs the module's initializers. Modules on the DSO
        // search path are trusted by the host.
        let library = unsafe { Library::new(&path) }.map_err(|e| Error::ModuleLoadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        log::debug!(
            "[Dso::open] loaded '{}' from {}{}",
            class_name,
            path.display(),
            if proxy_mode { " (proxy)" } else { "" }
        );

        Ok(Self {
            class_name: class_name.to_string(),
            path,
            proxy_mode,
            library: Some(library),
            declare: OnceLock::new(),
            create: OnceLock::new(),
            destroy: OnceLock::new(),
        })
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Resolved module path (a bare file name when opened without a search path).
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn proxy_mode(&self) -> bool {
        self.proxy_mode
    }

    /// True until [`Dso::close`].
    pub fn is_open(&self) -> bool {
        self.library.is_some()
    }

    /// `rdl2_declare`, resolved once.
    pub fn declare_fn(&self) -> Result<ClassDeclareFn> {
        self.declare
            .get_or_init(|| self.lookup::<ClassDeclareFn>(DECLARE_SYMBOL))
            .clone()
    }

    /// `rdl2_create`, resolved once.
    pub fn create_fn(&self) -> Result<ObjectCreateFn> {
        self.create
            .get_or_init(|| self.lookup::<ObjectCreateFn>(CREATE_SYMBOL))
            .clone()
    }

    /// `rdl2_destroy`, resolved once.
    pub fn destroy_fn(&self) -> Result<ObjectDestroyFn> {
        self.destroy
            .get_or_init(|| self.lookup::<ObjectDestroyFn>(DESTROY_SYMBOL))
            .clone()
    }

    /// Run the declare entry point on an empty class, then finalize it.
    ///
    /// An error raised by the module's declaration discards the whole class.
    pub fn declare(&self, scene_class: &mut SceneClass) -> Result<SceneObjectInterface> {
        let declare = self.declare_fn()?;

        // SAFETY: the function was resolved from this module, which stays
        // loaded for the call, and the class is exclusively borrowed.
        let interface = unsafe { declare(scene_class as *mut SceneClass) };

        if let Some(err) = scene_class.take_declare_error() {
            log::warn!(
                "[Dso::declare] '{}' declaration failed: {}",
                self.class_name,
                err
            );
            return Err(err);
        }

        scene_class.set_interface(interface);
        scene_class.finalize();
        log::debug!(
            "[Dso::declare] '{}' declared {} attributes ({})",
            self.class_name,
            scene_class.attribute_count(),
            interface
        );
        Ok(interface)
    }

    /// Build an object through the module's create entry point.
    ///
    /// The handle keeps this module loaded and returns the object to the
    /// module's destroy entry point when dropped.
    pub fn create(
        self: &Arc<Self>,
        scene_class: &Arc<SceneClass>,
        name: &str,
    ) -> Result<SceneObjectHandle> {
        if self.proxy_mode {
            return Err(Error::ProxyMode {
                class: self.class_name.clone(),
            });
        }
        let create = self.create_fn()?;
        let destroy = self.destroy_fn()?;

        let c_name = CString::new(name).map_err(|_| {
            Error::InvalidData(format!("object name {:?} contains a NUL byte", name))
        })?;

        // SAFETY: the class pointer comes from a live Arc held for the whole
        // call and the name is NUL-terminated.
        let raw = unsafe { create(Arc::as_ptr(scene_class), c_name.as_ptr()) };
        let object = NonNull::new(raw).ok_or_else(|| Error::CreateFailed {
            class: self.class_name.clone(),
            object: name.to_string(),
        })?;

        // SAFETY: the object was allocated by this module's create entry point
        // and `destroy` comes from the same module.
        let handle = unsafe { SceneObjectHandle::from_dso(object, Arc::clone(self), destroy) };
        if !Arc::ptr_eq(handle.scene_class(), scene_class) {
            return Err(Error::CreateFailed {
                class: self.class_name.clone(),
                object: name.to_string(),
            });
        }

        log::trace!("[Dso::create] {}('{}')", self.class_name, name);
        Ok(handle)
    }

    /// Unload the module. Safe to call more than once.
    ///
    /// Resolution after close fails with [`Error::ModuleClosed`].
    pub fn close(&mut self) {
        self.declare.take();
        self.create.take();
        self.destroy.take();
        if let Some(library) = self.library.take() {
            if let Err(e) = library.close() {
                log::warn!("[Dso::close] unloading {} failed: {}", self.path.display(), e);
            } else {
                log::debug!("[Dso::close] unloaded {}", self.path.display());
            }
        }
    }

    /// Probe a candidate module file. Never fails and never panics.
    ///
    /// The class name comes from the file name, the module is opened from its
    /// own directory and its entry points are resolved (only `rdl2_declare`
    /// in proxy mode). The probing instance is unloaded before returning.
    pub fn is_valid_dso(path: impl AsRef<Path>, proxy_mode: bool) -> bool {
        let path = path.as_ref();
        let probe = panic::catch_unwind(AssertUnwindSafe(|| -> Result<()> {
            let suffix = if proxy_mode { PROXY_EXTENSION } else { DSO_EXTENSION };
            let class_name = strip_dso_suffix(path, suffix).ok_or_else(|| {
                Error::InvalidData(format!("'{}' is not named *{}", path.display(), suffix))
            })?;
            let dir = match path.parent() {
                Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
                _ => PathBuf::from("."),
            };

            let dso = Dso::open(&class_name, &[dir], proxy_mode)?;
            dso.declare_fn()?;
            if !proxy_mode {
                dso.create_fn()?;
                dso.destroy_fn()?;
            }
            Ok(())
        }));

        match probe {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                log::debug!("[Dso::is_valid_dso] {} rejected: {}", path.display(), e);
                false
            }
            Err(_) => {
                log::debug!("[Dso::is_valid_dso] {} probe panicked", path.display());
                false
            }
        }
    }

    fn lookup<F: Copy>(&self, symbol: &[u8]) -> Result<F> {
        let library = self.library.as_ref().ok_or_else(|| Error::ModuleClosed {
            path: self.path.display().to_string(),
        })?;
        let symbol_name = symbol_display(symbol);

        // SAFETY: F is the entry point signature documented in `abi`. The
        // Option niche maps a null symbol address to None.
        let resolved = unsafe { library.get::<Option<F>>(symbol) }.map_err(|e| {
            Error::SymbolNotFound {
                symbol: symbol_name.clone(),
                path: self.path.display().to_string(),
                reason: e.to_string(),
            }
        })?;

        match *resolved {
            Some(f) => Ok(f),
            None => Err(Error::SymbolNotFound {
                symbol: symbol_name,
                path: self.path.display().to_string(),
                reason: "symbol resolves to a null address".to_string(),
            }),
        }
    }
}

impl Drop for Dso {
    fn drop(&mut self) {
        self.close();
    }
}

impl fmt::Debug for Dso {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dso")
            .field("class_name", &self.class_name)
            .field("path", &self.path)
            .field("proxy_mode", &self.proxy_mode)
            .field("open", &self.is_open())
            .finish()
    }
}

/// Class name encoded in a DSO file name.
///
/// `Foo.so` and `Foo.so.proxy` both give `Foo`; the suffix match ignores
/// case. Anything else gives an empty string.
///
/// ```rust
/// use rdl2::class_name_from_file_name;
///
/// assert_eq!(class_name_from_file_name("/dso/Foo.so"), "Foo");
/// assert_eq!(class_name_from_file_name("Foo.SO.Proxy"), "Foo");
/// assert_eq!(class_name_from_file_name("Foo.txt"), "");
/// ```
pub fn class_name_from_file_name(path: impl AsRef<Path>) -> String {
    let path = path.as_ref();
    strip_dso_suffix(path, PROXY_EXTENSION)
        .or_else(|| strip_dso_suffix(path, DSO_EXTENSION))
        .unwrap_or_default()
}

fn strip_dso_suffix(path: &Path, suffix: &str) -> Option<String> {
    let file_name = path.file_name()?.to_str()?;
    let split = file_name.len().checked_sub(suffix.len())?;
    if split == 0 || !file_name.is_char_boundary(split) {
        return None;
    }
    let (stem, tail) = file_name.split_at(split);
    tail.eq_ignore_ascii_case(suffix).then(|| stem.to_string())
}

fn symbol_display(symbol: &[u8]) -> String {
    let trimmed = symbol.strip_suffix(b"\0").unwrap_or(symbol);
    String::from_utf8_lossy(trimmed).into_owned()
}
