// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! SceneClassRegistry: loads, declares and caches scene classes by name.

use crate::config::LoaderConfig;
use crate::dso::Dso;
use crate::error::{Error, Result};
use crate::scene::{SceneClass, SceneObject, SceneObjectHandle, SceneObjectInterface};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Declaration function of a class compiled into the host.
pub type BuiltinDeclareFn = fn(&mut SceneClass) -> Result<SceneObjectInterface>;

/// Construction function of a class compiled into the host.
pub type BuiltinCreateFn = fn(Arc<SceneClass>, &str) -> SceneObject;

enum ClassSource {
    Dso(Arc<Dso>),
    Builtin(BuiltinCreateFn),
}

/// A declared class together with whatever builds its objects.
pub struct LoadedClass {
    scene_class: Arc<SceneClass>,
    source: ClassSource,
}

impl LoadedClass {
    pub fn scene_class(&self) -> &Arc<SceneClass> {
        &self.scene_class
    }

    /// Backing module (None for builtin classes).
    pub fn dso(&self) -> Option<&Arc<Dso>> {
        match &self.source {
            ClassSource::Dso(dso) => Some(dso),
            ClassSource::Builtin(_) => None,
        }
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self.source, ClassSource::Builtin(_))
    }

    /// Build an object of this class.
    pub fn create(&self, name: &str) -> Result<SceneObjectHandle> {
        match &self.source {
            ClassSource::Dso(dso) => dso.create(&self.scene_class, name),
            ClassSource::Builtin(create) => {
                let object = create(Arc::clone(&self.scene_class), name);
                if !Arc::ptr_eq(object.scene_class(), &self.scene_class) {
                    log::warn!(
                        "[LoadedClass::create] builtin '{}' built '{}' of class '{}'",
                        self.scene_class.name(),
                        name,
                        object.class_name()
                    );
                    return Err(Error::CreateFailed {
                        class: self.scene_class.name().to_string(),
                        object: name.to_string(),
                    });
                }
                Ok(SceneObjectHandle::from_builtin(object))
            }
        }
    }
}

impl fmt::Debug for LoadedClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedClass")
            .field("class", &self.scene_class.name())
            .field("dso", &self.dso().map(|d| d.path().to_path_buf()))
            .finish()
    }
}

/// Registry of scene classes.
///
/// Classes come from builtin declare/create pairs or from DSOs found on the
/// configured search path. The first load of a class runs its declaration
/// and caches the finalized [`SceneClass`]; later loads return the cache.
///
/// Loading is serialized by one lock, so concurrent first loads of a class
/// open its DSO once.
///
/// # Repeated declarations
///
/// [`SceneClassRegistry::declare_class`] always runs the declaration again.
/// If the new schema is identical to the cached one the cached class is
/// returned, otherwise the call fails with [`Error::ConflictingDeclaration`]
/// and the cache is kept.
pub struct SceneClassRegistry {
    config: LoaderConfig,
    builtins: HashMap<String, (BuiltinDeclareFn, BuiltinCreateFn)>,
    classes: Mutex<HashMap<String, Arc<LoadedClass>>>,
}

impl SceneClassRegistry {
    pub fn new(config: LoaderConfig) -> Self {
        Self {
            config,
            builtins: HashMap::new(),
            classes: Mutex::new(HashMap::new()),
        }
    }

    /// Registry using [`LoaderConfig::from_env`].
    pub fn from_env() -> Self {
        Self::new(LoaderConfig::from_env())
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Register a class compiled into the host. Builtins shadow DSOs of the
    /// same name.
    pub fn register_builtin(
        &mut self,
        class_name: &str,
        declare: BuiltinDeclareFn,
        create: BuiltinCreateFn,
    ) {
        self.builtins
            .insert(class_name.to_string(), (declare, create));
    }

    /// Builder form of [`SceneClassRegistry::register_builtin`].
    pub fn with_builtin(
        mut self,
        class_name: &str,
        declare: BuiltinDeclareFn,
        create: BuiltinCreateFn,
    ) -> Self {
        self.register_builtin(class_name, declare, create);
        self
    }

    /// Class by name, declared on first use.
    pub fn load_class(&self, class_name: &str) -> Result<Arc<SceneClass>> {
        self.load(class_name).map(|c| Arc::clone(&c.scene_class))
    }

    /// Run the class declaration again and check it against the cache.
    pub fn declare_class(&self, class_name: &str) -> Result<Arc<SceneClass>> {
        let mut classes = self.classes.lock();
        let fresh = self.declare(class_name)?;
        match classes.get(class_name) {
            Some(cached) if cached.scene_class.same_declaration(&fresh.scene_class) => {
                log::debug!(
                    "[SceneClassRegistry::declare_class] '{}' redeclared identically",
                    class_name
                );
                Ok(Arc::clone(&cached.scene_class))
            }
            Some(_) => {
                log::warn!(
                    "[SceneClassRegistry::declare_class] '{}' redeclared with a different schema",
                    class_name
                );
                Err(Error::ConflictingDeclaration {
                    class: class_name.to_string(),
                })
            }
            None => {
                let scene_class = Arc::clone(&fresh.scene_class);
                classes.insert(class_name.to_string(), fresh);
                Ok(scene_class)
            }
        }
    }

    /// Cached class, without loading.
    pub fn get_class(&self, class_name: &str) -> Option<Arc<SceneClass>> {
        self.classes
            .lock()
            .get(class_name)
            .map(|c| Arc::clone(&c.scene_class))
    }

    /// Cached class with its source, without loading.
    pub fn loaded_class(&self, class_name: &str) -> Option<Arc<LoadedClass>> {
        self.classes.lock().get(class_name).cloned()
    }

    /// Names of the loaded classes, sorted.
    pub fn class_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.classes.lock().keys().cloned().collect();
        names.sort();
        names
    }

    /// Create an object of `class_name`, loading the class if needed.
    pub fn create_object(&self, class_name: &str, object_name: &str) -> Result<SceneObjectHandle> {
        self.load(class_name)?.create(object_name)
    }

    fn load(&self, class_name: &str) -> Result<Arc<LoadedClass>> {
        let mut classes = self.classes.lock();
        if let Some(loaded) = classes.get(class_name) {
            return Ok(Arc::clone(loaded));
        }
        let loaded = self.declare(class_name)?;
        classes.insert(class_name.to_string(), Arc::clone(&loaded));
        Ok(loaded)
    }

    fn declare(&self, class_name: &str) -> Result<Arc<LoadedClass>> {
        let mut scene_class = SceneClass::new(class_name);

        let source = if let Some((declare, create)) = self.builtins.get(class_name) {
            let interface = declare(&mut scene_class).map_err(|e| {
                log::warn!(
                    "[SceneClassRegistry::declare] builtin '{}' failed: {}",
                    class_name,
                    e
                );
                e
            })?;
            scene_class.set_interface(interface);
            scene_class.finalize();
            ClassSource::Builtin(*create)
        } else {
            let dso = Dso::open(
                class_name,
                &self.config.search_path,
                self.config.proxy_mode,
            )?;
            dso.declare(&mut scene_class)?;
            ClassSource::Dso(Arc::new(dso))
        };

        log::debug!(
            "[SceneClassRegistry::declare] '{}' ready ({} attributes)",
            class_name,
            scene_class.attribute_count()
        );
        Ok(Arc::new(LoadedClass {
            scene_class: Arc::new(scene_class),
            source,
        }))
    }
}

impl fmt::Debug for SceneClassRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneClassRegistry")
            .field("config", &self.config)
            .field("builtins", &self.builtins.keys().collect::<Vec<_>>())
            .field("classes", &self.class_names())
            .finish()
    }
}
