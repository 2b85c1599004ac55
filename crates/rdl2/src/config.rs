// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! rdl2 Global Configuration - Single Source of Truth
//!
//! This module centralizes the DSO naming conventions, entry point names and
//! cache format constants. **NEVER hardcode them elsewhere!**
//!
//! # Architecture
//!
//! - **Level 1 (Static)**: Compile-time constants (file suffixes, symbol names, header size)
//! - **Level 2 (Dynamic)**: [`LoaderConfig`] for the resolved search path and proxy mode
//!
//! # Example
//!
//! ```ignore
//! use rdl2::config::*;
//!
//! // Static constants
//! let file = format!("Light{}", DSO_EXTENSION); // "Light.so"
//!
//! // Dynamic config
//! let config = LoaderConfig::from_env().proxy_mode(true);
//! ```

use crate::dso::DsoFinder;
use std::path::PathBuf;

// =======================================================================
// DSO file naming
// =======================================================================

/// Native module suffix appended to the class name.
///
/// DSOs are named `<ClassName>.so` on every platform, independently of the
/// platform's native shared library suffix.
pub const DSO_EXTENSION: &str = ".so";

/// Extra suffix for proxy DSOs (declare-only, used by introspection tools).
pub const PROXY_SUFFIX: &str = ".proxy";

/// Full proxy DSO suffix (`.so.proxy`).
pub const PROXY_EXTENSION: &str = ".so.proxy";

// =======================================================================
// Entry points
// =======================================================================

/// Namespace tag shared by host and plugin for the exported entry points.
pub const SYMBOL_PREFIX: &str = "rdl2";

/// Declaration entry point (NUL-terminated for the loader).
pub const DECLARE_SYMBOL: &[u8] = b"rdl2_declare\0";

/// Instance construction entry point (NUL-terminated for the loader).
pub const CREATE_SYMBOL: &[u8] = b"rdl2_create\0";

/// Instance destruction entry point (NUL-terminated for the loader).
pub const DESTROY_SYMBOL: &[u8] = b"rdl2_destroy\0";

// =======================================================================
// Search path discovery
// =======================================================================

/// Environment variable holding extra DSO directories.
pub const DSO_PATH_ENV: &str = "RDL2_DSO_PATH";

/// Launcher executable used to guess an installation's DSO directory.
pub const LAUNCHER_EXECUTABLE: &str = "raas_render";

/// Directory name, sibling of the launcher's `bin` directory, holding the DSOs.
pub const PLUGIN_DIR_NAME: &str = "rdl2dso";

/// Platform path list separator (`:` on Unix, `;` on Windows).
#[cfg(windows)]
pub const PATH_LIST_SEPARATOR: char = ';';
#[cfg(not(windows))]
pub const PATH_LIST_SEPARATOR: char = ':';

// =======================================================================
// Value container format
// =======================================================================

/// Size of the embedded total-length header (one 64-bit word).
pub const HEADER_SIZE: usize = std::mem::size_of::<u64>();

// =======================================================================
// Runtime configuration
// =======================================================================

/// Loader configuration shared by a [`crate::SceneClassRegistry`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoaderConfig {
    /// Directories probed for DSOs, most specific first.
    pub search_path: Vec<PathBuf>,
    /// Load `.so.proxy` modules (declare only, no object construction).
    pub proxy_mode: bool,
}

impl LoaderConfig {
    /// Create an empty configuration (bare file names go to the platform loader).
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration using the search path resolved from the environment.
    pub fn from_env() -> Self {
        Self {
            search_path: DsoFinder::from_env().search_path(),
            proxy_mode: false,
        }
    }

    /// Replace the search path.
    pub fn search_path<I, P>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.search_path = dirs.into_iter().map(Into::into).collect();
        self
    }

    /// Enable or disable proxy mode.
    pub fn proxy_mode(mut self, enabled: bool) -> Self {
        self.proxy_mode = enabled;
        self
    }

    /// DSO file name for a class under this configuration.
    pub fn dso_file_name(&self, class_name: &str) -> String {
        dso_file_name(class_name, self.proxy_mode)
    }
}

/// DSO file name for `class_name` (`Foo.so`, or `Foo.so.proxy` in proxy mode).
pub fn dso_file_name(class_name: &str, proxy_mode: bool) -> String {
    if proxy_mode {
        format!("{}{}", class_name, PROXY_EXTENSION)
    } else {
        format!("{}{}", class_name, DSO_EXTENSION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proxy_extension_is_consistent() {
        assert_eq!(PROXY_EXTENSION, format!("{}{}", DSO_EXTENSION, PROXY_SUFFIX));
    }

    #[test]
    fn test_symbols_use_prefix() {
        for sym in [DECLARE_SYMBOL, CREATE_SYMBOL, DESTROY_SYMBOL] {
            assert!(sym.starts_with(SYMBOL_PREFIX.as_bytes()));
            assert_eq!(sym.last(), Some(&0));
        }
    }

    #[test]
    fn test_dso_file_name() {
        assert_eq!(dso_file_name("Light", false), "Light.so");
        assert_eq!(dso_file_name("Light", true), "Light.so.proxy");

        let config = LoaderConfig::new().proxy_mode(true);
        assert_eq!(config.dso_file_name("Foo"), "Foo.so.proxy");
    }

    #[test]
    fn test_loader_config_builder() {
        let config = LoaderConfig::new().search_path(["/a", "/b"]);
        assert_eq!(
            config.search_path,
            vec![PathBuf::from("/a"), PathBuf::from("/b")]
        );
        assert!(!config.proxy_mode);
    }
}
