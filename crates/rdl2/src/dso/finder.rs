// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! DSO search path discovery.

use crate::config::{DSO_PATH_ENV, LAUNCHER_EXECUTABLE, PLUGIN_DIR_NAME};
use std::env;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};

/// Builds the ordered list of directories probed for DSOs.
///
/// Order, most specific first:
///
/// 1. explicit paths (command line)
/// 2. the current directory
/// 3. `RDL2_DSO_PATH` entries
/// 4. `<launcher dir>/../rdl2dso`, if `raas_render` is found on `PATH`
///
/// Duplicates keep their first position.
///
/// # Example
///
/// ```rust
/// use rdl2::DsoFinder;
/// use std::path::PathBuf;
///
/// let finder = DsoFinder::new()
///     .with_explicit_path("/opt/dso")
///     .with_dso_path_env(Some("/site/dso"));
///
/// assert_eq!(
///     finder.search_path(),
///     vec![
///         PathBuf::from("/opt/dso"),
///         PathBuf::from("."),
///         PathBuf::from("/site/dso"),
///     ]
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct DsoFinder {
    explicit: Vec<PathBuf>,
    dso_path_env: Option<OsString>,
    path_env: Option<OsString>,
}

impl DsoFinder {
    /// Finder with no environment input.
    pub fn new() -> Self {
        Self::default()
    }

    /// Finder reading `RDL2_DSO_PATH` and `PATH` from the process environment.
    pub fn from_env() -> Self {
        Self {
            explicit: Vec::new(),
            dso_path_env: env::var_os(DSO_PATH_ENV),
            path_env: env::var_os("PATH"),
        }
    }

    /// Add explicit directories. A path list (`a:b`) is split on the
    /// platform separator.
    pub fn with_explicit_path(mut self, paths: impl AsRef<OsStr>) -> Self {
        self.explicit
            .extend(env::split_paths(paths.as_ref()).filter(|p| !p.as_os_str().is_empty()));
        self
    }

    /// Override the `RDL2_DSO_PATH` value.
    pub fn with_dso_path_env<S: Into<OsString>>(mut self, value: Option<S>) -> Self {
        self.dso_path_env = value.map(Into::into);
        self
    }

    /// Override the `PATH` value used to locate the launcher.
    pub fn with_path_env<S: Into<OsString>>(mut self, value: Option<S>) -> Self {
        self.path_env = value.map(Into::into);
        self
    }

    /// Explicit directories, in the order given.
    pub fn explicit_paths(&self) -> &[PathBuf] {
        &self.explicit
    }

    /// Guess the installation DSO directory from the launcher location.
    ///
    /// Returns `<dir>/../rdl2dso` for the first `PATH` directory holding the
    /// launcher, or None.
    pub fn guess_dso_path(&self) -> Option<PathBuf> {
        let path_env = self.path_env.as_ref()?;
        for dir in env::split_paths(path_env) {
            if dir.as_os_str().is_empty() || !contains_launcher(&dir) {
                continue;
            }
            let bin = fs::canonicalize(&dir).unwrap_or(dir);
            let guess = bin.parent().map(|root| root.join(PLUGIN_DIR_NAME));
            log::debug!(
                "[DsoFinder::guess_dso_path] {} found in {}, guess {:?}",
                LAUNCHER_EXECUTABLE,
                bin.display(),
                guess
            );
            return guess;
        }
        None
    }

    /// Ordered, duplicate-free search path.
    pub fn search_path(&self) -> Vec<PathBuf> {
        let mut dirs: Vec<PathBuf> = Vec::new();
        let mut push = |dir: PathBuf| {
            if !dir.as_os_str().is_empty() && !dirs.contains(&dir) {
                dirs.push(dir);
            }
        };

        self.explicit.iter().cloned().for_each(&mut push);
        push(PathBuf::from("."));
        if let Some(value) = &self.dso_path_env {
            env::split_paths(value).for_each(&mut push);
        }
        if let Some(guess) = self.guess_dso_path() {
            push(guess);
        }
        dirs
    }

    /// Search path joined with the platform separator.
    pub fn search_path_string(&self) -> String {
        join_search_path(&self.search_path())
    }
}

/// Join directories with the platform path separator (lossy on non-UTF-8 names).
pub fn join_search_path(dirs: &[PathBuf]) -> String {
    match env::join_paths(dirs) {
        Ok(joined) => joined.to_string_lossy().into_owned(),
        Err(_) => dirs
            .iter()
            .map(|d| d.to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join(&crate::config::PATH_LIST_SEPARATOR.to_string()),
    }
}

/// First `<dir>/<file_name>` that exists, in search order.
pub fn find_file(file_name: &str, search_path: &[PathBuf]) -> Option<PathBuf> {
    search_path
        .iter()
        .map(|dir| dir.join(file_name))
        .find(|candidate| candidate.is_file())
}

fn contains_launcher(dir: &Path) -> bool {
    let Ok(entries) = fs::read_dir(dir) else {
        return false;
    };
    entries.flatten().any(|entry| {
        let path = entry.path();
        path.file_stem() == Some(OsStr::new(LAUNCHER_EXECUTABLE)) && path.is_file()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    #[test]
    fn test_order_explicit_cwd_env() {
        let env_value = env::join_paths(["/b", "/c"]).unwrap();
        let finder = DsoFinder::new()
            .with_explicit_path("/a")
            .with_dso_path_env(Some(env_value));
        assert_eq!(
            finder.search_path(),
            vec![
                PathBuf::from("/a"),
                PathBuf::from("."),
                PathBuf::from("/b"),
                PathBuf::from("/c"),
            ]
        );
    }

    #[test]
    fn test_duplicates_keep_first_position() {
        let env_value = env::join_paths(["/b", "/a", "."]).unwrap();
        let finder = DsoFinder::new()
            .with_explicit_path("/a")
            .with_dso_path_env(Some(env_value));
        assert_eq!(
            finder.search_path(),
            vec![PathBuf::from("/a"), PathBuf::from("."), PathBuf::from("/b")]
        );
    }

    #[test]
    fn test_explicit_path_list_is_split() {
        let list = env::join_paths(["/x", "/y"]).unwrap();
        let finder = DsoFinder::new().with_explicit_path(list);
        assert_eq!(
            finder.explicit_paths(),
            &[PathBuf::from("/x"), PathBuf::from("/y")]
        );
    }

    #[test]
    fn test_missing_launcher_contributes_nothing() {
        let empty = tempfile::tempdir().unwrap();
        let finder = DsoFinder::new().with_path_env(Some(empty.path().as_os_str()));
        assert_eq!(finder.guess_dso_path(), None);
        assert_eq!(finder.search_path(), vec![PathBuf::from(".")]);
        assert_eq!(DsoFinder::new().guess_dso_path(), None);
    }

    #[test]
    fn test_launcher_guess() {
        let root = tempfile::tempdir().unwrap();
        let bin = root.path().join("bin");
        fs::create_dir(&bin).unwrap();
        File::create(bin.join(LAUNCHER_EXECUTABLE)).unwrap();

        let path_env = env::join_paths([Path::new("/nonexistent"), bin.as_path()]).unwrap();
        let finder = DsoFinder::new().with_path_env(Some(path_env));
        let expected = fs::canonicalize(root.path()).unwrap().join(PLUGIN_DIR_NAME);
        assert_eq!(finder.guess_dso_path(), Some(expected.clone()));
        assert_eq!(finder.search_path().last(), Some(&expected));
    }

    #[test]
    fn test_find_file_in_order() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        File::create(second.path().join("Foo.so")).unwrap();
        let dirs = vec![first.path().to_path_buf(), second.path().to_path_buf()];

        assert_eq!(find_file("Foo.so", &dirs), Some(second.path().join("Foo.so")));

        File::create(first.path().join("Foo.so")).unwrap();
        assert_eq!(find_file("Foo.so", &dirs), Some(first.path().join("Foo.so")));
        assert_eq!(find_file("Bar.so", &dirs), None);
    }

    #[test]
    fn test_search_path_string_round_trips() {
        let finder = DsoFinder::new().with_explicit_path("/opt/dso");
        let joined = finder.search_path_string();
        let split: Vec<PathBuf> = env::split_paths(&joined).collect();
        assert_eq!(split, finder.search_path());
    }
}
