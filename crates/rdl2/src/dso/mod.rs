// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! DSO discovery, loading and the entry point ABI.

pub mod abi;
mod finder;
mod loader;

pub use abi::{ClassDeclareFn, DsoClass, ObjectCreateFn, ObjectDestroyFn};
pub use finder::{find_file, join_search_path, DsoFinder};
pub use loader::{class_name_from_file_name, Dso};
