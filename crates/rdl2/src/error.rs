// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error type shared by the loader, the attribute registry and the cache codec.

use crate::scene::AttributeType;
use thiserror::Error;

/// Result alias for rdl2 operations.
pub type Result<T> = std::result::Result<T, Error>;

/// rdl2 errors.
///
/// Module and symbol errors make a whole class unavailable. Declaration errors
/// discard the class being declared. Codec errors abort the whole decode.
/// None of them are transient.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    // ========================================================================
    // Module Errors
    // ========================================================================
    /// No DSO file for the class in any search directory.
    #[error("Couldn't find DSO for '{class}' in search path '{search_path}'")]
    ModuleNotFound { class: String, search_path: String },

    /// The DSO exists but the platform loader rejected it.
    #[error("Found RDL2 DSO '{path}', but failed to load it: {reason}")]
    ModuleLoadFailed { path: String, reason: String },

    /// A required entry point is missing (or resolves to a null address).
    #[error("Failed to load symbol '{symbol}' from RDL2 DSO '{path}': {reason}")]
    SymbolNotFound {
        symbol: String,
        path: String,
        reason: String,
    },

    /// The module was already unloaded with `Dso::close`.
    #[error("RDL2 DSO '{path}' has been closed")]
    ModuleClosed { path: String },

    // ========================================================================
    // Declaration Errors
    // ========================================================================
    /// Attribute name declared twice in one class.
    #[error("Attribute '{attribute}' is already declared in SceneClass '{class}'")]
    DuplicateAttributeDeclaration { class: String, attribute: String },

    /// Declaration attempted after the class was finalized.
    #[error("SceneClass '{class}' is finalized, cannot declare '{attribute}'")]
    RegistryFinalized { class: String, attribute: String },

    /// The plugin's declare entry point reported a failure.
    #[error("Declaration of SceneClass '{class}' failed: {reason}")]
    DeclarationFailed { class: String, reason: String },

    /// A class was declared again with a different attribute table.
    #[error("SceneClass '{class}' was declared again with a different attribute table")]
    ConflictingDeclaration { class: String },

    // ========================================================================
    // Access Errors
    // ========================================================================
    /// No attribute (or alias) with that name.
    #[error("SceneClass '{class}' has no attribute '{attribute}'")]
    UnknownAttribute { class: String, attribute: String },

    /// Requested key type (or supplied value) does not match the declaration.
    #[error("Attribute '{attribute}' is declared as {declared}, not {expected}")]
    AttributeTypeMismatch {
        attribute: String,
        expected: AttributeType,
        declared: AttributeType,
    },

    /// Key issued by a different SceneClass than the object's.
    #[error("AttributeKey issued by another SceneClass used on '{target}' (SceneClass '{class}')")]
    KeyRegistryMismatch { class: String, target: String },

    /// No class registered under that name.
    #[error("SceneClass '{0}' not found")]
    ClassNotFound(String),

    /// Objects cannot be constructed from a proxy DSO.
    #[error("SceneClass '{class}' was loaded in proxy mode and cannot create objects")]
    ProxyMode { class: String },

    /// The create entry point returned a null object.
    #[error("DSO for SceneClass '{class}' failed to create object '{object}'")]
    CreateFailed { class: String, object: String },

    // ========================================================================
    // Codec Errors
    // ========================================================================
    /// Buffer shorter than the length header.
    #[error("Could not get ValueContainerDequeue header size info (buffer is {len} bytes)")]
    BufferTooSmallForHeader { len: usize },

    /// Header length disagrees with the supplied buffer length.
    #[error("Encode data length is not match with ValueContainerDequeue header. dataSize:{data_size} != header:{header}")]
    SizeMismatch { data_size: usize, header: u64 },

    /// Read past the end of the buffer.
    #[error("Truncated decode: need {need} bytes at offset {offset}, have {have}")]
    TruncatedDecode {
        need: usize,
        offset: usize,
        have: usize,
    },

    /// Malformed payload (bad bool byte, invalid UTF-8, oversized count).
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl Error {
    /// True for errors that make a class unavailable (module/symbol failures).
    pub fn is_module_error(&self) -> bool {
        matches!(
            self,
            Self::ModuleNotFound { .. }
                | Self::ModuleLoadFailed { .. }
                | Self::SymbolNotFound { .. }
                | Self::ModuleClosed { .. }
        )
    }

    /// True for cache decode failures.
    pub fn is_codec_error(&self) -> bool {
        matches!(
            self,
            Self::BufferTooSmallForHeader { .. }
                | Self::SizeMismatch { .. }
                | Self::TruncatedDecode { .. }
                | Self::InvalidData(_)
        )
    }
}
