// WBR - wbr-error
// Module: WBR Error Types
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Unified error handling for WBR
//!
//! Every failure the bridge can surface is an [`Error`] tagged with an
//! [`ErrorCategory`] and a numeric code from [`crate::codes`].

use std::{borrow::Cow, fmt};

use crate::codes;

/// `Error` categories for WBR operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorCategory {
    /// Module acquisition errors (both compile paths failed)
    Acquisition = 1,
    /// Instantiation errors from unresolved or mismatched imports
    Linkage     = 2,
    /// The module signalled a trap through the `abort` import
    ModuleTrap  = 3,
    /// Malformed string pointers or length prefixes
    Decoding    = 4,
    /// WebAssembly traps raised by the engine
    RuntimeTrap = 5,
    /// Runtime errors (general)
    Runtime     = 6,
    /// Memory errors
    Memory      = 7,
    /// Configuration errors
    Config      = 8,
    /// I/O errors
    Io          = 9,
}

/// WBR `Error` type
///
/// The message is kept verbatim; [`Error::message`] returns it without the
/// category and code decoration that `Display` adds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    /// `Error` category
    pub category: ErrorCategory,
    /// `Error` code
    pub code:     u16,
    message:      Cow<'static, str>,
}

impl Error {
    /// Create a new error
    pub fn new(category: ErrorCategory, code: u16, message: impl Into<Cow<'static, str>>) -> Self {
        Self { category, code, message: message.into() }
    }

    /// Create an error with a static message, usable in `const` contexts
    #[must_use]
    pub const fn new_static(category: ErrorCategory, code: u16, message: &'static str) -> Self {
        Self { category, code, message: Cow::Borrowed(message) }
    }

    /// The undecorated error message
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Create an acquisition error
    pub fn acquisition(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorCategory::Acquisition, codes::ACQUISITION_FAILED, message)
    }

    /// Create a linkage error
    pub fn linkage(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorCategory::Linkage, codes::LINKAGE_ERROR, message)
    }

    /// Create a module trap error.
    ///
    /// The message is the exact text the module reported.
    pub fn module_trap(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorCategory::ModuleTrap, codes::MODULE_ABORT, message)
    }

    /// Create a decoding error
    pub fn decoding(code: u16, message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorCategory::Decoding, code, message)
    }

    /// Create a runtime trap error
    pub fn runtime_trap(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorCategory::RuntimeTrap, codes::RUNTIME_TRAP, message)
    }

    /// Create a runtime error
    pub fn runtime_error(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorCategory::Runtime, codes::RUNTIME_ERROR, message)
    }

    /// Create an export-not-found error
    pub fn export_not_found(name: &str) -> Self {
        Self::new(
            ErrorCategory::Runtime,
            codes::EXPORT_NOT_FOUND,
            format!("export `{name}` not found"),
        )
    }

    /// Create a configuration error
    pub fn config(code: u16, message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorCategory::Config, code, message)
    }

    /// Check if this is an acquisition error
    #[must_use]
    pub fn is_acquisition_error(&self) -> bool {
        self.category == ErrorCategory::Acquisition
    }

    /// Check if this is a linkage error
    #[must_use]
    pub fn is_linkage_error(&self) -> bool {
        self.category == ErrorCategory::Linkage
    }

    /// Check if this is a trap raised by the module through `abort`
    #[must_use]
    pub fn is_module_trap(&self) -> bool {
        self.category == ErrorCategory::ModuleTrap
    }

    /// Check if this is a decoding error
    #[must_use]
    pub fn is_decoding_error(&self) -> bool {
        self.category == ErrorCategory::Decoding
    }

    /// Check if this is a runtime trap
    #[must_use]
    pub fn is_runtime_trap(&self) -> bool {
        self.category == ErrorCategory::RuntimeTrap
    }

    /// Check if this is a runtime error
    #[must_use]
    pub fn is_runtime_error(&self) -> bool {
        self.category == ErrorCategory::Runtime
    }

    /// Check if this is a configuration error
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        self.category == ErrorCategory::Config
    }

    /// Check if the fuel budget ran out
    #[must_use]
    pub fn is_fuel_exhausted(&self) -> bool {
        self.code == codes::FUEL_EXHAUSTED
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}][E{:04X}] {}", self.category, self.code, self.message)
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::new(ErrorCategory::Io, codes::IO_ERROR, error.to_string())
    }
}
