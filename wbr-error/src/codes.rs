// WBR - wbr-error
// Module: WBR Error Codes
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Error codes for WBR

// Acquisition error codes (1000-1999)
/// Both acquisition paths failed
pub const ACQUISITION_FAILED: u16 = 1000;
/// The streaming path compiled the artifact and rejected it
pub const COMPILE_FAILED: u16 = 1001;
/// The locator names a transport this build cannot serve
pub const UNSUPPORTED_LOCATOR: u16 = 1002;
/// Reading the artifact failed
pub const ARTIFACT_READ_ERROR: u16 = 1003;

// Linkage error codes (2000-2999)
/// Instantiation failed while resolving imports
pub const LINKAGE_ERROR: u16 = 2000;
/// An import binding could not be defined
pub const IMPORT_DEFINITION_ERROR: u16 = 2001;
/// An ambient binding name is not known
pub const UNKNOWN_AMBIENT_BINDING: u16 = 2002;

// Trap error codes (3000-3999)
/// The module called the `abort` import
pub const MODULE_ABORT: u16 = 3000;
/// A WebAssembly trap was raised during execution
pub const RUNTIME_TRAP: u16 = 3001;
/// The fuel budget was exhausted
pub const FUEL_EXHAUSTED: u16 = 3002;

// Decoding error codes (4000-4999)
/// String pointer below the length header
pub const POINTER_BELOW_HEADER: u16 = 4000;
/// Length header lies outside the live memory
pub const HEADER_OUT_OF_BOUNDS: u16 = 4001;
/// Payload extends past the live memory
pub const PAYLOAD_OUT_OF_BOUNDS: u16 = 4002;

// Runtime error codes (5000-5999)
/// General runtime error
pub const RUNTIME_ERROR: u16 = 5000;
/// Export not found
pub const EXPORT_NOT_FOUND: u16 = 5001;
/// Export has an unexpected kind or signature
pub const EXPORT_TYPE_MISMATCH: u16 = 5002;
/// Argument does not match a parameter type
pub const INVALID_ARGUMENT: u16 = 5003;
/// Memory could not be allocated
pub const MEMORY_ALLOCATION_ERROR: u16 = 5004;
/// Engine could not be created
pub const ENGINE_ERROR: u16 = 5005;

// Configuration error codes (6000-6999)
/// Configuration could not be parsed
pub const CONFIG_PARSE_ERROR: u16 = 6000;
/// Configuration value is out of range
pub const CONFIG_INVALID_VALUE: u16 = 6001;

// System error codes (7000-7999)
/// I/O error
pub const IO_ERROR: u16 = 7000;
