// WBR - wbr-memory
// Module: String Lifter
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! String lifting out of linear memory.
//!
//! A string lives in memory as a 4-byte little-endian byte length followed by
//! the UTF-16LE payload. A string pointer addresses the first payload byte;
//! pointer `0` stands for "no string".
//!
//! ```text
//!   pointer - 4        pointer                      pointer + len
//!   |  len: u32 LE  |  u16  u16  u16  ...  u16   |
//! ```
//!
//! Out-of-range headers and payloads are reported as decoding errors instead
//! of being read.

use core::ops::Range;

use wbr_error::{codes, Error, Result};

/// Size of the length prefix preceding every string payload
pub const LENGTH_PREFIX_BYTES: u32 = 4;

/// Largest number of code units decoded per chunk
pub const LIFT_CHUNK_UNITS: usize = 1024;

/// Read the byte length stored in front of `pointer`.
pub fn read_length_prefix(memory: &[u8], pointer: u32) -> Result<u32> {
    let header_start = pointer.checked_sub(LENGTH_PREFIX_BYTES).ok_or_else(|| {
        Error::decoding(
            codes::POINTER_BELOW_HEADER,
            format!("string pointer {pointer} leaves no room for a length prefix"),
        )
    })? as usize;
    let header = memory
        .get(header_start..header_start + LENGTH_PREFIX_BYTES as usize)
        .ok_or_else(|| {
            Error::decoding(
                codes::HEADER_OUT_OF_BOUNDS,
                format!(
                    "length prefix at {header_start} lies outside memory of {} bytes",
                    memory.len()
                ),
            )
        })?;
    Ok(u32::from_le_bytes([header[0], header[1], header[2], header[3]]))
}

/// Byte range of the payload, aligned down to whole code units on both ends.
fn payload_range(memory: &[u8], pointer: u32) -> Result<Range<usize>> {
    let byte_len = read_length_prefix(memory, pointer)?;
    let start = u64::from(pointer / 2) * 2;
    let end = (u64::from(pointer) + u64::from(byte_len)) / 2 * 2;
    if end > memory.len() as u64 {
        return Err(Error::decoding(
            codes::PAYLOAD_OUT_OF_BOUNDS,
            format!(
                "string at {pointer} with {byte_len} bytes ends at {end}, past memory of {} bytes",
                memory.len()
            ),
        ));
    }
    Ok(start as usize..end as usize)
}

fn code_units(payload: &[u8], chunk_units: usize) -> impl Iterator<Item = u16> + '_ {
    payload
        .chunks(chunk_units.max(1) * 2)
        .flat_map(|chunk| chunk.chunks_exact(2).map(|unit| u16::from_le_bytes([unit[0], unit[1]])))
}

/// Lift the string at `pointer` using the default chunk size.
///
/// Returns `Ok(None)` for a null pointer or when no memory is bound.
pub fn lift_string(memory: Option<&[u8]>, pointer: u32) -> Result<Option<String>> {
    lift_string_chunked(memory, pointer, LIFT_CHUNK_UNITS)
}

/// Lift the string at `pointer`, decoding `chunk_units` code units at a time.
///
/// All chunks feed one UTF-16 decoder, so a surrogate pair split across a
/// chunk boundary still decodes to a single scalar. The result does not
/// depend on `chunk_units`. Unpaired surrogates become U+FFFD.
pub fn lift_string_chunked(
    memory: Option<&[u8]>,
    pointer: u32,
    chunk_units: usize,
) -> Result<Option<String>> {
    let Some(memory) = memory else {
        return Ok(None);
    };
    if pointer == 0 {
        return Ok(None);
    }
    let payload = &memory[payload_range(memory, pointer)?];
    let mut text = String::with_capacity(payload.len() / 2);
    text.extend(
        char::decode_utf16(code_units(payload, chunk_units))
            .map(|unit| unit.unwrap_or(char::REPLACEMENT_CHARACTER)),
    );
    Ok(Some(text))
}

/// Lift the raw UTF-16 code units at `pointer`, without any replacement.
pub fn lift_utf16(memory: Option<&[u8]>, pointer: u32) -> Result<Option<Vec<u16>>> {
    let Some(memory) = memory else {
        return Ok(None);
    };
    if pointer == 0 {
        return Ok(None);
    }
    let payload = &memory[payload_range(memory, pointer)?];
    Ok(Some(code_units(payload, LIFT_CHUNK_UNITS).collect()))
}
