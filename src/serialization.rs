// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Primitive little-endian readers and writers shared by
//! [RoadJointIds](crate::RoadJointIds) and [RoadIndex](crate::RoadIndex).

use std::io;

use crate::DeserializeError;

/// Upper bound on the number of elements reserved up-front from a count read
/// from a stream. Larger arrays still load, just with incremental growth.
pub(crate) const MAX_PREALLOCATION: usize = 64 * 1024;

pub(crate) fn write_u32<W: io::Write>(sink: &mut W, value: u32) -> io::Result<()> {
    sink.write_all(&value.to_le_bytes())
}

/// Reads a single `u32`, reporting a premature end of the stream as
/// [DeserializeError::Truncated], with `remaining` values still expected.
pub(crate) fn read_u32<R: io::Read>(
    src: &mut R,
    what: &'static str,
    remaining: u32,
) -> Result<u32, DeserializeError> {
    let mut buf = [0u8; 4];
    match src.read_exact(&mut buf) {
        Ok(()) => Ok(u32::from_le_bytes(buf)),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Err(DeserializeError::Truncated {
            what,
            expected: remaining,
        }),
        Err(e) => Err(DeserializeError::Io(e)),
    }
}

#[inline]
pub(crate) fn capacity_for(count: u32) -> usize {
    (count as usize).min(MAX_PREALLOCATION)
}
