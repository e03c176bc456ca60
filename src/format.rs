// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Reading and writing of whole, optionally compressed, serialized [RoadIndex] streams.

use std::io::{self, BufRead, Write};

use crate::{DeserializeError, RoadIndex};

/// Compression of a serialized [RoadIndex] stream.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    /// Unknown compression - guess based on the first bytes of the stream.
    /// When writing, equivalent to [Compression::Raw].
    ///
    /// Note that uncompressed data starting with a road count of 35615 (`1f 8b 00 00`)
    /// will be misdetected as gzip.
    #[default]
    Unknown,

    /// Force uncompressed data.
    Raw,

    /// Force [gzip](https://en.wikipedia.org/wiki/Gzip) compression.
    Gzip,

    /// Force [bzip2](https://en.wikipedia.org/wiki/Bzip2) compression.
    Bzip2,
}

/// Additional controls for reading and writing serialized [RoadIndex] streams.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    pub compression: Compression,
}

/// Reads a serialized [RoadIndex] from a stream, as per the provided [Options].
///
/// The provided stream will be automatically wrapped in a buffered reader.
pub fn read_road_index<R: io::Read>(
    options: &Options,
    reader: R,
) -> Result<RoadIndex, DeserializeError> {
    let mut reader = io::BufReader::new(reader);
    let compression = match options.compression {
        Compression::Unknown => {
            let detected = detect_compression(&mut reader)?;
            log::debug!("detected {detected:?} road index stream");
            detected
        }
        other => other,
    };

    match compression {
        Compression::Unknown | Compression::Raw => deserialize(reader),

        Compression::Gzip => {
            let d = flate2::read::MultiGzDecoder::new(reader);
            deserialize(io::BufReader::new(d))
        }

        Compression::Bzip2 => {
            let d = bzip2::read::MultiBzDecoder::new(reader);
            deserialize(io::BufReader::new(d))
        }
    }
}

/// Writes a serialized [RoadIndex] to a stream, as per the provided [Options].
pub fn write_road_index<W: io::Write>(
    road_index: &RoadIndex,
    options: &Options,
    writer: W,
) -> io::Result<()> {
    match options.compression {
        Compression::Unknown | Compression::Raw => {
            let mut w = io::BufWriter::new(writer);
            road_index.serialize(&mut w)?;
            w.flush()
        }

        Compression::Gzip => {
            let mut e = flate2::write::GzEncoder::new(writer, flate2::Compression::default());
            road_index.serialize(&mut e)?;
            e.finish()?.flush()
        }

        Compression::Bzip2 => {
            let mut e = bzip2::write::BzEncoder::new(writer, bzip2::Compression::default());
            road_index.serialize(&mut e)?;
            e.finish()?.flush()
        }
    }
}

fn detect_compression<R: BufRead>(reader: &mut R) -> io::Result<Compression> {
    let head = reader.fill_buf()?;
    if head.starts_with(&[0x1F, 0x8B]) {
        Ok(Compression::Gzip)
    } else if head.starts_with(b"BZh") {
        Ok(Compression::Bzip2)
    } else {
        Ok(Compression::Raw)
    }
}

fn deserialize<R: io::Read>(mut reader: R) -> Result<RoadIndex, DeserializeError> {
    let mut road_index = RoadIndex::default();
    road_index.deserialize(&mut reader)?;
    Ok(road_index)
}
