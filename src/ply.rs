// Writes unpacked splats as PLY vertices, ascii or binary little endian

//  Copyright (c) 2025 The splat_ply developers

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_ply::{SerializeError, SerializeOptions};
use thiserror::Error;

use crate::splat::UnpackedSplat;

/// One PLY vertex. Field order is the property order of the file.
#[derive(Serialize, Deserialize, Default, Debug, Clone, Copy, PartialEq)]
pub struct PlyVertex {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub opacity: f32,
    pub rot_0: f32,
    pub rot_1: f32,
    pub rot_2: f32,
    pub rot_3: f32,
    pub f_dc_0: f32,
    pub f_dc_1: f32,
    pub f_dc_2: f32,
    pub scale_0: f32,
    pub scale_1: f32,
    pub scale_2: f32,
}

impl From<&UnpackedSplat> for PlyVertex {
    fn from(splat: &UnpackedSplat) -> Self {
        let [x, y, z] = splat.position;
        let [rot_0, rot_1, rot_2, rot_3] = splat.rotation;
        let [f_dc_0, f_dc_1, f_dc_2] = splat.color;
        let [scale_0, scale_1, scale_2] = splat.scale;
        Self {
            x,
            y,
            z,
            opacity: splat.opacity,
            rot_0,
            rot_1,
            rot_2,
            rot_3,
            f_dc_0,
            f_dc_1,
            f_dc_2,
            scale_0,
            scale_1,
            scale_2,
        }
    }
}

#[derive(Serialize)]
struct Ply {
    vertex: Vec<PlyVertex>,
}

/// Bytes per vertex in a binary body.
pub const VERTEX_STRIDE: usize = size_of::<PlyVertex>();

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlyFormat {
    Ascii,
    #[default]
    BinaryLittleEndian,
}

impl PlyFormat {
    /// Only the exact tag `ascii` selects text output. Everything else is binary.
    pub fn from_selector(tag: &str) -> Self {
        if tag == "ascii" {
            Self::Ascii
        } else {
            Self::BinaryLittleEndian
        }
    }
}

impl From<PlyFormat> for serde_ply::PlyFormat {
    fn from(format: PlyFormat) -> Self {
        match format {
            PlyFormat::Ascii => Self::Ascii,
            PlyFormat::BinaryLittleEndian => Self::BinaryLittleEndian,
        }
    }
}

impl FromStr for PlyFormat {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_selector(s))
    }
}

impl fmt::Display for PlyFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&serde_ply::PlyFormat::from(*self), f)
    }
}

#[derive(Debug, Error)]
pub enum PlyError {
    #[error("No splats found.")]
    NoSplats,

    #[error("An error occurred while writing the file: {0}")]
    Io(#[from] io::Error),

    #[error("An error occurred while writing the file: {0}")]
    Serialize(#[from] SerializeError),
}

/// Writes a complete PLY stream: the ascii header followed by one vertex per splat, in order.
pub fn write_ply<W: Write>(mut writer: W, splats: &[UnpackedSplat], format: PlyFormat) -> Result<(), PlyError> {
    let ply = Ply {
        vertex: splats.iter().map(PlyVertex::from).collect(),
    };
    serde_ply::to_writer(&ply, SerializeOptions::new(format.into()), &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Writes `splats` to `path` and returns how many vertices were written.
///
/// An empty slice is rejected before the path is touched, so an existing file survives.
/// On an IO error the file may be left partially written.
pub fn write_ply_file(splats: &[UnpackedSplat], path: &Path, format: PlyFormat) -> Result<usize, PlyError> {
    if splats.is_empty() {
        return Err(PlyError::NoSplats);
    }
    let file = fs::File::create(path)?;
    write_ply(io::BufWriter::new(file), splats, format)?;
    Ok(splats.len())
}

/// Like [`write_ply_file`], but reports the outcome through the logger. Returns whether
/// the file was written.
pub fn save_ply_file(splats: &[UnpackedSplat], path: &Path, format: PlyFormat) -> bool {
    match write_ply_file(splats, path, format) {
        Ok(count) => {
            log::info!("Successfully wrote {count} splats to '{}'.", path.display());
            true
        }
        Err(PlyError::NoSplats) => {
            log::warn!("{}", PlyError::NoSplats);
            false
        }
        Err(e) => {
            log::error!("{e}");
            false
        }
    }
}
