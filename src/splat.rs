// Reads Gaussian splats stored as flat 32-byte .splat records

//  Copyright (c) 2025 The splat_ply developers

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Size in bytes of one on-disk splat record.
pub const SPLAT_RECORD_SIZE: usize = 32;

// Spread applied to DC color components. Maps the 0..255 byte range onto roughly
// [-1.77, 1.77], the range of a zeroth-order SH coefficient for a unit color.
const COLOR_SCALE: f64 = 1.772196;

// Opacity is clamped before the logit so byte 0 and 255 stay finite.
const MIN_ALPHA: f64 = 0.0001;
const MAX_ALPHA: f64 = 0.9999;

// Stand-in log scale for non-positive (or NaN) scales, where ln is undefined.
const NON_POSITIVE_LOG_SCALE: f64 = -0.000001;

#[derive(Debug, Error)]
pub enum SplatError {
    #[error("File '{}' not found.", .0.display())]
    NotFound(PathBuf),

    #[error("IO error while reading splat file: {0}")]
    Io(#[from] io::Error),
}

fn unpack_scale(s: f32) -> f32 {
    let s = f64::from(s);
    if s > 0.0 {
        s.ln() as f32
    } else {
        NON_POSITIVE_LOG_SCALE as f32
    }
}

fn unpack_color(c: u8) -> f32 {
    ((f64::from(c) / 255.0 - 0.5) * 2.0 * COLOR_SCALE) as f32
}

fn unpack_alpha(a: u8) -> f32 {
    inv_sigmoid((f64::from(a) / 255.0).clamp(MIN_ALPHA, MAX_ALPHA)) as f32
}

fn unpack_rotation(q: u8) -> f32 {
    (f64::from(q) / 128.0 - 1.0) as f32
}

fn inv_sigmoid(x: f64) -> f64 {
    (x / (1.0 - x)).ln()
}

fn f32_le(bytes: &[u8]) -> f32 {
    f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

/// One splat exactly as it sits on disk.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct PackedSplat {
    pub position: [f32; 3],
    pub scale: [f32; 3],
    pub color: [u8; 3],
    pub alpha: u8,
    pub rotation: [u8; 4],
}

/// One splat with every field mapped into the space PLY consumers expect: log scales,
/// logit opacity, SH DC color and a centered quaternion.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct UnpackedSplat {
    pub position: [f32; 3],
    pub opacity: f32,
    pub rotation: [f32; 4],
    pub color: [f32; 3],
    pub scale: [f32; 3],
}

impl PackedSplat {
    pub fn from_bytes(bytes: &[u8; SPLAT_RECORD_SIZE]) -> Self {
        let mut result = Self::default();

        for i in 0..3 {
            result.position[i] = f32_le(&bytes[i * 4..]);
            result.scale[i] = f32_le(&bytes[12 + i * 4..]);
        }
        result.color.copy_from_slice(&bytes[24..27]);
        result.alpha = bytes[27];
        result.rotation.copy_from_slice(&bytes[28..32]);

        result
    }

    pub fn unpack(&self) -> UnpackedSplat {
        UnpackedSplat {
            position: self.position,
            opacity: unpack_alpha(self.alpha),
            rotation: self.rotation.map(unpack_rotation),
            color: self.color.map(unpack_color),
            scale: self.scale.map(unpack_scale),
        }
    }
}

// Fills as much of `buf` as the reader has left. Only a short count means EOF.
fn read_up_to<R: io::Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut total_read = 0;
    while total_read < buf.len() {
        match reader.read(&mut buf[total_read..]) {
            Ok(0) => break,
            Ok(n) => total_read += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(total_read)
}

/// Decodes records from `reader` until it runs dry, appending them to `splats`.
///
/// Records decoded before an error stay in `splats`. Returns the number of trailing
/// bytes that did not make up a whole record and were dropped.
pub fn load_splats_from_reader<R: io::Read>(
    mut reader: R,
    splats: &mut Vec<UnpackedSplat>,
) -> Result<usize, SplatError> {
    let mut record = [0u8; SPLAT_RECORD_SIZE];
    loop {
        let read = read_up_to(&mut reader, &mut record)?;
        if read < SPLAT_RECORD_SIZE {
            if read > 0 {
                log::debug!("Dropping {read} trailing bytes after {} splats", splats.len());
            }
            return Ok(read);
        }
        splats.push(PackedSplat::from_bytes(&record).unpack());
    }
}

fn open_splat_file(path: &Path) -> Result<io::BufReader<fs::File>, SplatError> {
    let file = fs::File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => SplatError::NotFound(path.to_path_buf()),
        _ => SplatError::Io(e),
    })?;
    Ok(io::BufReader::new(file))
}

pub fn load_splats_from_file(path: &Path) -> Result<Vec<UnpackedSplat>, SplatError> {
    let reader = open_splat_file(path)?;
    let mut splats = Vec::new();
    load_splats_from_reader(reader, &mut splats)?;
    Ok(splats)
}

/// Reads every whole record in `path`. Failures are logged rather than returned: a
/// missing file gives an empty list, a read error mid-file gives the splats decoded so far.
pub fn read_splat_file(path: &Path) -> Vec<UnpackedSplat> {
    let reader = match open_splat_file(path) {
        Ok(reader) => reader,
        Err(e @ SplatError::NotFound(_)) => {
            log::error!("{e}");
            return Vec::new();
        }
        Err(e) => {
            log::error!("Unexpected error: {e}");
            return Vec::new();
        }
    };

    let mut splats = Vec::new();
    match load_splats_from_reader(reader, &mut splats) {
        Ok(_) => log::info!("Read {} splats from '{}'", splats.len(), path.display()),
        Err(e) => log::error!("Unexpected error: {e} (kept {} splats)", splats.len()),
    }
    splats
}
