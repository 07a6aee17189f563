// Converts Gaussian splats stored in the flat 32-byte .splat record format into PLY
// files, with either an ascii or binary little endian body.

//  Copyright (c) 2025 The splat_ply developers

pub mod convert;
pub mod ply;
pub mod splat;

pub use convert::{convert, Cli, ConversionReport};
pub use ply::{save_ply_file, write_ply, write_ply_file, PlyError, PlyFormat, PlyVertex, VERTEX_STRIDE};
pub use splat::{
    load_splats_from_file, load_splats_from_reader, read_splat_file, PackedSplat, SplatError,
    UnpackedSplat, SPLAT_RECORD_SIZE,
};
