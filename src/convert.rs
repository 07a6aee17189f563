// Command line options and the splat -> ply pipeline

//  Copyright (c) 2025 The splat_ply developers

use std::path::{Path, PathBuf};

use clap::Parser;

use crate::ply::{save_ply_file, PlyError, PlyFormat};
use crate::splat::read_splat_file;

#[derive(Parser, Debug)]
#[command(author, version, about = "Convert a .splat file to a .ply file.")]
pub struct Cli {
    /// Input .splat file
    #[arg(short, long, value_name = "PATH")]
    pub input: Option<PathBuf>,
    /// Output .ply file
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
    /// Format: ascii, binary (binary_little_endian)
    #[arg(short, long, default_value = "binary")]
    pub format: String,
}

impl Cli {
    pub fn ply_format(&self) -> PlyFormat {
        PlyFormat::from_selector(&self.format)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionReport {
    pub decoded: usize,
    pub written: bool,
}

/// Decodes `input` and writes it to `output`. Never fails: every problem is logged and
/// the report says how far the conversion got.
pub fn convert(input: Option<&Path>, output: Option<&Path>, format: PlyFormat) -> ConversionReport {
    let splats = match input {
        Some(path) => read_splat_file(path),
        None => {
            log::error!("Error: no input file given.");
            Vec::new()
        }
    };

    let written = match output {
        Some(path) => save_ply_file(&splats, path, format),
        None if splats.is_empty() => {
            log::warn!("{}", PlyError::NoSplats);
            false
        }
        None => {
            log::error!("An error occurred while writing the file: no output file given.");
            false
        }
    };

    ConversionReport {
        decoded: splats.len(),
        written,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags() {
        let cli = Cli::try_parse_from(["splat_ply", "-i", "in.splat", "-o", "out.ply", "-f", "ascii"]).unwrap();
        assert_eq!(cli.input.as_deref(), Some(Path::new("in.splat")));
        assert_eq!(cli.output.as_deref(), Some(Path::new("out.ply")));
        assert_eq!(cli.ply_format(), PlyFormat::Ascii);

        let cli = Cli::try_parse_from(["splat_ply", "--input", "a", "--output", "b", "--format", "whatever"]).unwrap();
        assert_eq!(cli.ply_format(), PlyFormat::BinaryLittleEndian);
    }

    #[test]
    fn format_defaults_to_binary() {
        let cli = Cli::try_parse_from(["splat_ply"]).unwrap();
        assert!(cli.input.is_none());
        assert!(cli.output.is_none());
        assert_eq!(cli.format, "binary");
        assert_eq!(cli.ply_format(), PlyFormat::BinaryLittleEndian);
    }

    #[test]
    fn missing_paths_do_not_fail() {
        let report = convert(None, None, PlyFormat::Ascii);
        assert_eq!(report, ConversionReport { decoded: 0, written: false });
    }

    #[test]
    fn splats_without_output_are_not_written() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("three.splat");
        let mut record = Vec::new();
        for v in [0.5f32, 1.0, 1.5, 1.0, 1.0, 1.0] {
            record.extend_from_slice(&v.to_le_bytes());
        }
        record.extend_from_slice(&[255, 0, 128, 200, 128, 128, 128, 128]);
        std::fs::write(&input, record.repeat(3)).unwrap();

        let report = convert(Some(&input), None, PlyFormat::Ascii);
        assert_eq!(report, ConversionReport { decoded: 3, written: false });
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
