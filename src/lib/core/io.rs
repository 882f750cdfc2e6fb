//! Tab-delimited fragment stream I/O.
//!
//! Fragment lines travel as headerless TSV, optionally gzip/BGZF compressed
//! based on the output extension. Readers and writers treat `-` (or a
//! missing path) as stdin/stdout. Compressed input is detected from the
//! file extension, so piped stdin must be uncompressed.

use anyhow::Result;
use grep_cli::stdout;
use gzp::{deflate::Gzip, BgzfSyncReader, Compression, ZBuilder};
use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;
use termcolor::ColorChoice;

/// Gzip level used for compressed fragment output.
const COMPRESSION_LEVEL: u32 = 6;

/// Detect whether a path uses a BGZF-compatible extension.
pub fn is_bgzipped<P: AsRef<Path>>(path: P) -> bool {
    matches!(
        path.as_ref().extension().unwrap_or_else(|| OsStr::new("")),
        ext if ext == "gz" || ext == "gzip" || ext == "bgzf"
    )
}

/// Create parent directories for a path when missing.
pub fn make_parent_dirs<P: AsRef<Path>>(path: P) -> Result<()> {
    if let Some(parent) = path.as_ref().parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Open a headerless TSV reader over a fragment stream.
///
/// Field counts differ between plain and peak-annotated fragment lines, so
/// the reader accepts variable record lengths.
pub fn fragment_reader<P: AsRef<Path>>(path: &Option<P>) -> Result<csv::Reader<Box<dyn Read>>> {
    let raw_reader: Box<dyn Read> = match path {
        Some(path) if path.as_ref().to_str() != Some("-") => {
            let reader = BufReader::new(File::open(path)?);
            if is_bgzipped(path) {
                Box::new(BgzfSyncReader::new(reader))
            } else {
                Box::new(reader)
            }
        }
        _ => Box::new(io::stdin()),
    };

    Ok(csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .from_reader(raw_reader))
}

/// Open a headerless TSV writer for fragment lines, targeting a file or
/// stdout with gzip compression when the path extension asks for it.
pub fn fragment_writer<P: AsRef<Path>>(
    path: &Option<P>,
    threads: usize,
) -> Result<csv::Writer<Box<dyn Write>>> {
    let raw_writer: Box<dyn Write> = match path {
        Some(path) if path.as_ref().to_str() != Some("-") => {
            let writer = BufWriter::new(File::create(path)?);
            if is_bgzipped(path) {
                Box::new(
                    ZBuilder::<Gzip, _>::new()
                        .num_threads(threads)
                        .compression_level(Compression::new(COMPRESSION_LEVEL))
                        .from_writer(writer),
                )
            } else {
                Box::new(writer)
            }
        }
        _ => Box::new(stdout(ColorChoice::Never)),
    };

    Ok(csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_writer(raw_writer))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_gzip_family_extensions() {
        assert!(is_bgzipped("fragments.tsv.gz"));
        assert!(is_bgzipped("fragments.bgzf"));
        assert!(!is_bgzipped("fragments.tsv"));
        assert!(!is_bgzipped("fragments"));
    }
}
