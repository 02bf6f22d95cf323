//! Timestamped zip export of the build output.

use chrono::Utc;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("output directory {} does not exist; run `adpress build` first", .0.display())]
    NoOutput(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// Filesystem-safe UTC timestamp at second precision. Colons would be
/// rejected on some filesystems, so the time separators are dashes.
pub fn timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H-%M-%SZ").to_string()
}

/// Archive file name for an output directory at a given instant, e.g.
/// `output-2026-08-23T10-41-07Z.zip`.
pub fn archive_name(output_dir: &Path, stamp: &str) -> String {
    format!("{}-{}.zip", dir_label(output_dir), stamp)
}

/// Zip the output directory into `<archive_dir>/<output>-<timestamp>.zip`
/// and return the archive path.
///
/// Entries sit under a top-level folder named after the output directory,
/// the same shape `zip -r` would produce, so unpacking stays tidy. Every
/// call adds one archive; existing archives are never touched.
pub fn export_archive(output_dir: &Path, archive_dir: &Path) -> Result<PathBuf, ArchiveError> {
    if !output_dir.is_dir() {
        return Err(ArchiveError::NoOutput(output_dir.to_path_buf()));
    }

    std::fs::create_dir_all(archive_dir)?;

    let archive_path = archive_dir.join(archive_name(output_dir, &timestamp()));
    let file = File::create(&archive_path)?;
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let prefix = dir_label(output_dir);

    for entry in WalkDir::new(output_dir).into_iter().filter_map(|e| e.ok()) {
        let rel = match entry.path().strip_prefix(output_dir) {
            Ok(rel) if !rel.as_os_str().is_empty() => rel,
            _ => continue,
        };
        let name = entry_name(prefix, rel);

        if entry.file_type().is_dir() {
            writer.add_directory(name, options)?;
        } else if entry.file_type().is_file() {
            writer.start_file(name, options)?;
            let mut source = File::open(entry.path())?;
            io::copy(&mut source, &mut writer)?;
        }
    }

    writer.finish()?;
    tracing::info!("Wrote archive {}", archive_path.display());

    Ok(archive_path)
}

fn dir_label(dir: &Path) -> &str {
    dir.file_name().and_then(|n| n.to_str()).unwrap_or("output")
}

/// Zip entry name for a path relative to the output directory. Entry names
/// always use forward slashes, whatever separator the platform uses.
fn entry_name(prefix: &str, rel: &Path) -> String {
    let mut name = prefix.to_string();
    for part in rel.components() {
        name.push('/');
        name.push_str(&part.as_os_str().to_string_lossy());
    }
    name
}
