//! Export command: zip the build output into a timestamped archive.

use adpress_core::archive;
use adpress_core::config::Config;
use anyhow::{Context, Result};
use std::path::Path;

pub fn export_output(config_path: &Path) -> Result<()> {
    let config = Config::from_file(config_path)?;
    let root = config
        .workspace_root()
        .canonicalize()
        .context("Failed to resolve workspace root")?;

    let output_dir = root.join(&config.output);
    let archive_dir = root.join(&config.archive_dir);

    let path = archive::export_archive(&output_dir, &archive_dir)?;
    println!("✓ Archive written: {}", path.display());

    Ok(())
}
