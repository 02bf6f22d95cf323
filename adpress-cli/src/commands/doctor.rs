//! Doctor command: report converter and backend availability.

use adpress_core::config::Config;
use adpress_core::toolchain;
use anyhow::Result;
use std::path::Path;

/// Probe the toolchain read-only and report what a build could use. Never
/// pulls images and never prompts.
pub async fn doctor(config_path: &Path, json: bool) -> Result<()> {
    let config = Config::from_file(config_path)?;
    let backend = &config.backend;
    let report = toolchain::inspect(backend).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "pdf converter ({}): {}",
        backend.native.pdf_program,
        mark(report.native_pdf)
    );
    println!(
        "html converter ({}): {}",
        backend.native.html_program,
        mark(report.native_html)
    );
    println!(
        "container runtime ({}): {}",
        backend.container.program,
        mark(report.container_runtime)
    );
    println!(
        "converter image ({}): {}",
        backend.container.image,
        mark(report.image_present)
    );

    if !report.any_backend() {
        println!();
        println!("No conversion backend found. Install Asciidoctor");
        println!("(https://asciidoctor.org) or Docker (https://docs.docker.com/get-docker/).");
    }

    Ok(())
}

fn mark(ok: bool) -> &'static str {
    if ok {
        "ok"
    } else {
        "missing"
    }
}
