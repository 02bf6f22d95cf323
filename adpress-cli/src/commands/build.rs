//! Build command: convert one document via the selected backend.

use crate::prompt::Prompter;
use adpress_core::config::Config;
use adpress_core::convert::{self, ConvertRequest};
use adpress_core::runner;
use adpress_core::source::{self, SourceSelection};
use adpress_core::toolchain::{self, Backend};
use adpress_core::OutputFormat;
use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

/// Convert a document to PDF or HTML.
///
/// The document comes from the explicit argument when given, otherwise from
/// discovery under the workspace root with a prompt on ambiguity. Backend
/// selection may ask once for consent to pull the converter image.
pub async fn build_document(
    prompter: &mut dyn Prompter,
    config_path: &Path,
    file: Option<&Path>,
    format: Option<OutputFormat>,
    open_result: bool,
) -> Result<()> {
    let config = Config::from_file(config_path)?;
    let root = config
        .workspace_root()
        .canonicalize()
        .context("Failed to resolve workspace root")?;

    let format = format.unwrap_or(config.build.format);
    let document = pick_document(prompter, &config, &root, file)?;
    let output_rel = config
        .output_rel(&root)
        .context("configured output directory is outside the workspace root")?;

    tracing::info!("Building {} as {}", document.display(), format.as_str());

    let backend = toolchain::select_backend(&config.backend, format, &mut |image| {
        let question = format!("Converter image {} is not available locally. Pull it now?", image);
        prompter.confirm(&question).unwrap_or(false)
    })
    .await?;

    match backend {
        Backend::Native => {
            std::fs::create_dir_all(root.join(&output_rel))
                .context("Failed to create output directory")?;
        }
        Backend::Container => {
            let mkdir =
                convert::compose_container_mkdir(&root, &output_rel, &config.backend.container);
            runner::run_aux(&mkdir, "output directory setup in container").await;
        }
    }

    let request = ConvertRequest {
        root: &root,
        document: &document,
        format,
        build: &config.build,
        output: &output_rel,
    };
    let invocation = convert::compose(&request, backend, &config.backend)?;

    runner::run(&invocation).await.context("Conversion failed")?;

    let produced = root.join(convert::produced_file(&output_rel, &document, format));
    println!("✓ Built {}", produced.display());

    if open_result || config.build.open {
        if let Err(e) = open::that(&produced) {
            tracing::warn!("Failed to open {}: {}", produced.display(), e);
        }
    }

    Ok(())
}

/// Resolve the document to build: explicit argument, or discovery with the
/// selection rule, prompting only on genuine ambiguity.
fn pick_document(
    prompter: &mut dyn Prompter,
    config: &Config,
    root: &Path,
    file: Option<&Path>,
) -> Result<PathBuf> {
    if let Some(file) = file {
        let document = source::explicit_document(file)?;
        return document
            .canonicalize()
            .with_context(|| format!("Failed to resolve {}", document.display()));
    }

    // Path::join swallows the root for absolute config values, so this is
    // right for both relative and absolute settings.
    let exclude = [root.join(&config.output), root.join(&config.archive_dir)];
    let exclude: Vec<&Path> = exclude.iter().map(PathBuf::as_path).collect();
    let candidates = source::discover_documents(root, &exclude);

    match source::select_document(root, candidates)? {
        SourceSelection::Selected(document) => Ok(document),
        SourceSelection::Choose(candidates) => {
            let items: Vec<String> = candidates
                .iter()
                .map(|p| p.strip_prefix(root).unwrap_or(p).display().to_string())
                .collect();

            match prompter.choose("Several documents found:", &items)? {
                Some(index) => candidates
                    .get(index)
                    .cloned()
                    .context("selection out of range"),
                None => bail!("aborted: no document selected"),
            }
        }
    }
}
