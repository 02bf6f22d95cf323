//! Converter command composition.
//!
//! Everything here is pure path and argument logic. A composed
//! [`Invocation`] is a structured program plus argument vector, never a
//! shell string, so paths with spaces or metacharacters need no quoting
//! downstream.
//!
//! Both backends run with the workspace root as working directory. The
//! container backend mounts the root at [`CONTAINER_WORKDIR`] and works
//! from there, so the same root-relative source and output paths are valid
//! in either invocation.

use crate::config::{
    BackendConfig, BuildConfig, ContainerConfig, NativeConfig, OutputFormat, StylesheetMode,
};
use crate::toolchain::Backend;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Mount point of the workspace root inside the converter container.
pub const CONTAINER_WORKDIR: &str = "/documents";

#[derive(Error, Debug)]
pub enum ComposeError {
    #[error("document {} is outside the workspace root {}", .document.display(), .root.display())]
    DocumentOutsideWorkspace { document: PathBuf, root: PathBuf },

    #[error("output directory {} must be relative to the workspace root", .0.display())]
    OutputNotRelative(PathBuf),
}

/// One executable command: program, argument vector, working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub workdir: PathBuf,
}

/// Inputs for composing one converter invocation.
///
/// `document` is absolute and inside `root`; `output` is the root-relative
/// output directory.
#[derive(Debug, Clone)]
pub struct ConvertRequest<'a> {
    pub root: &'a Path,
    pub document: &'a Path,
    pub format: OutputFormat,
    pub build: &'a BuildConfig,
    pub output: &'a Path,
}

/// Compose the converter invocation for the selected backend.
pub fn compose(
    req: &ConvertRequest<'_>,
    backend: Backend,
    config: &BackendConfig,
) -> Result<Invocation, ComposeError> {
    match backend {
        Backend::Native => compose_native(req, &config.native),
        Backend::Container => compose_container(req, &config.container),
    }
}

/// Invocation of the native converter binary, run from the workspace root.
pub fn compose_native(
    req: &ConvertRequest<'_>,
    native: &NativeConfig,
) -> Result<Invocation, ComposeError> {
    Ok(Invocation {
        program: native.program(req.format).to_string(),
        args: converter_args(req, PathStyle::Host)?,
        workdir: req.root.to_path_buf(),
    })
}

/// Invocation of the converter inside the container image, with the
/// workspace root mounted at [`CONTAINER_WORKDIR`].
pub fn compose_container(
    req: &ConvertRequest<'_>,
    container: &ContainerConfig,
) -> Result<Invocation, ComposeError> {
    let mut args = container_preamble(req.root, container);
    args.push(image_entrypoint(req.format).to_string());
    args.extend(converter_args(req, PathStyle::Container)?);

    Ok(Invocation {
        program: container.program.clone(),
        args,
        workdir: req.root.to_path_buf(),
    })
}

/// Auxiliary invocation creating the output directory inside the mounted
/// workspace. Idempotent; callers treat failure as a warning and let the
/// conversion itself surface any real problem.
pub fn compose_container_mkdir(
    root: &Path,
    output: &Path,
    container: &ContainerConfig,
) -> Invocation {
    let mut args = container_preamble(root, container);
    args.push("mkdir".to_string());
    args.push("-p".to_string());
    args.push(path_str(output));

    Invocation {
        program: container.program.clone(),
        args,
        workdir: root.to_path_buf(),
    }
}

/// Path (root-relative) of the document the converter will produce.
pub fn produced_file(output: &Path, document: &Path, format: OutputFormat) -> PathBuf {
    // Only the source extension is replaced; dots inside the stem are part
    // of the name.
    let mut name = document
        .file_stem()
        .unwrap_or_else(|| OsStr::new("out"))
        .to_os_string();
    name.push(".");
    name.push(format.extension());
    output.join(name)
}

/// Ordered stylesheet candidates for a document.
///
/// PDF themes are only meaningful next to the document, matching how the
/// PDF converter resolves `pdf-theme` with no `pdf-themesdir`. HTML follows
/// the configured mode, with `auto` trying the document directory, the
/// workspace root, and the document directory's parent.
pub fn stylesheet_candidates(
    format: OutputFormat,
    mode: StylesheetMode,
    doc_dir: &Path,
    root: &Path,
    name: &str,
) -> Vec<PathBuf> {
    let dirs: Vec<&Path> = match (format, mode) {
        (OutputFormat::Pdf, _) => vec![doc_dir],
        (OutputFormat::Html, StylesheetMode::SameDir) => vec![doc_dir],
        (OutputFormat::Html, StylesheetMode::ProjectRoot) => vec![root],
        (OutputFormat::Html, StylesheetMode::Auto) => {
            let mut dirs = vec![doc_dir, root];
            if let Some(parent) = doc_dir.parent() {
                dirs.push(parent);
            }
            dirs
        }
    };

    let mut candidates = Vec::new();
    for dir in dirs {
        let candidate = dir.join(name);
        if !candidates.contains(&candidate) {
            candidates.push(candidate);
        }
    }
    candidates
}

/// First existing candidate, if any.
pub fn resolve_stylesheet(candidates: &[PathBuf]) -> Option<PathBuf> {
    candidates.iter().find(|p| p.is_file()).cloned()
}

/// Whether converter arguments will run against host paths or the
/// container's mounted view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PathStyle {
    Host,
    Container,
}

/// Shared `docker run` prefix for converter and auxiliary commands.
fn container_preamble(root: &Path, container: &ContainerConfig) -> Vec<String> {
    vec![
        "run".to_string(),
        "--rm".to_string(),
        "-v".to_string(),
        format!("{}:{}", root.display(), CONTAINER_WORKDIR),
        "-w".to_string(),
        CONTAINER_WORKDIR.to_string(),
        container.image.clone(),
    ]
}

/// Converter entrypoint inside the official image. Overrides for the
/// native binaries deliberately do not apply here; a custom native path
/// would not exist in the image.
fn image_entrypoint(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::Pdf => "asciidoctor-pdf",
        OutputFormat::Html => "asciidoctor",
    }
}

fn converter_args(req: &ConvertRequest<'_>, style: PathStyle) -> Result<Vec<String>, ComposeError> {
    let doc_rel = req
        .document
        .strip_prefix(req.root)
        .map_err(|_| ComposeError::DocumentOutsideWorkspace {
            document: req.document.to_path_buf(),
            root: req.root.to_path_buf(),
        })?;
    if req.output.is_absolute() {
        return Err(ComposeError::OutputNotRelative(req.output.to_path_buf()));
    }

    // CJK-aware line breaking; harmless for Latin-only documents.
    let mut args = vec!["-a".to_string(), "scripts=cjk".to_string()];

    if req.build.diagrams {
        args.push("-r".to_string());
        args.push("asciidoctor-diagram".to_string());
    }

    if let Some(name) = &req.build.stylesheet {
        push_stylesheet_args(req, name, style, &mut args);
    }

    args.push("-D".to_string());
    args.push(path_str(req.output));
    args.push(path_str(doc_rel));

    Ok(args)
}

fn push_stylesheet_args(
    req: &ConvertRequest<'_>,
    name: &str,
    style: PathStyle,
    args: &mut Vec<String>,
) {
    let doc_dir = req.document.parent().unwrap_or(req.root);
    let candidates =
        stylesheet_candidates(req.format, req.build.stylesheet_mode, doc_dir, req.root, name);

    let found = match resolve_stylesheet(&candidates) {
        Some(found) => found,
        None => {
            tracing::info!(
                "stylesheet {} not found near {}; using converter default",
                name,
                doc_dir.display()
            );
            return;
        }
    };

    let attr = match req.format {
        OutputFormat::Pdf => "pdf-theme",
        OutputFormat::Html => "stylesheet",
    };

    match found.strip_prefix(req.root) {
        Ok(rel) => {
            args.push("-a".to_string());
            args.push(format!("{}={}", attr, path_str(rel)));
        }
        // The auto walk can land outside the root (document directory's
        // parent). The host binary can still read it; the container cannot.
        Err(_) => match style {
            PathStyle::Host => {
                args.push("-a".to_string());
                args.push(format!("{}={}", attr, found.display()));
            }
            PathStyle::Container => {
                tracing::warn!(
                    "stylesheet {} is outside the workspace and not visible in the container; \
                     using converter default",
                    found.display()
                );
            }
        },
    }
}

fn path_str(path: &Path) -> String {
    path.display().to_string()
}
