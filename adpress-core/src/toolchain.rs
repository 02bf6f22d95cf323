//! Conversion backend probing and selection.
//!
//! Nothing here composes converter arguments; this module only answers
//! "which backend can run at all". Probes shell out to `<program> --version`
//! and to the runtime's image listing, and treat any failure to execute as
//! plain unavailability.

use crate::config::{BackendConfig, BackendPreference, OutputFormat};
use serde::Serialize;
use thiserror::Error;
use tokio::process::Command;

/// A conversion backend that can run the converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Native,
    Container,
}

/// Readiness of the containerized backend given probe results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerStatus {
    Ready,
    NeedsPull,
    Unavailable,
}

#[derive(Error, Debug)]
pub enum ToolchainError {
    #[error(
        "neither a native converter nor a container runtime is available; \
         install Asciidoctor (https://asciidoctor.org) or Docker \
         (https://docs.docker.com/get-docker/)"
    )]
    NothingAvailable,
}

/// Probe order induced by the configured preference: the preferred backend
/// first, the other as fallback.
pub fn backend_order(prefer: BackendPreference) -> [Backend; 2] {
    match prefer {
        BackendPreference::Native => [Backend::Native, Backend::Container],
        BackendPreference::Container => [Backend::Container, Backend::Native],
    }
}

pub fn container_status(runtime_ok: bool, image_present: bool) -> ContainerStatus {
    match (runtime_ok, image_present) {
        (false, _) => ContainerStatus::Unavailable,
        (true, true) => ContainerStatus::Ready,
        (true, false) => ContainerStatus::NeedsPull,
    }
}

/// Check a program by running its version command. A spawn failure or a
/// non-zero exit both count as "not available".
pub async fn probe_program(program: &str) -> bool {
    match Command::new(program).arg("--version").output().await {
        Ok(output) => output.status.success(),
        Err(e) => {
            tracing::debug!("probe of {} failed: {}", program, e);
            false
        }
    }
}

/// True when the converter image is already in the local store.
pub async fn image_present(runtime: &str, image: &str) -> bool {
    match Command::new(runtime)
        .args(["image", "ls", "-q", image])
        .output()
        .await
    {
        Ok(output) => {
            output.status.success() && !String::from_utf8_lossy(&output.stdout).trim().is_empty()
        }
        Err(e) => {
            tracing::debug!("image listing via {} failed: {}", runtime, e);
            false
        }
    }
}

/// Pull the converter image, inheriting stdio so the runtime's own progress
/// output reaches the user.
pub async fn pull_image(runtime: &str, image: &str) -> bool {
    tracing::info!("Pulling {} via {}", image, runtime);
    match Command::new(runtime).args(["pull", image]).status().await {
        Ok(status) => status.success(),
        Err(e) => {
            tracing::warn!("Failed to run {} pull: {}", runtime, e);
            false
        }
    }
}

/// Walk the preference-ordered backends and return the first that is ready.
///
/// The consent callback fires at most once, when the runtime is available
/// but the image is missing. Declining the pull falls through to the other
/// backend exactly like a failed probe.
pub async fn select_backend(
    backend: &BackendConfig,
    format: OutputFormat,
    consent: &mut dyn FnMut(&str) -> bool,
) -> Result<Backend, ToolchainError> {
    for candidate in backend_order(backend.prefer) {
        match candidate {
            Backend::Native => {
                let program = backend.native.program(format);
                if probe_program(program).await {
                    tracing::info!("Using native converter: {}", program);
                    return Ok(Backend::Native);
                }
                tracing::info!("Native converter {} not available", program);
            }
            Backend::Container => {
                let runtime = &backend.container.program;
                let image = &backend.container.image;
                let runtime_ok = probe_program(runtime).await;
                let present = if runtime_ok {
                    image_present(runtime, image).await
                } else {
                    false
                };

                match container_status(runtime_ok, present) {
                    ContainerStatus::Ready => {
                        tracing::info!("Using container image {} via {}", image, runtime);
                        return Ok(Backend::Container);
                    }
                    ContainerStatus::NeedsPull => {
                        if consent(image) && pull_image(runtime, image).await {
                            tracing::info!("Using container image {} via {}", image, runtime);
                            return Ok(Backend::Container);
                        }
                        tracing::info!("Container image {} not fetched", image);
                    }
                    ContainerStatus::Unavailable => {
                        tracing::info!("Container runtime {} not available", runtime);
                    }
                }
            }
        }
    }

    Err(ToolchainError::NothingAvailable)
}

/// Read-only availability report for `adpress doctor`. Never pulls and
/// never prompts.
#[derive(Debug, Serialize)]
pub struct ToolchainReport {
    pub native_pdf: bool,
    pub native_html: bool,
    pub container_runtime: bool,
    pub image_present: bool,
}

impl ToolchainReport {
    /// True when at least one backend could carry a build right now.
    pub fn any_backend(&self) -> bool {
        self.native_pdf || self.native_html || (self.container_runtime && self.image_present)
    }
}

pub async fn inspect(backend: &BackendConfig) -> ToolchainReport {
    let container_runtime = probe_program(&backend.container.program).await;
    let image = if container_runtime {
        image_present(&backend.container.program, &backend.container.image).await
    } else {
        false
    };

    ToolchainReport {
        native_pdf: probe_program(&backend.native.pdf_program).await,
        native_html: probe_program(&backend.native.html_program).await,
        container_runtime,
        image_present: image,
    }
}
