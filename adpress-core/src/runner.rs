//! Subprocess execution with captured output.

use crate::convert::Invocation;
use thiserror::Error;
use tokio::process::Command;

/// Captured streams are logged but clipped to this many bytes each; the
/// diagram plugin in particular can emit megabytes of chatter.
const LOG_CAP: usize = 64 * 1024;

#[derive(Error, Debug)]
pub enum RunError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {code}: {stderr}")]
    Failed {
        program: String,
        code: i32,
        stderr: String,
    },
}

/// Captured output of a successful run.
#[derive(Debug)]
pub struct RunOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Run one invocation to completion, capturing stdout and stderr.
///
/// No timeout is imposed and nothing is retried. A non-zero exit comes back
/// as [`RunError::Failed`] with a short stderr excerpt; the full streams
/// have already been logged by then.
pub async fn run(invocation: &Invocation) -> Result<RunOutput, RunError> {
    tracing::info!(
        "Running {} {} (in {})",
        invocation.program,
        invocation.args.join(" "),
        invocation.workdir.display()
    );

    let output = Command::new(&invocation.program)
        .args(&invocation.args)
        .current_dir(&invocation.workdir)
        .output()
        .await
        .map_err(|e| RunError::Spawn {
            program: invocation.program.clone(),
            source: e,
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if !stdout.trim().is_empty() {
        tracing::info!("{} stdout:\n{}", invocation.program, clip(&stdout));
    }
    if !stderr.trim().is_empty() {
        tracing::info!("{} stderr:\n{}", invocation.program, clip(&stderr));
    }

    if output.status.success() {
        Ok(RunOutput { stdout, stderr })
    } else {
        Err(RunError::Failed {
            program: invocation.program.clone(),
            code: output.status.code().unwrap_or(-1),
            stderr: excerpt(&stderr),
        })
    }
}

/// Run an auxiliary invocation whose failure is only worth a warning. The
/// container-side mkdir of the output directory is idempotent and the
/// conversion right after it will surface any real problem.
pub async fn run_aux(invocation: &Invocation, what: &str) {
    if let Err(e) = run(invocation).await {
        tracing::warn!("{} failed: {}", what, e);
    }
}

/// Keep the tail of a stream, where converter errors end up.
fn clip(text: &str) -> &str {
    if text.len() <= LOG_CAP {
        return text;
    }
    let mut start = text.len() - LOG_CAP;
    while !text.is_char_boundary(start) {
        start += 1;
    }
    &text[start..]
}

/// Short stderr excerpt for the user-facing error message.
fn excerpt(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        return "(no stderr)".to_string();
    }

    let lines: Vec<&str> = trimmed.lines().collect();
    if lines.len() <= 6 {
        trimmed.to_string()
    } else {
        lines[lines.len() - 6..].join("\n")
    }
}
