//! Rendering-engine collaborator contract and the headless-chromium
//! implementation.
//!
//! Each render spawns one isolated engine process, uses it exclusively and
//! releases it before returning. No pooling: the per-call cold start is an
//! accepted cost at this request volume.

use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to launch rendering engine: {0}")]
    Launch(std::io::Error),
    #[error("rendering engine exited with {status}: {stderr}")]
    Engine {
        status: std::process::ExitStatus,
        stderr: String,
    },
    #[error("render timed out after {0:?}")]
    Timeout(Duration),
    #[error("rendering engine produced no output")]
    EmptyOutput,
    #[error("scratch file error: {0}")]
    Scratch(#[from] std::io::Error),
}

/// Turns compiled markup into PDF bytes. Side effect only; callers own
/// retry decisions.
#[async_trait]
pub trait PdfRenderer: Send + Sync {
    async fn render(&self, html: &str) -> Result<Vec<u8>, RenderError>;
}

/// Renders via a headless chromium binary: the markup goes to a scratch
/// file, chromium prints it to PDF, the bytes come back from disk. The
/// scratch directory lives for the duration of one call.
pub struct ChromiumRenderer {
    executable: PathBuf,
    timeout: Duration,
}

impl ChromiumRenderer {
    pub fn new(executable: PathBuf, timeout: Duration) -> Self {
        Self {
            executable,
            timeout,
        }
    }
}

#[async_trait]
impl PdfRenderer for ChromiumRenderer {
    async fn render(&self, html: &str) -> Result<Vec<u8>, RenderError> {
        let scratch = tempfile::tempdir()?;
        let input = scratch.path().join("report.html");
        let output = scratch.path().join("report.pdf");

        tokio::fs::write(&input, html).await?;

        let mut command = Command::new(&self.executable);
        command
            .arg("--headless")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--no-pdf-header-footer")
            .arg("--run-all-compositor-stages-before-draw")
            .arg(format!("--print-to-pdf={}", output.display()))
            .arg(format!("file://{}", input.display()))
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        debug!(executable = %self.executable.display(), "launching rendering engine");

        let run = command.output();
        let result = tokio::time::timeout(self.timeout, run)
            .await
            .map_err(|_| RenderError::Timeout(self.timeout))?
            .map_err(RenderError::Launch)?;

        if !result.status.success() {
            return Err(RenderError::Engine {
                status: result.status,
                stderr: String::from_utf8_lossy(&result.stderr).into_owned(),
            });
        }

        let bytes = tokio::fs::read(&output).await?;
        if bytes.is_empty() {
            return Err(RenderError::EmptyOutput);
        }
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_binary_surfaces_as_a_render_fault() {
        let renderer = ChromiumRenderer::new(
            PathBuf::from("/nonexistent/chromium-binary"),
            Duration::from_secs(5),
        );
        let err = renderer
            .render("<html></html>")
            .await
            .expect_err("binary does not exist");
        assert!(matches!(err, RenderError::Launch(_)));
    }
}
