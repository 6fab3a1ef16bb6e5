//! Overlay encoder abstraction and the ffmpeg implementation.
//!
//! The subprocess argument and filter-graph construction stays isolated
//! behind [`OverlayEncoder`] so the invocation detail is swappable (and
//! mockable in tests).

use crate::Anchor;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// One overlay input for the encoder: a raster file, its anchor corner, and
/// the pixel padding from that corner.
#[derive(Debug, Clone)]
pub struct OverlaySpec {
    pub path: PathBuf,
    pub anchor: Anchor,
    pub padding: u32,
}

/// Narrow interface over the external encoding pass: overlay the given
/// rasters onto the base video, writing a single output file with the
/// original audio stream copied unmodified.
#[async_trait]
pub trait OverlayEncoder: Send + Sync {
    async fn compose_overlays(
        &self,
        base: &Path,
        overlays: &[OverlaySpec],
        output: &Path,
    ) -> Result<()>;
}

/// ffmpeg-backed encoder with a wall-clock bound on each invocation.
pub struct FfmpegEncoder {
    ffmpeg_path: String,
    timeout: Duration,
}

impl FfmpegEncoder {
    pub fn new(ffmpeg_path: String, timeout: Duration) -> Self {
        FfmpegEncoder {
            ffmpeg_path,
            timeout,
        }
    }

    /// Build the overlay filter graph. Each overlay chains onto the result
    /// of the previous one:
    /// `[0:v][1:v]overlay=main_w-overlay_w-20:20[v1];[v1][2:v]overlay=20:20[out]`
    fn filter_graph(overlays: &[OverlaySpec]) -> String {
        let mut clauses = Vec::with_capacity(overlays.len());
        let mut prev = "0:v".to_string();

        for (i, spec) in overlays.iter().enumerate() {
            let label = if i == overlays.len() - 1 {
                "out".to_string()
            } else {
                format!("v{}", i + 1)
            };
            let p = spec.padding;
            let position = match spec.anchor {
                Anchor::TopRight => format!("main_w-overlay_w-{}:{}", p, p),
                Anchor::TopLeft => format!("{}:{}", p, p),
            };
            clauses.push(format!("[{}][{}:v]overlay={}[{}]", prev, i + 1, position, label));
            prev = label;
        }

        clauses.join(";")
    }
}

#[async_trait]
impl OverlayEncoder for FfmpegEncoder {
    async fn compose_overlays(
        &self,
        base: &Path,
        overlays: &[OverlaySpec],
        output: &Path,
    ) -> Result<()> {
        if overlays.is_empty() {
            return Err(anyhow!("No overlays to compose"));
        }

        let mut args: Vec<String> = vec![
            "-y".to_string(),
            "-i".to_string(),
            base.to_string_lossy().to_string(),
        ];
        for spec in overlays {
            args.push("-i".to_string());
            args.push(spec.path.to_string_lossy().to_string());
        }
        args.extend_from_slice(&[
            "-filter_complex".to_string(),
            Self::filter_graph(overlays),
            "-map".to_string(),
            "[out]".to_string(),
            // Copy the audio stream unmodified if the source has one.
            "-map".to_string(),
            "0:a?".to_string(),
            "-c:a".to_string(),
            "copy".to_string(),
            output.to_string_lossy().to_string(),
        ]);

        tracing::debug!(
            ffmpeg = %self.ffmpeg_path,
            base = %base.display(),
            overlay_count = overlays.len(),
            "Invoking overlay encoder"
        );

        let mut child = Command::new(&self.ffmpeg_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .context("Failed to spawn ffmpeg")?;

        // Drain stderr concurrently so a chatty encoder cannot fill the pipe
        // and stall.
        let stderr_pipe = child.stderr.take();
        let stderr_task = tokio::spawn(async move {
            let mut buf = Vec::new();
            if let Some(mut pipe) = stderr_pipe {
                use tokio::io::AsyncReadExt;
                pipe.read_to_end(&mut buf).await.ok();
            }
            buf
        });

        let status = match tokio::time::timeout(self.timeout, child.wait()).await {
            Ok(result) => result.context("Failed to wait for ffmpeg")?,
            Err(_) => {
                child.kill().await.ok();
                return Err(anyhow!(
                    "ffmpeg exceeded the {}s wall-clock bound and was killed",
                    self.timeout.as_secs()
                ));
            }
        };

        if !status.success() {
            let stderr = stderr_task.await.unwrap_or_default();
            return Err(anyhow!(
                "ffmpeg failed: {}",
                String::from_utf8_lossy(&stderr)
            ));
        }

        Ok(())
    }
}
