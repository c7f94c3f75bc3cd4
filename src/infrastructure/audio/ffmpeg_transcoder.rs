use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tempfile::NamedTempFile;
use tokio::process::Command;

use crate::application::ports::{AudioTranscoder, TranscodeError};
use crate::domain::{CANONICAL_CHANNELS, CANONICAL_SAMPLE_RATE};

/// Normalizes audio by shelling out to ffmpeg through scratch files.
///
/// Scratch files are `NamedTempFile` guards, so they are removed on every
/// exit path including a cancelled run. The child is killed when its future
/// is dropped.
#[derive(Debug, Clone)]
pub struct FfmpegTranscoder {
    binary: PathBuf,
    scratch_dir: Option<PathBuf>,
}

impl FfmpegTranscoder {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            scratch_dir: None,
        }
    }

    pub fn with_scratch_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.scratch_dir = dir;
        self
    }

    fn scratch_file(&self, prefix: &str, suffix: &str) -> io::Result<NamedTempFile> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(prefix).suffix(suffix);
        match &self.scratch_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
    }
}

#[async_trait]
impl AudioTranscoder for FfmpegTranscoder {
    #[tracing::instrument(skip(self, raw), fields(input_bytes = raw.len()))]
    async fn normalize(&self, raw: &[u8]) -> Result<Vec<u8>, TranscodeError> {
        let input = self
            .scratch_file("input-", "")
            .map_err(TranscodeError::Scratch)?;
        let output = self
            .scratch_file("output-", ".wav")
            .map_err(TranscodeError::Scratch)?;

        tokio::fs::write(input.path(), raw)
            .await
            .map_err(TranscodeError::Scratch)?;

        let result = Command::new(&self.binary)
            .args(["-hide_banner", "-loglevel", "error", "-i"])
            .arg(input.path())
            .args(["-acodec", "pcm_s16le"])
            .args(["-ac", &CANONICAL_CHANNELS.to_string()])
            .args(["-ar", &CANONICAL_SAMPLE_RATE.to_string()])
            .arg("-y")
            .arg(output.path())
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(TranscodeError::Launch)?;

        if !result.status.success() {
            return Err(TranscodeError::Exit {
                code: result.status.code(),
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }

        let wav = tokio::fs::read(output.path())
            .await
            .map_err(TranscodeError::ReadBack)?;
        if wav.is_empty() {
            return Err(TranscodeError::EmptyOutput);
        }

        tracing::debug!(output_bytes = wav.len(), "Audio transcoded to canonical WAV");
        Ok(wav)
    }
}

/// Verifies that `binary` can be launched and reports a version.
pub fn check_ffmpeg_binary(binary: &Path) -> Result<(), TranscodeError> {
    let status = std::process::Command::new(binary)
        .arg("-version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map_err(TranscodeError::Launch)?;

    if status.success() {
        Ok(())
    } else {
        Err(TranscodeError::Exit {
            code: status.code(),
            stderr: String::new(),
        })
    }
}
