//! Optional ffmpeg re-encode: MP3 to WAV with tempo adjustment. The toolchain
//! may be absent in constrained deployments; callers fall back to the MP3
//! artifact when anything here fails.

use std::fs;
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

use once_cell::sync::Lazy;

use crate::error::{Result, VispioError};

static FFMPEG_AVAILABLE: Lazy<bool> = Lazy::new(|| {
    let available = Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false);

    if !available {
        tracing::warn!("ffmpeg not found, audio will stay in MP3 format");
    }
    available
});

/// Probed once per process.
pub fn ffmpeg_available() -> bool {
    *FFMPEG_AVAILABLE
}

/// Re-encode MP3 bytes to WAV, applying a tempo multiplier without pitch
/// change. `speed` must already be clamped to the atempo range [0.5, 2.0].
pub fn to_wav_with_speed(scratch_dir: &Path, mp3: &[u8], speed: f32) -> Result<Vec<u8>> {
    fs::create_dir_all(scratch_dir)
        .map_err(|e| VispioError::Other(anyhow::anyhow!("failed to create scratch dir: {e}")))?;

    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| VispioError::Other(anyhow::anyhow!("clock error: {e}")))?
        .as_millis();

    let input = scratch_dir.join(format!("tts_{stamp}.mp3"));
    let output = scratch_dir.join(format!("tts_{stamp}.wav"));

    fs::write(&input, mp3)
        .map_err(|e| VispioError::Other(anyhow::anyhow!("failed to write scratch file: {e}")))?;

    let result = run_ffmpeg(&input, &output, speed);

    // Scratch files are cleaned up opportunistically; deletion failures are
    // swallowed.
    let _ = fs::remove_file(&input);
    let wav = result.and_then(|()| {
        fs::read(&output)
            .map_err(|e| VispioError::Other(anyhow::anyhow!("failed to read converted audio: {e}")))
    });
    let _ = fs::remove_file(&output);

    wav
}

fn run_ffmpeg(input: &Path, output: &Path, speed: f32) -> Result<()> {
    let mut command = Command::new("ffmpeg");
    command.arg("-y").arg("-i").arg(input);

    if (speed - 1.0).abs() > f32::EPSILON {
        command.arg("-filter:a").arg(format!("atempo={speed}"));
    }

    let status = command
        .arg(output)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map_err(|e| VispioError::Other(anyhow::anyhow!("failed to spawn ffmpeg: {e}")))?;

    if !status.success() {
        return Err(VispioError::Other(anyhow::anyhow!(
            "ffmpeg exited with status {status}"
        )));
    }

    Ok(())
}
