mod google;
mod transcode;

pub use google::{GoogleTtsClient, SpeechClient};
pub use transcode::ffmpeg_available;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

use crate::error::{Result, VispioError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    Mp3,
    Wav,
}

impl AudioFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Wav => "wav",
        }
    }
}

/// Synthesized narration, ready for playback or download. Backing storage is
/// transient; nothing outlives the artifact itself.
#[derive(Clone, Debug)]
pub struct AudioArtifact {
    pub bytes: Vec<u8>,
    pub format: AudioFormat,
    pub source_text: String,
}

impl AudioArtifact {
    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, &self.bytes)
            .map_err(|e| VispioError::Other(anyhow::anyhow!("failed to write audio file: {e}")))
    }
}

const SUPPORTED_LANGUAGES: &[(&str, &str)] = &[
    ("en", "English"),
    ("es", "Spanish"),
    ("fr", "French"),
    ("de", "German"),
    ("it", "Italian"),
    ("pt", "Portuguese"),
    ("ru", "Russian"),
    ("ja", "Japanese"),
    ("ko", "Korean"),
    ("zh", "Chinese"),
    ("ar", "Arabic"),
    ("hi", "Hindi"),
];

const MIN_SPEED: f32 = 0.5;
const MAX_SPEED: f32 = 2.0;

/// Text-to-speech service with optional local re-encoding.
///
/// The upstream call always yields MP3. When ffmpeg is present the artifact is
/// re-encoded to WAV with the requested tempo; when it is absent or the
/// conversion fails, the MP3 is returned unchanged so narration stays
/// available in constrained environments.
pub struct SpeechSynthesizer {
    client: Arc<dyn SpeechClient>,
    scratch_dir: PathBuf,
}

impl SpeechSynthesizer {
    pub fn new(client: Arc<dyn SpeechClient>) -> Self {
        Self {
            client,
            scratch_dir: std::env::temp_dir().join("vispio-audio"),
        }
    }

    pub fn with_scratch_dir(client: Arc<dyn SpeechClient>, scratch_dir: PathBuf) -> Self {
        Self {
            client,
            scratch_dir,
        }
    }

    pub fn google() -> Self {
        Self::new(Arc::new(GoogleTtsClient::new()))
    }

    /// Synthesize narration for `text`.
    ///
    /// Empty or whitespace-only text and unsupported language codes are
    /// rejected before any external call. `speed` is clamped to [0.5, 2.0].
    pub async fn synthesize(
        &self,
        text: &str,
        language: &str,
        speed: f32,
    ) -> Result<AudioArtifact> {
        if text.trim().is_empty() {
            return Err(VispioError::EmptyText);
        }
        if !Self::is_supported_language(language) {
            return Err(VispioError::UnsupportedLanguage(language.to_string()));
        }

        let speed = speed.clamp(MIN_SPEED, MAX_SPEED);
        tracing::info!(
            language,
            speed,
            preview = %text.chars().take(50).collect::<String>(),
            "synthesizing speech"
        );

        let mp3 = self.client.fetch_speech(text, language).await?;

        if ffmpeg_available() {
            match transcode::to_wav_with_speed(&self.scratch_dir, &mp3, speed) {
                Ok(wav) => {
                    return Ok(AudioArtifact {
                        bytes: wav,
                        format: AudioFormat::Wav,
                        source_text: text.to_string(),
                    });
                }
                Err(e) => {
                    tracing::warn!(error = %e, "audio conversion failed, falling back to MP3");
                }
            }
        }

        Ok(AudioArtifact {
            bytes: mp3,
            format: AudioFormat::Mp3,
            source_text: text.to_string(),
        })
    }

    /// Remove leftover scratch files, best-effort.
    pub fn cleanup_scratch(&self) {
        let entries = match fs::read_dir(&self.scratch_dir) {
            Ok(entries) => entries,
            Err(_) => return,
        };

        for entry in entries.flatten() {
            if entry.path().is_file() {
                let _ = fs::remove_file(entry.path());
            }
        }
        tracing::debug!(dir = %self.scratch_dir.display(), "scratch files cleaned up");
    }

    pub fn supported_languages() -> &'static [(&'static str, &'static str)] {
        SUPPORTED_LANGUAGES
    }

    pub fn is_supported_language(code: &str) -> bool {
        SUPPORTED_LANGUAGES.iter().any(|(c, _)| *c == code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_table_lookup() {
        assert!(SpeechSynthesizer::is_supported_language("en"));
        assert!(SpeechSynthesizer::is_supported_language("ja"));
        assert!(!SpeechSynthesizer::is_supported_language("xx"));
        assert!(!SpeechSynthesizer::is_supported_language(""));
    }

    #[test]
    fn test_audio_format_extensions() {
        assert_eq!(AudioFormat::Mp3.extension(), "mp3");
        assert_eq!(AudioFormat::Wav.extension(), "wav");
    }
}
