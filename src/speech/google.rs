use async_trait::async_trait;

use crate::error::{Result, VispioError};

/// Transport seam for the text-to-speech endpoint: text plus a language code
/// in, compressed audio bytes out.
#[async_trait]
pub trait SpeechClient: Send + Sync {
    async fn fetch_speech(&self, text: &str, language: &str) -> Result<Vec<u8>>;
}

const TTS_ENDPOINT: &str = "https://translate.google.com/translate_tts";

/// The endpoint rejects long query strings; text is sent in bounded chunks
/// and the MP3 segments are concatenated.
const MAX_CHUNK_CHARS: usize = 200;

/// Google Translate TTS client.
#[derive(Clone)]
pub struct GoogleTtsClient {
    client: reqwest::Client,
}

impl Default for GoogleTtsClient {
    fn default() -> Self {
        Self::new()
    }
}

impl GoogleTtsClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Split on whitespace into chunks of at most [`MAX_CHUNK_CHARS`]
    /// characters. A single overlong word becomes its own chunk.
    fn chunk_text(text: &str) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut current = String::new();

        for word in text.split_whitespace() {
            if !current.is_empty() && current.chars().count() + word.chars().count() + 1 > MAX_CHUNK_CHARS {
                chunks.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
        if !current.is_empty() {
            chunks.push(current);
        }

        chunks
    }
}

#[async_trait]
impl SpeechClient for GoogleTtsClient {
    async fn fetch_speech(&self, text: &str, language: &str) -> Result<Vec<u8>> {
        let chunks = Self::chunk_text(text);
        let total = chunks.len();
        let mut audio = Vec::new();

        for (idx, chunk) in chunks.iter().enumerate() {
            let textlen = chunk.chars().count().to_string();
            let idx_str = idx.to_string();
            let total_str = total.to_string();

            let response = self
                .client
                .get(TTS_ENDPOINT)
                .query(&[
                    ("ie", "UTF-8"),
                    ("client", "tw-ob"),
                    ("tl", language),
                    ("q", chunk.as_str()),
                    ("textlen", textlen.as_str()),
                    ("idx", idx_str.as_str()),
                    ("total", total_str.as_str()),
                ])
                .send()
                .await
                .map_err(|e| VispioError::Api(format!("TTS request failed: {e}")))?;

            if !response.status().is_success() {
                return Err(VispioError::Api(format!(
                    "TTS request failed with status {}",
                    response.status()
                )));
            }

            let bytes = response
                .bytes()
                .await
                .map_err(|e| VispioError::Api(format!("failed to read TTS response: {e}")))?;
            audio.extend_from_slice(&bytes);
        }

        if audio.is_empty() {
            return Err(VispioError::MalformedResponse(
                "TTS endpoint returned no audio".to_string(),
            ));
        }

        tracing::info!(size = audio.len(), chunks = total, "speech fetched");
        Ok(audio)
    }
}
