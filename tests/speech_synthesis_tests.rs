use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use vispio::{SpeechClient, SpeechSynthesizer, VispioError};

/// Speech transport double that counts calls and returns fixed bytes.
struct CountingSpeechClient {
    calls: AtomicUsize,
}

impl CountingSpeechClient {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
        })
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpeechClient for CountingSpeechClient {
    async fn fetch_speech(&self, _text: &str, _language: &str) -> vispio::Result<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(b"fake-mp3-bytes".to_vec())
    }
}

#[tokio::test]
async fn empty_text_is_rejected_before_any_network_call() {
    let client = CountingSpeechClient::new();
    let synthesizer = SpeechSynthesizer::new(client.clone());

    let err = synthesizer.synthesize("", "en", 1.0).await.unwrap_err();
    assert!(matches!(err, VispioError::EmptyText));

    let err = synthesizer.synthesize("   \n\t", "en", 1.0).await.unwrap_err();
    assert!(matches!(err, VispioError::EmptyText));

    assert_eq!(client.call_count(), 0, "no transport call may be made");
}

#[tokio::test]
async fn unsupported_language_is_rejected_before_any_network_call() {
    let client = CountingSpeechClient::new();
    let synthesizer = SpeechSynthesizer::new(client.clone());

    let err = synthesizer
        .synthesize("hello", "klingon", 1.0)
        .await
        .unwrap_err();
    assert!(matches!(err, VispioError::UnsupportedLanguage(_)));
    assert_eq!(client.call_count(), 0);
}

#[tokio::test]
async fn synthesize_produces_an_artifact_from_fetched_audio() {
    let client = CountingSpeechClient::new();
    let scratch = tempfile::tempdir().unwrap();
    let synthesizer =
        SpeechSynthesizer::with_scratch_dir(client.clone(), scratch.path().to_path_buf());

    let artifact = synthesizer.synthesize("hello world", "en", 1.0).await.unwrap();

    assert_eq!(client.call_count(), 1);
    assert_eq!(artifact.source_text, "hello world");
    // With ffmpeg absent, or with it choking on the fake bytes, the MP3 falls
    // through unchanged; either way the artifact must be non-empty.
    assert!(!artifact.bytes.is_empty());
}

#[tokio::test]
async fn cleanup_scratch_swallows_missing_directory() {
    let client = CountingSpeechClient::new();
    let synthesizer = SpeechSynthesizer::with_scratch_dir(
        client,
        std::env::temp_dir().join("vispio-test-never-created"),
    );

    // must not panic or error
    synthesizer.cleanup_scratch();
}

#[test]
fn language_table_covers_the_documented_set() {
    let codes: Vec<&str> = SpeechSynthesizer::supported_languages()
        .iter()
        .map(|(code, _)| *code)
        .collect();
    for expected in ["en", "es", "fr", "de", "ja", "zh"] {
        assert!(codes.contains(&expected), "missing language {expected}");
    }
}
