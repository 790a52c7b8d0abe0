use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use vispio::gemini::prompts;
use vispio::{
    AnalysisClient, AnalysisKind, ChatHistory, ChatMessage, ChatRouter, ChatSession,
    DynVisionClient, GenerateRequest, GenerateResponse, GenerationParams, VisionClient,
};

/// Transport double that records every request and replies with a canned text.
#[derive(Clone)]
struct RecordingVisionClient {
    requests: Arc<Mutex<Vec<GenerateRequest>>>,
    reply: Option<String>,
}

impl RecordingVisionClient {
    fn replying(text: &str) -> Self {
        Self {
            requests: Arc::new(Mutex::new(Vec::new())),
            reply: Some(text.to_string()),
        }
    }

    fn empty_replies() -> Self {
        Self {
            requests: Arc::new(Mutex::new(Vec::new())),
            reply: None,
        }
    }

    fn recorded(&self) -> Vec<GenerateRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl VisionClient for RecordingVisionClient {
    async fn generate(&self, request: GenerateRequest) -> vispio::Result<GenerateResponse> {
        self.requests.lock().push(request);
        Ok(GenerateResponse {
            text: self.reply.clone(),
            metadata: None,
        })
    }

    fn clone_dyn(&self) -> DynVisionClient {
        Arc::new(self.clone())
    }
}

#[tokio::test]
async fn each_caption_style_sends_a_distinct_template() {
    let transport = RecordingVisionClient::replying("a caption");
    let client = AnalysisClient::new(Arc::new(transport.clone()));

    for kind in AnalysisKind::CAPTION_STYLES {
        client
            .analyze_with_defaults(&[0u8; 16], kind)
            .await
            .expect("analysis should succeed against the double");
    }

    let prompts_sent: Vec<String> = transport
        .recorded()
        .iter()
        .map(|r| r.prompt.clone())
        .collect();
    assert_eq!(prompts_sent.len(), AnalysisKind::CAPTION_STYLES.len());

    let mut unique = prompts_sent.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(
        unique.len(),
        prompts_sent.len(),
        "every caption style must use its own instruction template"
    );
}

#[tokio::test]
async fn empty_upstream_response_degrades_to_placeholder() {
    let transport = RecordingVisionClient::empty_replies();
    let client = AnalysisClient::new(Arc::new(transport));

    let result = client
        .analyze_with_defaults(&[0u8; 16], AnalysisKind::Descriptive)
        .await
        .expect("degraded result is still Ok");

    assert!(!result.success);
    assert!(
        !result.text.is_empty(),
        "placeholder text must be human readable"
    );
}

#[tokio::test]
async fn routes_location_over_product_when_both_match() {
    let transport = RecordingVisionClient::replying("somewhere in Lisbon");
    let router = ChatRouter::new(Arc::new(transport.clone()));

    // "where" (location) and "buy" (product) both match; location is checked
    // first in the rule table.
    router
        .route_and_respond("where can I buy this", Some(&[1u8, 2, 3]), &ChatHistory::new())
        .await
        .unwrap();

    let recorded = transport.recorded();
    assert_eq!(recorded.len(), 1);
    assert!(
        recorded[0].prompt.contains("location information"),
        "location template should win the tie, got: {}",
        recorded[0].prompt
    );
    assert!(!recorded[0].prompt.contains("product information"));
}

#[tokio::test]
async fn product_questions_use_the_product_template() {
    let transport = RecordingVisionClient::replying("a well-known brand");
    let router = ChatRouter::new(Arc::new(transport.clone()));

    router
        .route_and_respond("what brand is shown", Some(&[1u8]), &ChatHistory::new())
        .await
        .unwrap();

    let recorded = transport.recorded();
    assert!(recorded[0].prompt.contains("product information"));
    assert!(recorded[0].prompt.contains("what brand is shown"));
}

#[tokio::test]
async fn chat_context_never_exceeds_the_window() {
    let transport = RecordingVisionClient::replying("ok");
    let router = ChatRouter::new(Arc::new(transport.clone()));

    let mut history = ChatHistory::new();
    for i in 0..15 {
        history.push(ChatMessage::user(format!("turn-{i:02}")));
    }

    router
        .route_and_respond("tell me more", Some(&[1u8]), &history)
        .await
        .unwrap();

    let prompt = transport.recorded()[0].prompt.clone();
    for i in 0..5 {
        assert!(
            !prompt.contains(&format!("turn-{i:02}")),
            "turn-{i:02} is outside the window and must not be forwarded"
        );
    }
    for i in 5..15 {
        assert!(prompt.contains(&format!("turn-{i:02}")));
    }
}

#[tokio::test]
async fn in_flight_message_is_excluded_then_appended() {
    let transport = RecordingVisionClient::replying("an answer");
    let mut session = ChatSession::new(Arc::new(transport.clone()));
    session.attach_image(vec![9u8; 8]);

    session.send("is this a landmark").await.unwrap();

    let prompt = transport.recorded()[0].prompt.clone();
    assert_eq!(
        prompt.matches("is this a landmark").count(),
        1,
        "the in-flight question must appear exactly once, never doubled via context"
    );
    assert!(!prompt.contains("Previous conversation"));

    // appended to history only after the response arrived
    assert_eq!(session.history().len(), 2);

    // the next turn sees the first exchange as context
    session.send("and where is it").await.unwrap();
    let second = transport.recorded()[1].prompt.clone();
    assert!(second.contains("and where is it"));
}

#[tokio::test]
async fn no_image_chat_uses_general_template_even_with_keywords() {
    let transport = RecordingVisionClient::replying("general answer");
    let router = ChatRouter::new(Arc::new(transport.clone()));

    router
        .route_and_respond("where is the eiffel tower", None, &ChatHistory::new())
        .await
        .unwrap();

    let recorded = transport.recorded();
    assert!(recorded[0].image.is_none());
    assert!(recorded[0].prompt.starts_with(prompts::CHAT_GENERAL_SYSTEM));
    assert!(recorded[0]
        .prompt
        .contains("Please answer: where is the eiffel tower"));
}

#[tokio::test]
async fn general_image_chat_carries_the_vision_assistant_preamble() {
    let transport = RecordingVisionClient::replying("a description");
    let router = ChatRouter::new(Arc::new(transport.clone()));

    router
        .route_and_respond("what is happening here", Some(&[7u8; 4]), &ChatHistory::new())
        .await
        .unwrap();

    let prompt = transport.recorded()[0].prompt.clone();
    assert!(prompt.starts_with(prompts::CHAT_WITH_IMAGE_SYSTEM));
    assert!(prompt.contains("Based on this image, please answer: what is happening here"));
    // specialized templates keep their own instructions, no preamble
    let transport = RecordingVisionClient::replying("a place");
    let router = ChatRouter::new(Arc::new(transport.clone()));
    router
        .route_and_respond("where is this", Some(&[7u8; 4]), &ChatHistory::new())
        .await
        .unwrap();
    assert!(!transport.recorded()[0]
        .prompt
        .contains(prompts::CHAT_WITH_IMAGE_SYSTEM));
}

#[tokio::test]
async fn chat_turn_with_empty_reply_returns_placeholder() {
    let transport = RecordingVisionClient::empty_replies();
    let router = ChatRouter::new(Arc::new(transport));

    let answer = router
        .route_and_respond("hello", None, &ChatHistory::new())
        .await
        .unwrap();
    assert!(answer.contains("couldn't process"));
}

#[tokio::test]
async fn analysis_params_are_forwarded_verbatim() {
    let transport = RecordingVisionClient::replying("text");
    let client = AnalysisClient::new(Arc::new(transport.clone()));

    let params = GenerationParams {
        temperature: 0.25,
        max_output_tokens: 99,
    };
    client
        .analyze(&[1u8], AnalysisKind::TextExtraction, params)
        .await
        .unwrap();

    let recorded = transport.recorded();
    assert!((recorded[0].params.temperature - 0.25).abs() < f32::EPSILON);
    assert_eq!(recorded[0].params.max_output_tokens, 99);
}
