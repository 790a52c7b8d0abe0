use super::{ChatHistory, ChatRole};
use crate::error::Result;
use crate::gemini::{prompts, DynVisionClient, GenerateRequest, GenerationParams};

pub const DEFAULT_CONTEXT_WINDOW: usize = 10;

/// Returned when the upstream produced no usable answer for a chat turn.
const NO_ANSWER_PLACEHOLDER: &str =
    "I'm sorry, I couldn't process your question. Please try again.";

/// Classification outcome for one user question.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChatIntent {
    Location,
    Product,
    General,
}

const LOCATION_KEYWORDS: &[&str] = &[
    "where", "location", "landmark", "address", "city", "country", "street", "building",
];

const PRODUCT_KEYWORDS: &[&str] = &[
    "product", "brand", "price", "buy", "model", "identify", "specification",
];

/// Ordered rule table, evaluated top to bottom; the first matching rule wins.
/// Location is deliberately checked before product: the precedence for
/// questions matching both sets is provisional but must stay deterministic.
const ROUTING_RULES: &[(ChatIntent, &[&str])] = &[
    (ChatIntent::Location, LOCATION_KEYWORDS),
    (ChatIntent::Product, PRODUCT_KEYWORDS),
];

/// Keyword dispatcher for free-text questions about an image.
///
/// This is a static rule set, not a learned classifier; misclassification on
/// overlapping keywords ("what brand is this building") is a documented
/// limitation of the rule order.
pub struct ChatRouter {
    client: DynVisionClient,
    window: usize,
}

impl ChatRouter {
    pub fn new(client: DynVisionClient) -> Self {
        Self {
            client,
            window: DEFAULT_CONTEXT_WINDOW,
        }
    }

    pub fn with_window(client: DynVisionClient, window: usize) -> Self {
        Self { client, window }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Lowercase substring match over the rule table, first match wins.
    pub fn classify(question: &str) -> ChatIntent {
        let lowered = question.to_lowercase();
        for (intent, keywords) in ROUTING_RULES {
            if keywords.iter().any(|k| lowered.contains(k)) {
                return *intent;
            }
        }
        ChatIntent::General
    }

    /// Answer one chat turn.
    ///
    /// `history` must not contain the in-flight question; the caller appends
    /// the exchange after a response is obtained. Only the most recent
    /// configured window of `history` is serialized as context.
    pub async fn route_and_respond(
        &self,
        question: &str,
        image: Option<&[u8]>,
        history: &ChatHistory,
    ) -> Result<String> {
        let intent = Self::classify(question);
        tracing::info!(intent = ?intent, with_image = image.is_some(), "routing chat turn");

        let request = match (image, intent) {
            (Some(image), ChatIntent::Location) => GenerateRequest::with_image(
                prompts::CHAT_LOCATION.replace("{question}", question),
                image.to_vec(),
                GenerationParams {
                    temperature: 0.3,
                    max_output_tokens: 400,
                },
            ),
            (Some(image), ChatIntent::Product) => GenerateRequest::with_image(
                prompts::CHAT_PRODUCT.replace("{question}", question),
                image.to_vec(),
                GenerationParams {
                    temperature: 0.3,
                    max_output_tokens: 400,
                },
            ),
            (Some(image), ChatIntent::General) => GenerateRequest::with_image(
                format!(
                    "{}\n\n{}Based on this image, please answer: {}",
                    prompts::CHAT_WITH_IMAGE_SYSTEM,
                    self.render_context(history),
                    question
                ),
                image.to_vec(),
                GenerationParams {
                    temperature: 0.7,
                    max_output_tokens: 500,
                },
            ),
            // Without an image the specialized templates have nothing to look
            // at; every intent falls through to general chat.
            (None, _) => GenerateRequest::text_only(
                format!(
                    "{}\n\n{}Please answer: {}",
                    prompts::CHAT_GENERAL_SYSTEM,
                    self.render_context(history),
                    question
                ),
                GenerationParams {
                    temperature: 0.7,
                    max_output_tokens: 500,
                },
            ),
        };

        let response = self.client.generate(request).await?;
        Ok(response
            .text
            .unwrap_or_else(|| NO_ANSWER_PLACEHOLDER.to_string()))
    }

    /// Serialize the bounded history suffix as a conversation preamble.
    fn render_context(&self, history: &ChatHistory) -> String {
        let window = history.context_window(self.window);
        if window.is_empty() {
            return String::new();
        }

        let mut context = String::from("Previous conversation:\n");
        for message in window {
            match message.role {
                ChatRole::User => {
                    context.push_str("User: ");
                }
                ChatRole::Assistant => {
                    context.push_str("AI: ");
                }
            }
            context.push_str(&message.content);
            context.push('\n');
        }
        context.push('\n');
        context
    }
}
