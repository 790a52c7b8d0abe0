use super::{ChatHistory, ChatMessage, ChatRouter};
use crate::error::Result;
use crate::gemini::{prompts, DynVisionClient, GenerateRequest, GenerationParams};

/// Starter questions offered when the upstream suggestion call returns nothing.
const FALLBACK_QUESTIONS: [&str; 4] = [
    "What do you see in this image?",
    "Can you describe the main subject?",
    "What's the setting or location?",
    "Are there any interesting details?",
];

/// One interactive conversation: the attached image and the running history.
///
/// Owned by exactly one session; nothing here is shared across threads. The
/// in-flight question is excluded from the context sent upstream and appended
/// to the history only after a response is obtained.
pub struct ChatSession {
    router: ChatRouter,
    client: DynVisionClient,
    history: ChatHistory,
    image: Option<Vec<u8>>,
}

impl ChatSession {
    pub fn new(client: DynVisionClient) -> Self {
        Self {
            router: ChatRouter::new(client.clone_dyn()),
            client,
            history: ChatHistory::new(),
            image: None,
        }
    }

    pub fn attach_image(&mut self, image_bytes: Vec<u8>) {
        self.image = Some(image_bytes);
    }

    pub fn detach_image(&mut self) {
        self.image = None;
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    pub fn history(&self) -> &ChatHistory {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Answer one user question and record the exchange.
    pub async fn send(&mut self, question: &str) -> Result<String> {
        let answer = self
            .router
            .route_and_respond(question, self.image.as_deref(), &self.history)
            .await?;

        self.history.push(ChatMessage::user(question));
        self.history.push(ChatMessage::assistant(answer.clone()));
        Ok(answer)
    }

    /// Up to four starter questions about the attached image. Falls back to a
    /// canned list when the upstream returns nothing usable.
    pub async fn suggested_questions(&self) -> Result<Vec<String>> {
        let image = match &self.image {
            Some(image) => image.clone(),
            None => return Ok(Self::fallback_questions()),
        };

        let request = GenerateRequest::with_image(
            prompts::SUGGESTED_QUESTIONS,
            image,
            GenerationParams {
                temperature: 0.8,
                max_output_tokens: 300,
            },
        );

        let response = self.client.generate(request).await?;
        let questions: Vec<String> = response
            .text
            .map(|text| {
                text.lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .take(4)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        if questions.is_empty() {
            tracing::warn!("no suggested questions returned, using fallback list");
            Ok(Self::fallback_questions())
        } else {
            Ok(questions)
        }
    }

    fn fallback_questions() -> Vec<String> {
        FALLBACK_QUESTIONS.iter().map(|q| q.to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::ChatRole;
    use crate::gemini::LocalEchoClient;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_send_appends_exchange_after_response() {
        let mut session = ChatSession::new(Arc::new(LocalEchoClient));
        let answer = session.send("hello there").await.unwrap();

        assert!(answer.contains("hello there"));
        assert_eq!(session.history().len(), 2);
        assert_eq!(session.history().messages()[0].role, ChatRole::User);
        assert_eq!(session.history().messages()[1].role, ChatRole::Assistant);
    }

    #[tokio::test]
    async fn test_suggested_questions_without_image_uses_fallback() {
        let session = ChatSession::new(Arc::new(LocalEchoClient));
        let questions = session.suggested_questions().await.unwrap();
        assert_eq!(questions.len(), 4);
    }
}
