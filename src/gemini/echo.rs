use std::sync::Arc;

use async_trait::async_trait;

use super::client::{DynVisionClient, VisionClient};
use super::types::{GenerateRequest, GenerateResponse};
use crate::error::Result;

/// Offline client that echoes the prompt back. Useful for wiring checks and
/// demos without an API key.
#[derive(Default, Clone)]
pub struct LocalEchoClient;

#[async_trait]
impl VisionClient for LocalEchoClient {
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse> {
        Ok(GenerateResponse {
            text: Some(format!("[Echo] {}", request.prompt)),
            metadata: None,
        })
    }

    fn clone_dyn(&self) -> DynVisionClient {
        Arc::new(LocalEchoClient)
    }
}
