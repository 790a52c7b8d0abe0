use std::sync::Arc;

use async_trait::async_trait;

use super::types::{GenerateRequest, GenerateResponse};
use crate::error::Result;

/// Transport seam for the multimodal generation endpoint. Implementations are
/// exchangeable for offline doubles in tests.
#[async_trait]
pub trait VisionClient: Send + Sync {
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse>;

    fn clone_dyn(&self) -> DynVisionClient;
}

pub type DynVisionClient = Arc<dyn VisionClient>;
