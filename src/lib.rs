pub mod chat;
pub mod config;
pub mod error;
pub mod gemini;
pub mod image;
pub mod speech;
pub mod utils;

pub use chat::{ChatHistory, ChatIntent, ChatMessage, ChatRole, ChatRouter, ChatSession};
pub use config::{EnvConfig, GeminiSettings};
pub use error::{Result, VispioError};
pub use gemini::{
    AnalysisClient, AnalysisKind, AnalysisResult, DynVisionClient, GeminiHttpClient,
    GenerateRequest, GenerateResponse, GenerationParams, LocalEchoClient, VisionClient,
};
pub use image::{ImageInfo, ImagePipeline};
pub use speech::{AudioArtifact, AudioFormat, GoogleTtsClient, SpeechClient, SpeechSynthesizer};
pub use utils::{ConfigValidator, LoggingConfig};
