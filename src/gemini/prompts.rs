//! Fixed instruction templates, one per analysis kind.

use super::types::{AnalysisKind, GenerationParams};

pub const DESCRIPTIVE: &str = "Provide a detailed, descriptive caption for this image. \
    Include information about objects, people, setting, colors, composition, and mood. \
    Be specific and informative.";

pub const CREATIVE: &str = "Create an imaginative and creative caption for this image. \
    Use vivid language, metaphors, and storytelling elements. Make it engaging and artistic.";

pub const TECHNICAL: &str = "Provide a technical analysis of this image. Include details \
    about composition, lighting, photography techniques, visual elements, and technical aspects.";

pub const SIMPLE: &str = "Provide a simple, clear caption for this image in one or two \
    sentences. Focus on the main subject and key elements.";

pub const DETAILED: &str = "Describe this image exhaustively, section by section: main \
    subjects, background, setting, lighting, colors, and any text or symbols visible. \
    Leave nothing notable unmentioned.";

pub const LOCATION: &str = "Analyze this image for location information.\n\nFocus on:\n\
    - Geographic features\n\
    - Landmarks or buildings\n\
    - Street signs or location indicators\n\
    - Cultural or architectural clues\n\
    - Any text that might indicate location";

pub const PRODUCT: &str = "Analyze this image for product information.\n\nFocus on:\n\
    - Product names and brands\n\
    - Product features and specifications\n\
    - Price information if visible\n\
    - Product categories\n\
    - Any text or labels on products";

pub const COMPREHENSIVE: &str = "Analyze this image and provide the following information \
    in a structured format:\n\
    1. Main subjects/objects\n\
    2. Setting/location\n\
    3. Colors and lighting\n\
    4. Mood/atmosphere\n\
    5. Notable features";

pub const TEXT_EXTRACTION: &str = "Extract all text visible in this image, exactly as \
    written. Include signs, labels, documents, and captions. After the transcription, \
    note anything about placement or formatting that matters for reading it.";

pub const CHAT_WITH_IMAGE_SYSTEM: &str = "You are a helpful AI assistant that can see and \
    understand images. Provide detailed, accurate, and conversational responses about what \
    you see. Be friendly and engaging while maintaining accuracy. If asked about specific \
    details in the image, focus on those areas. Keep responses informative but conversational.";

pub const CHAT_GENERAL_SYSTEM: &str = "You are Vispio's AI assistant, specialized in visual \
    understanding and image analysis. While you can chat about general topics, your expertise \
    is in helping users understand and describe visual content. Be helpful, friendly, and \
    encourage users to upload images for visual analysis when relevant.";

/// Chat-time variants of the specialized analyses; `{question}` is replaced
/// with the user's message.
pub const CHAT_LOCATION: &str = "Analyze this image for location information and answer: \
    {question}\n\nFocus on:\n\
    - Geographic features\n\
    - Landmarks or buildings\n\
    - Street signs or location indicators\n\
    - Cultural or architectural clues\n\
    - Any text that might indicate location";

pub const CHAT_PRODUCT: &str = "Analyze this image for product information and answer: \
    {question}\n\nFocus on:\n\
    - Product names and brands\n\
    - Product features and specifications\n\
    - Price information if visible\n\
    - Product categories\n\
    - Any text or labels on products";

pub const SUGGESTED_QUESTIONS: &str = "Look at this image and suggest 4 interesting \
    questions that someone might ask about it. Focus on specific details, context, or \
    analysis. Return only the questions, one per line, without numbering.";

/// Returned when the upstream response carried no usable text.
pub const NO_RESULT_PLACEHOLDER: &str =
    "No description could be generated for this image. Please try again.";

/// Instruction template for a kind.
pub fn template(kind: AnalysisKind) -> &'static str {
    match kind {
        AnalysisKind::Descriptive => DESCRIPTIVE,
        AnalysisKind::Creative => CREATIVE,
        AnalysisKind::Technical => TECHNICAL,
        AnalysisKind::Simple => SIMPLE,
        AnalysisKind::Detailed => DETAILED,
        AnalysisKind::Location => LOCATION,
        AnalysisKind::Product => PRODUCT,
        AnalysisKind::Comprehensive => COMPREHENSIVE,
        AnalysisKind::TextExtraction => TEXT_EXTRACTION,
    }
}

/// Recommended generation defaults per kind. Factual and extraction kinds run
/// cooler than caption kinds.
pub fn default_params(kind: AnalysisKind) -> GenerationParams {
    match kind {
        AnalysisKind::Descriptive => GenerationParams {
            temperature: 0.7,
            max_output_tokens: 150,
        },
        AnalysisKind::Creative => GenerationParams {
            temperature: 0.8,
            max_output_tokens: 150,
        },
        AnalysisKind::Technical => GenerationParams {
            temperature: 0.3,
            max_output_tokens: 200,
        },
        AnalysisKind::Simple => GenerationParams {
            temperature: 0.5,
            max_output_tokens: 100,
        },
        AnalysisKind::Detailed => GenerationParams {
            temperature: 0.7,
            max_output_tokens: 300,
        },
        AnalysisKind::Location | AnalysisKind::Product => GenerationParams {
            temperature: 0.3,
            max_output_tokens: 400,
        },
        AnalysisKind::Comprehensive => GenerationParams {
            temperature: 0.4,
            max_output_tokens: 500,
        },
        AnalysisKind::TextExtraction => GenerationParams {
            temperature: 0.2,
            max_output_tokens: 400,
        },
    }
}
