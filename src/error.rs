use thiserror::Error;

pub type Result<T> = std::result::Result<T, VispioError>;

#[derive(Debug, Error)]
pub enum VispioError {
    #[error("invalid image: {0}")]
    InvalidImage(String),
    #[error("image decode failed: {0}")]
    ImageDecode(String),
    #[error("missing configuration: {0}")]
    MissingConfig(String),
    #[error("text for speech synthesis is empty")]
    EmptyText,
    #[error("unsupported language code `{0}`")]
    UnsupportedLanguage(String),
    #[error("upstream API request failed: {0}")]
    Api(String),
    #[error("malformed API response: {0}")]
    MalformedResponse(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
