use std::path::PathBuf;
use thiserror::Error;

/// A specialized `Result` type for row location and username extraction.
pub type ExtractResult<T> = Result<T, ExtractError>;

/// The error type for every stage of the extraction pipeline.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Invalid input ({context}): {reason}")]
    InvalidInput { context: String, reason: String },

    #[error("Failed to decode image {path:?}: {source}")]
    ImageDecode {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Image buffer is empty or unreadable: {context}")]
    EmptyImage { context: String },

    #[error("No rows found: template matching produced no reference points")]
    NoMatchesFound,

    #[error("OCR returned {} non-empty lines instead of exactly one: {lines:?}", .lines.len())]
    AmbiguousOcrResult { lines: Vec<String> },

    #[error("Template '{template}' failed: {source}")]
    TemplateFailed {
        template: String,
        source: Box<ExtractError>,
    },

    #[error("Invalid configuration: {reason}")]
    Config { reason: String },

    #[error("Failed to parse configuration: {source}")]
    ConfigParse {
        #[from]
        source: toml::de::Error,
    },

    #[error("OCR engine failed: {reason}")]
    Ocr { reason: String },

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl ExtractError {
    pub(crate) fn invalid_input(context: impl Into<String>, reason: impl Into<String>) -> Self {
        ExtractError::InvalidInput {
            context: context.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn config(reason: impl Into<String>) -> Self {
        ExtractError::Config {
            reason: reason.into(),
        }
    }

    /// True for failures that only affect a single row's text extraction.
    ///
    /// Anything else aborts the whole screenshot.
    pub fn is_row_recoverable(&self) -> bool {
        matches!(
            self,
            ExtractError::AmbiguousOcrResult { .. } | ExtractError::Ocr { .. }
        )
    }

    /// The innermost error, looking through template stage wrappers.
    pub fn root_cause(&self) -> &ExtractError {
        match self {
            ExtractError::TemplateFailed { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
