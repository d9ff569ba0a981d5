//! Input validation errors

use thiserror::Error;

/// Rejections of badly shaped input, raised before any network or LLM call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error(
        "Not a Google Scholar profile URL: {0}\n\
         Expected format: https://scholar.google.com/citations?user=XXXXXXXX"
    )]
    NotScholarProfile(String),

    #[error("Input is empty")]
    EmptyInput,

    #[error("Input must be at least {min} characters")]
    InputTooShort { min: usize },

    #[error("Input must be at most {max} characters")]
    InputTooLong { max: usize },
}
