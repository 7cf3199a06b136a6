//! Parsing error types for listing pages and listing rows
//!
//! A malformed field only costs its row. The other variants matter for the
//! first page, selector setup, or ending the crawl.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParsingError {
    #[error("Invalid CSS selector: {selector} - {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("HTML parsing failed: {message}")]
    HtmlParsingFailed { message: String },

    #[error("Malformed field '{field}': '{token}' - {reason}")]
    MalformedField {
        field: String,
        token: String,
        reason: String,
    },

    #[error("URL resolution failed: {url} - {reason}")]
    UrlResolutionFailed {
        url: String,
        reason: String,
        base_url: Option<String>,
    },
}

impl ParsingError {
    /// Create an invalid selector error
    pub fn invalid_selector(selector: &str, reason: impl ToString) -> Self {
        Self::InvalidSelector {
            selector: selector.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create a malformed field error for a token that failed to parse
    pub fn malformed_field(field: &str, token: &str, reason: impl ToString) -> Self {
        Self::MalformedField {
            field: field.to_string(),
            token: token.to_string(),
            reason: reason.to_string(),
        }
    }
}

pub type ParsingResult<T> = Result<T, ParsingError>;
