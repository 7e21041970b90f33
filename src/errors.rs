//! Structured error types for the extraction pipeline
//!
//! "Nothing found" is never an error here: empty text yields empty
//! collections. Errors mean the pipeline actually failed, and they carry
//! machine-readable codes so callers can map them onto their own surface
//! (an API layer turning `EXTRACTION_FAILED` into a 5xx, for example).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Structured error payload for callers that serialize errors onward
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code
    pub code: String,

    /// Human-readable error message
    pub message: String,
}

/// Pipeline error types with proper categorization
#[derive(Debug)]
pub enum CoreError {
    /// The annotator failed or the input was malformed. Never produced for
    /// merely empty input.
    Extraction { reason: String },

    /// An edge or relation referenced a node/concept absent from the graph
    /// or concept set. Always a contract violation between stages.
    ReferentialIntegrity { edge: String, missing: String },

    /// Generic wrapper for external errors
    Internal(anyhow::Error),
}

impl CoreError {
    /// Get error code for caller identification
    pub fn code(&self) -> &'static str {
        match self {
            Self::Extraction { .. } => "EXTRACTION_FAILED",
            Self::ReferentialIntegrity { .. } => "REFERENTIAL_INTEGRITY",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get detailed error message
    pub fn message(&self) -> String {
        match self {
            Self::Extraction { reason } => format!("Extraction failed: {reason}"),
            Self::ReferentialIntegrity { edge, missing } => {
                format!("Edge '{edge}' references missing node '{missing}'")
            }
            Self::Internal(err) => format!("Internal error: {err}"),
        }
    }

    /// Convert to a structured payload
    pub fn to_detail(&self) -> ErrorDetail {
        ErrorDetail {
            code: self.code().to_string(),
            message: self.message(),
        }
    }
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for CoreError {}

impl From<anyhow::Error> for CoreError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}

/// Type alias for Results using CoreError
pub type Result<T> = std::result::Result<T, CoreError>;
