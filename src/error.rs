//! Error types shared by the scoring pipeline.

use thiserror::Error;

use crate::embedder::EncoderVariant;
use crate::scoring::SimilarityError;

/// Errors surfaced while loading an encoder or scoring answers.
#[derive(Debug, Error)]
pub enum ScoringError {
    /// The requested encoder variant could not be loaded. Scoring cannot proceed.
    #[error("failed to load {variant} encoder: {reason}")]
    Initialization {
        /// Variant that failed to load.
        variant: EncoderVariant,
        /// Human readable cause.
        reason: String,
    },

    /// A required column is absent from an input table.
    #[error("{table} table is missing required column(s): {}", .columns.join(", "))]
    MissingColumns {
        /// Name of the table being validated.
        table: &'static str,
        /// Columns that were not found in the header row.
        columns: Vec<String>,
    },

    /// The two tables use incompatible question identifier types.
    #[error("question id type mismatch: answer key ids are {key_kind}, student answer ids are {answer_kind}")]
    KeyTypeMismatch {
        /// Kind of identifier found in the answer key table.
        key_kind: &'static str,
        /// Kind of identifier found in the student answer table.
        answer_kind: &'static str,
    },

    /// The answer key lists the same question more than once.
    #[error("answer key contains duplicate question id {0}")]
    DuplicateQuestion(String),

    /// The encoder rejected or failed an `embed` call.
    #[error("embedding request failed: {0}")]
    Embedding(String),

    /// A key/answer vector pair could not be compared.
    #[error(transparent)]
    Similarity(#[from] SimilarityError),

    /// Reading or writing a table failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A table could not be parsed or serialized as CSV.
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl ScoringError {
    /// True when the error should abort the whole session rather than one batch.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Initialization { .. })
    }

    /// True when the error stems from the shape of the supplied tables.
    pub fn is_input_shape(&self) -> bool {
        matches!(
            self,
            Self::MissingColumns { .. } | Self::KeyTypeMismatch { .. } | Self::DuplicateQuestion(_)
        )
    }
}

/// Convenience alias used across the library.
pub type Result<T, E = ScoringError> = std::result::Result<T, E>;
