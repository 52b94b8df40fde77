#![warn(missing_docs)]
//! Automatic essay scoring for Indonesian short answers.
//!
//! Answers are normalized, stripped of stopwords, stemmed, embedded with a
//! sentence encoder and compared to a reference answer by cosine similarity.
//! The similarity is mapped onto a `1..=10` grade.

pub mod batch;
pub mod controls;
pub mod embedder;
pub mod error;
pub mod normalizer;
pub mod pipeline;
pub mod records;
pub mod reducer;
pub mod scoring;

pub use batch::{align_and_score, BatchReport, DroppedRow, FailedRow};
pub use controls::{init_logging, EncoderArgs};
pub use embedder::{EmbeddingClient, EmbeddingVector, Encoder, EncoderCache, EncoderVariant};
pub use error::{Result, ScoringError};
pub use normalizer::normalize;
pub use pipeline::{ScoringPipeline, SingleScore};
pub use records::{AnswerKeyRecord, QuestionId, ScoredRecord, StudentAnswerRecord};
pub use reducer::{IndonesianReducer, LinguisticReducer};
pub use scoring::{cosine_similarity, similarity_to_score, DiscreteScore, SimilarityError};
