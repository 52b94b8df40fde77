//! End-to-end scoring pipeline: normalize, reduce, embed, compare.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::batch::{self, BatchReport};
use crate::embedder::EmbeddingClient;
use crate::error::{Result, ScoringError};
use crate::normalizer::normalize;
use crate::records::{AnswerKeyRecord, StudentAnswerRecord};
use crate::reducer::{IndonesianReducer, LinguisticReducer};
use crate::scoring::{cosine_similarity, similarity_to_score, DiscreteScore};

/// Outcome of grading one answer against one key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SingleScore {
    /// Reference answer after normalization and reduction.
    pub key_text: String,
    /// Student answer after normalization and reduction.
    pub answer_text: String,
    /// Cosine similarity between the two embeddings.
    pub similarity: f64,
    /// Grade derived from `similarity`.
    pub score: DiscreteScore,
}

/// Owns one reducer and one embedding client for the duration of a session.
#[derive(Clone)]
pub struct ScoringPipeline {
    reducer: Arc<dyn LinguisticReducer>,
    client: EmbeddingClient,
}

impl ScoringPipeline {
    /// Builds a pipeline with the bundled Indonesian reducer.
    pub fn new(client: EmbeddingClient) -> Self {
        Self::with_reducer(client, Arc::new(IndonesianReducer::new()))
    }

    /// Builds a pipeline around a custom reducer.
    pub fn with_reducer(client: EmbeddingClient, reducer: Arc<dyn LinguisticReducer>) -> Self {
        Self { reducer, client }
    }

    /// Embedding client in use.
    pub fn client(&self) -> &EmbeddingClient {
        &self.client
    }

    /// Normalizes then reduces raw answer text.
    pub fn preprocess(&self, raw: &str) -> String {
        self.reducer.reduce(&normalize(raw))
    }

    /// Grades a single student answer against a reference answer.
    pub fn score_single(&self, key_answer: &str, student_answer: &str) -> Result<SingleScore> {
        let key_text = self.preprocess(key_answer);
        let answer_text = self.preprocess(student_answer);
        debug!(key = %key_text, answer = %answer_text, "preprocessed single answer");

        let mut vectors = self.client.embed(&[key_text.as_str(), answer_text.as_str()])?;
        let (Some(answer_vec), Some(key_vec)) = (vectors.pop(), vectors.pop()) else {
            return Err(ScoringError::Embedding(
                "encoder returned no vectors".to_string(),
            ));
        };
        self.client.check_dimension(&key_vec)?;
        self.client.check_dimension(&answer_vec)?;
        let similarity = cosine_similarity(&key_vec, &answer_vec)?;
        Ok(SingleScore {
            key_text,
            answer_text,
            similarity,
            score: similarity_to_score(similarity),
        })
    }

    /// Joins, embeds and grades a whole class roster. See [`batch::align_and_score`].
    pub fn score_batch(
        &self,
        keys: &[AnswerKeyRecord],
        answers: &[StudentAnswerRecord],
    ) -> Result<BatchReport> {
        batch::align_and_score(self, keys, answers)
    }
}
