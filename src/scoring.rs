//! Cosine similarity and the similarity-to-grade curve.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Similarity below this value always earns the floor score.
pub const SIMILARITY_FLOOR: f64 = 0.5;
/// Lowest grade the system hands out.
pub const MIN_SCORE: u8 = 1;
/// Highest grade the system hands out.
pub const MAX_SCORE: u8 = 10;

/// Integer grade in `1..=10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiscreteScore(u8);

impl DiscreteScore {
    /// Wraps a raw grade, clamping it into `1..=10`.
    pub fn new(value: u8) -> Self {
        Self(value.clamp(MIN_SCORE, MAX_SCORE))
    }

    /// Raw grade value.
    pub fn value(self) -> u8 {
        self.0
    }
}

impl fmt::Display for DiscreteScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Vectors that cannot be compared.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimilarityError {
    /// The two vectors have different lengths.
    #[error("vector length mismatch: {left} vs {right}")]
    DimensionMismatch {
        /// Length of the answer-key vector.
        left: usize,
        /// Length of the student vector.
        right: usize,
    },
    /// A vector does not have the encoder's dimension.
    #[error("vector has {actual} components, encoder produces {expected}")]
    UnexpectedDimension {
        /// Dimension reported by the encoder.
        expected: usize,
        /// Length of the offending vector.
        actual: usize,
    },
    /// A vector contains NaN or infinity.
    #[error("vector contains non-finite components")]
    NonFinite,
}

/// Cosine of the angle between `a` and `b`, accumulated in `f64`.
///
/// Returns `0.0` when either vector has zero norm, so an empty answer is simply
/// dissimilar rather than invalid.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f64, SimilarityError> {
    if a.len() != b.len() {
        return Err(SimilarityError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    if a.iter().chain(b).any(|x| !x.is_finite()) {
        return Err(SimilarityError::NonFinite);
    }

    let (mut dot, mut norm_a, mut norm_b) = (0.0f64, 0.0f64, 0.0f64);
    for (&x, &y) in a.iter().zip(b) {
        let (x, y) = (f64::from(x), f64::from(y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }
    Ok((dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0))
}

/// Maps a similarity scalar onto the `1..=10` grade scale.
///
/// Below [`SIMILARITY_FLOOR`] the grade is 1. From the floor up to 1.0 the grade
/// rises linearly from 1 to 10 and is rounded half-to-even, then clamped.
pub fn similarity_to_score(similarity: f64) -> DiscreteScore {
    if similarity.is_nan() || similarity < SIMILARITY_FLOOR {
        return DiscreteScore(MIN_SCORE);
    }
    let span = f64::from(MAX_SCORE - MIN_SCORE);
    let raw = (similarity - SIMILARITY_FLOOR) * span / (1.0 - SIMILARITY_FLOOR) + f64::from(MIN_SCORE);
    let rounded = raw
        .round_ties_even()
        .clamp(f64::from(MIN_SCORE), f64::from(MAX_SCORE));
    DiscreteScore(rounded as u8)
}

/// Grades a student vector against the answer-key vector.
pub fn score(key: &[f32], answer: &[f32]) -> Result<DiscreteScore, SimilarityError> {
    cosine_similarity(key, answer).map(similarity_to_score)
}
