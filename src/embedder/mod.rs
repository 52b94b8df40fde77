//! Sentence encoder abstraction and the client the pipeline embeds through.

pub mod cache;
pub mod http;

use std::fmt;
use std::sync::Arc;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, ScoringError};
use crate::scoring::SimilarityError;

pub use cache::EncoderCache;
pub use http::{HttpEncoder, HttpEncoderConfig};

/// Fixed-length vector produced by an encoder for one text.
pub type EmbeddingVector = Vec<f32>;

/// Named encoder variants a session can pick from.
///
/// Vectors from different variants live in different spaces and must never be
/// compared with each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncoderVariant {
    /// Transformer encoder: higher accuracy, slower.
    Transformer,
    /// Deep Averaging Network encoder: lighter and faster.
    #[value(name = "dan", alias = "deep-averaging-network")]
    #[serde(rename = "dan")]
    DeepAveragingNetwork,
}

impl EncoderVariant {
    /// Stable short name used in logs and configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Transformer => "transformer",
            Self::DeepAveragingNetwork => "dan",
        }
    }
}

impl fmt::Display for EncoderVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A loaded sentence encoder.
///
/// Implementations must return exactly one vector per input, in input order.
pub trait Encoder: Send + Sync {
    /// Embeds every input text.
    fn embed(&self, texts: &[&str]) -> Result<Vec<EmbeddingVector>>;

    /// Length of the vectors this encoder produces.
    fn dimension(&self) -> usize;

    /// Variant this encoder was loaded as.
    fn variant(&self) -> EncoderVariant;
}

/// Thin wrapper around one encoder instance, fixed for the lifetime of a session.
#[derive(Clone)]
pub struct EmbeddingClient {
    encoder: Arc<dyn Encoder>,
}

impl EmbeddingClient {
    /// Wraps an already loaded encoder.
    pub fn new(encoder: Arc<dyn Encoder>) -> Self {
        Self { encoder }
    }

    /// Resolves `variant` through `cache`, loading it with `load` on first use.
    pub fn from_cache<F>(cache: &EncoderCache, variant: EncoderVariant, load: F) -> Result<Self>
    where
        F: FnOnce(EncoderVariant) -> Result<Arc<dyn Encoder>>,
    {
        cache.get_or_load(variant, load).map(Self::new)
    }

    /// Variant backing this client.
    pub fn variant(&self) -> EncoderVariant {
        self.encoder.variant()
    }

    /// Vector length produced by the backing encoder.
    pub fn dimension(&self) -> usize {
        self.encoder.dimension()
    }

    /// Rejects a vector whose length differs from the encoder's dimension.
    pub fn check_dimension(&self, vector: &[f32]) -> Result<(), SimilarityError> {
        let expected = self.dimension();
        if vector.len() != expected {
            return Err(SimilarityError::UnexpectedDimension {
                expected,
                actual: vector.len(),
            });
        }
        Ok(())
    }

    /// Embeds `texts` in one encoder invocation, preserving length and order.
    pub fn embed<S: AsRef<str>>(&self, texts: &[S]) -> Result<Vec<EmbeddingVector>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let inputs: Vec<&str> = texts.iter().map(AsRef::as_ref).collect();
        debug!(
            variant = %self.variant(),
            count = inputs.len(),
            "embedding texts"
        );
        let vectors = self.encoder.embed(&inputs)?;
        if vectors.len() != inputs.len() {
            return Err(ScoringError::Embedding(format!(
                "{} encoder returned {} vectors for {} inputs",
                self.variant(),
                vectors.len(),
                inputs.len()
            )));
        }
        Ok(vectors)
    }
}

impl fmt::Debug for EmbeddingClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmbeddingClient")
            .field("variant", &self.variant())
            .field("dimension", &self.dimension())
            .finish()
    }
}
