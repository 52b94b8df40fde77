#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use essay_scorer::{EmbeddingClient, EmbeddingVector, Encoder, EncoderVariant, ScoringPipeline};

pub const DIMENSION: usize = 512;

/// Deterministic bag-of-words encoder: each distinct token gets its own axis.
pub struct VocabularyEncoder {
    vocabulary: Mutex<HashMap<String, usize>>,
    calls: AtomicUsize,
    inputs: AtomicUsize,
}

impl VocabularyEncoder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            vocabulary: Mutex::new(HashMap::new()),
            calls: AtomicUsize::new(0),
            inputs: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn inputs(&self) -> usize {
        self.inputs.load(Ordering::SeqCst)
    }

    fn vector(&self, text: &str) -> EmbeddingVector {
        let mut vocabulary = self.vocabulary.lock().unwrap();
        let mut vector = vec![0.0; DIMENSION];
        for token in text.split_whitespace() {
            let next = vocabulary.len();
            let axis = *vocabulary.entry(token.to_string()).or_insert(next);
            vector[axis % DIMENSION] += 1.0;
        }
        vector
    }
}

impl Encoder for VocabularyEncoder {
    fn embed(&self, texts: &[&str]) -> essay_scorer::Result<Vec<EmbeddingVector>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inputs.fetch_add(texts.len(), Ordering::SeqCst);
        Ok(texts.iter().map(|text| self.vector(text)).collect())
    }

    fn dimension(&self) -> usize {
        DIMENSION
    }

    fn variant(&self) -> EncoderVariant {
        EncoderVariant::DeepAveragingNetwork
    }
}

pub fn pipeline() -> (ScoringPipeline, Arc<VocabularyEncoder>) {
    let encoder = VocabularyEncoder::new();
    let client = EmbeddingClient::new(encoder.clone());
    (ScoringPipeline::new(client), encoder)
}
