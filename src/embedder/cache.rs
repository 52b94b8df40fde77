//! Process-wide memo of loaded encoders, keyed by variant.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use tracing::{debug, info};

use super::{Encoder, EncoderVariant};
use crate::error::{Result, ScoringError};

static GLOBAL_CACHE: OnceLock<EncoderCache> = OnceLock::new();

/// Loads each encoder variant at most once and hands out shared handles.
///
/// The lock is held while a variant loads, so concurrent callers asking for the
/// same variant wait for the first load instead of starting their own.
#[derive(Default)]
pub struct EncoderCache {
    loaded: Mutex<HashMap<EncoderVariant, Arc<dyn Encoder>>>,
}

impl EncoderCache {
    /// Creates an empty cache. Most callers want [`EncoderCache::global`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the lazily initialized process-wide cache.
    pub fn global() -> &'static EncoderCache {
        GLOBAL_CACHE.get_or_init(EncoderCache::new)
    }

    /// Returns the cached encoder for `variant`, loading it with `load` if absent.
    ///
    /// A failed load is not cached; the next call retries it.
    pub fn get_or_load<F>(&self, variant: EncoderVariant, load: F) -> Result<Arc<dyn Encoder>>
    where
        F: FnOnce(EncoderVariant) -> Result<Arc<dyn Encoder>>,
    {
        let mut loaded = self.loaded.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(encoder) = loaded.get(&variant) {
            debug!(%variant, "encoder cache hit");
            return Ok(Arc::clone(encoder));
        }

        let encoder = load(variant).map_err(|err| match err {
            ScoringError::Initialization { .. } => err,
            other => ScoringError::Initialization {
                variant,
                reason: other.to_string(),
            },
        })?;
        if encoder.variant() != variant {
            return Err(ScoringError::Initialization {
                variant,
                reason: format!("loader produced a {} encoder", encoder.variant()),
            });
        }
        info!(%variant, dimension = encoder.dimension(), "encoder loaded");
        loaded.insert(variant, Arc::clone(&encoder));
        Ok(encoder)
    }

    /// True when `variant` has already been loaded.
    pub fn is_loaded(&self, variant: EncoderVariant) -> bool {
        self.loaded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&variant)
    }

    /// Number of variants currently held.
    pub fn len(&self) -> usize {
        self.loaded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// True when nothing has been loaded yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
