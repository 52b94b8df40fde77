//! Encoder selection and connection settings shared by the binaries.

use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use tracing_subscriber::EnvFilter;

use crate::embedder::{
    EmbeddingClient, Encoder, EncoderCache, EncoderVariant, HttpEncoder, HttpEncoderConfig,
};
use crate::error::Result;
use crate::pipeline::ScoringPipeline;

/// Default base URL of the local encoder service.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8501/v1";
/// Default model served for the transformer variant.
pub const DEFAULT_TRANSFORMER_MODEL: &str = "universal-sentence-encoder-large/5";
/// Default model served for the deep averaging network variant.
pub const DEFAULT_DAN_MODEL: &str = "universal-sentence-encoder/4";

/// Flags selecting and reaching the sentence encoder.
#[derive(Args, Debug, Clone)]
pub struct EncoderArgs {
    /// Encoder variant: `transformer` (accurate) or `dan` (fast)
    #[arg(long, env = "ESSAY_ENCODER", value_enum, default_value_t = EncoderVariant::Transformer)]
    pub encoder: EncoderVariant,

    /// Base URL of the OpenAI-compatible embedding service
    #[arg(long, env = "ESSAY_ENCODER_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Optional bearer token for the embedding service
    #[arg(long, env = "ESSAY_ENCODER_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Model identifier requested for the transformer variant
    #[arg(long, env = "ESSAY_TRANSFORMER_MODEL", default_value = DEFAULT_TRANSFORMER_MODEL)]
    pub transformer_model: String,

    /// Model identifier requested for the dan variant
    #[arg(long, env = "ESSAY_DAN_MODEL", default_value = DEFAULT_DAN_MODEL)]
    pub dan_model: String,

    /// Max seconds to wait for each embedding request
    #[arg(long, env = "ESSAY_ENCODER_TIMEOUT_SECS", default_value_t = 60)]
    pub timeout_secs: u64,

    /// Attempts per embedding request, including the first
    #[arg(long, env = "ESSAY_ENCODER_MAX_RETRIES", default_value_t = 3)]
    pub max_retries: usize,

    /// Max number of texts sent per embedding request
    #[arg(long, env = "ESSAY_ENCODER_BATCH", default_value_t = 64)]
    pub batch_size: usize,
}

impl EncoderArgs {
    /// Model identifier configured for `variant`.
    pub fn model_for(&self, variant: EncoderVariant) -> &str {
        match variant {
            EncoderVariant::Transformer => &self.transformer_model,
            EncoderVariant::DeepAveragingNetwork => &self.dan_model,
        }
    }

    /// Connection settings for `variant`.
    pub fn http_config(&self, variant: EncoderVariant) -> HttpEncoderConfig {
        HttpEncoderConfig {
            base_url: self.endpoint.clone(),
            api_key: self.api_key.clone(),
            model: self.model_for(variant).to_string(),
            timeout: Duration::from_secs(self.timeout_secs),
            max_retries: self.max_retries,
            batch_size: self.batch_size,
        }
    }

    /// Loads the selected encoder through the process-wide cache.
    pub fn load_client(&self) -> Result<EmbeddingClient> {
        EmbeddingClient::from_cache(EncoderCache::global(), self.encoder, |variant| {
            let encoder = HttpEncoder::load(variant, self.http_config(variant))?;
            Ok(Arc::new(encoder) as Arc<dyn Encoder>)
        })
    }

    /// Loads the selected encoder and wraps it in a scoring pipeline.
    pub fn load_pipeline(&self) -> Result<ScoringPipeline> {
        self.load_client().map(ScoringPipeline::new)
    }
}

/// Installs the stderr `tracing` subscriber. `RUST_LOG` overrides the `info` default.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        encoder: EncoderArgs,
    }

    #[test]
    fn defaults_pick_transformer_on_localhost() {
        let cli = TestCli::try_parse_from(["test"]).unwrap();
        let config = cli.encoder.http_config(cli.encoder.encoder);
        assert_eq!(cli.encoder.encoder, EncoderVariant::Transformer);
        assert_eq!(config.base_url, DEFAULT_ENDPOINT);
        assert_eq!(config.model, DEFAULT_TRANSFORMER_MODEL);
        assert_eq!(config.timeout, Duration::from_secs(60));
    }

    #[test]
    fn dan_variant_uses_its_own_model() {
        let cli = TestCli::try_parse_from(["test", "--encoder", "dan", "--dan-model", "use-lite"])
            .unwrap();
        assert_eq!(cli.encoder.encoder, EncoderVariant::DeepAveragingNetwork);
        assert_eq!(cli.encoder.model_for(cli.encoder.encoder), "use-lite");
    }

    #[test]
    fn unknown_variant_is_rejected() {
        assert!(TestCli::try_parse_from(["test", "--encoder", "bert"]).is_err());
    }
}
