//! Blocking client for sentence encoders served behind an OpenAI-compatible
//! `/embeddings` endpoint.

use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{EmbeddingVector, Encoder, EncoderVariant};
use crate::error::{Result, ScoringError};

const PROBE_TEXT: &str = "probe";

/// Connection settings for one encoder variant.
#[derive(Debug, Clone)]
pub struct HttpEncoderConfig {
    /// Base URL, e.g. `http://127.0.0.1:8501/v1`. `/embeddings` is appended.
    pub base_url: String,
    /// Optional bearer token.
    pub api_key: Option<String>,
    /// Model identifier served for the variant.
    pub model: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Attempts per request, including the first.
    pub max_retries: usize,
    /// Maximum number of texts per HTTP request.
    pub batch_size: usize,
}

/// Encoder backed by a remote embedding service.
#[derive(Debug, Clone)]
pub struct HttpEncoder {
    client: Client,
    endpoint: String,
    model: String,
    variant: EncoderVariant,
    dimension: usize,
    max_retries: usize,
    batch_size: usize,
}

impl HttpEncoder {
    /// Builds the HTTP client and probes the endpoint once.
    ///
    /// Any failure here (bad configuration, unreachable service, empty vectors)
    /// is reported as [`ScoringError::Initialization`].
    pub fn load(variant: EncoderVariant, config: HttpEncoderConfig) -> Result<Self> {
        let init_err = |reason: String| ScoringError::Initialization { variant, reason };

        if config.model.trim().is_empty() {
            return Err(init_err("missing model name".into()));
        }
        let base_url = config.base_url.trim();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(init_err(format!(
                "endpoint must be an http(s) URL, got {base_url:?}"
            )));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(key) = config.api_key.as_deref().map(str::trim) {
            if !key.is_empty() {
                let auth = HeaderValue::from_str(&format!("Bearer {key}"))
                    .map_err(|_| init_err("invalid API key".into()))?;
                headers.insert(AUTHORIZATION, auth);
            }
        }
        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .map_err(|err| init_err(format!("failed to build HTTP client: {err}")))?;

        let mut encoder = Self {
            client,
            endpoint: format!("{}/embeddings", base_url.trim_end_matches('/')),
            model: config.model.trim().to_string(),
            variant,
            dimension: 0,
            max_retries: config.max_retries.max(1),
            batch_size: config.batch_size.max(1),
        };

        let probe = encoder
            .embed_batch(&[PROBE_TEXT])
            .map_err(|err| init_err(err.to_string()))?;
        let dimension = probe.first().map(Vec::len).unwrap_or(0);
        if dimension == 0 {
            return Err(init_err("encoder returned an empty probe vector".into()));
        }
        encoder.dimension = dimension;
        debug!(%variant, model = %encoder.model, dimension, "encoder probe succeeded");
        Ok(encoder)
    }

    /// Model identifier this encoder requests.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Maximum batch size configured for this client.
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    fn embed_batch(&self, inputs: &[&str]) -> Result<Vec<EmbeddingVector>> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }

        let mut attempt = 0usize;
        loop {
            let request = EmbeddingRequest {
                model: &self.model,
                input: inputs,
            };
            let response = self.client.post(&self.endpoint).json(&request).send();
            match response {
                Ok(resp) => {
                    let status = resp.status();
                    if status.is_success() {
                        let parsed: EmbeddingResponse = resp.json().map_err(|err| {
                            ScoringError::Embedding(format!(
                                "failed to parse embedding response: {err}"
                            ))
                        })?;
                        return parsed.into_vectors(inputs.len());
                    }

                    let body = resp
                        .text()
                        .unwrap_or_else(|_| "<body unavailable>".to_string());
                    if should_retry(status) && attempt + 1 < self.max_retries {
                        attempt += 1;
                        warn!(%status, attempt, "embedding request rejected, retrying");
                        thread::sleep(retry_backoff(attempt));
                        continue;
                    }
                    return Err(ScoringError::Embedding(format!(
                        "embedding request failed ({status}): {body}"
                    )));
                }
                Err(err) => {
                    if is_retryable_error(&err) && attempt + 1 < self.max_retries {
                        attempt += 1;
                        warn!(error = %err, attempt, "embedding request errored, retrying");
                        thread::sleep(retry_backoff(attempt));
                        continue;
                    }
                    return Err(ScoringError::Embedding(err.to_string()));
                }
            }
        }
    }
}

impl Encoder for HttpEncoder {
    fn embed(&self, texts: &[&str]) -> Result<Vec<EmbeddingVector>> {
        let mut vectors = Vec::with_capacity(texts.len());
        for chunk in texts.chunks(self.batch_size) {
            vectors.extend(self.embed_batch(chunk)?);
        }
        Ok(vectors)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn variant(&self) -> EncoderVariant {
        self.variant
    }
}

fn should_retry(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

fn is_retryable_error(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect() || err.is_body() || err.is_request()
}

fn retry_backoff(attempt: usize) -> Duration {
    let capped = attempt.min(5) as u32;
    Duration::from_millis(250 * (1 << capped))
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

impl EmbeddingResponse {
    fn into_vectors(mut self, expected_len: usize) -> Result<Vec<EmbeddingVector>> {
        if self.data.len() != expected_len {
            return Err(ScoringError::Embedding(format!(
                "service returned {} embeddings for {} inputs",
                self.data.len(),
                expected_len
            )));
        }
        self.data.sort_by_key(|entry| entry.index);
        if let Some((position, entry)) = self
            .data
            .iter()
            .enumerate()
            .find(|(position, entry)| entry.index != *position)
        {
            return Err(ScoringError::Embedding(format!(
                "service returned index {} where {position} was expected",
                entry.index
            )));
        }
        Ok(self.data.into_iter().map(|entry| entry.embedding).collect())
    }
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::{TcpListener, TcpStream};
    use std::sync::{Arc, Mutex};

    type SeenInputs = Arc<Mutex<Vec<Vec<String>>>>;

    /// Serves `requests` canned `/embeddings` responses, one per connection.
    /// Each text embeds as `[len, 1, 0]`; entries come back in reverse order.
    fn serve(requests: usize) -> (String, SeenInputs, thread::JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let seen: SeenInputs = Arc::default();
        let log = Arc::clone(&seen);
        let handle = thread::spawn(move || {
            for stream in listener.incoming().take(requests) {
                let mut stream = stream.unwrap();
                let body = read_body(&stream);
                let request: serde_json::Value = serde_json::from_slice(&body).unwrap();
                let inputs: Vec<String> = request["input"]
                    .as_array()
                    .unwrap()
                    .iter()
                    .map(|text| text.as_str().unwrap().to_string())
                    .collect();
                let data: Vec<serde_json::Value> = inputs
                    .iter()
                    .enumerate()
                    .rev()
                    .map(|(index, text)| {
                        serde_json::json!({"embedding": [text.len() as f32, 1.0, 0.0], "index": index})
                    })
                    .collect();
                let payload = serde_json::json!({ "data": data }).to_string();
                write!(
                    stream,
                    "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    payload.len(),
                    payload
                )
                .unwrap();
                log.lock().unwrap().push(inputs);
            }
        });
        (format!("http://{addr}/v1"), seen, handle)
    }

    fn read_body(stream: &TcpStream) -> Vec<u8> {
        let mut reader = BufReader::new(stream);
        let mut content_length = 0;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            let line = line.trim_end();
            if line.is_empty() {
                break;
            }
            if let Some((name, value)) = line.split_once(':') {
                if name.eq_ignore_ascii_case("content-length") {
                    content_length = value.trim().parse().unwrap();
                }
            }
        }
        let mut body = vec![0; content_length];
        reader.read_exact(&mut body).unwrap();
        body
    }

    #[test]
    fn load_probes_then_embeds_in_batch_sized_requests() {
        let (base_url, seen, server) = serve(4);
        let mut settings = config(&base_url);
        settings.batch_size = 2;

        let encoder = HttpEncoder::load(EncoderVariant::Transformer, settings).unwrap();
        assert_eq!(encoder.dimension(), 3);

        let vectors = encoder
            .embed(&["a", "bb", "ccc", "dddd", "eeeee"])
            .unwrap();
        server.join().unwrap();

        let lengths: Vec<f32> = vectors.iter().map(|vector| vector[0]).collect();
        assert_eq!(lengths, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        let batch_sizes: Vec<usize> = seen.lock().unwrap().iter().map(Vec::len).collect();
        assert_eq!(batch_sizes, vec![1, 2, 2, 1]);
        assert_eq!(seen.lock().unwrap()[0], vec![PROBE_TEXT.to_string()]);
    }

    #[test]
    fn duplicate_or_out_of_range_indices_are_rejected() {
        for payload in [
            r#"{"data":[{"embedding":[1.0],"index":0},{"embedding":[2.0],"index":0}]}"#,
            r#"{"data":[{"embedding":[1.0],"index":0},{"embedding":[2.0],"index":2}]}"#,
        ] {
            let parsed: EmbeddingResponse = serde_json::from_str(payload).unwrap();
            assert!(
                matches!(parsed.into_vectors(2), Err(ScoringError::Embedding(_))),
                "{payload}"
            );
        }
    }

    fn config(base_url: &str) -> HttpEncoderConfig {
        HttpEncoderConfig {
            base_url: base_url.to_string(),
            api_key: None,
            model: "universal-sentence-encoder/4".to_string(),
            timeout: Duration::from_secs(1),
            max_retries: 1,
            batch_size: 8,
        }
    }

    #[test]
    fn response_entries_are_reordered_by_index() {
        let payload = r#"{"data":[
            {"embedding":[0.0,1.0],"index":1},
            {"embedding":[1.0,0.0],"index":0}
        ]}"#;
        let parsed: EmbeddingResponse = serde_json::from_str(payload).unwrap();
        let vectors = parsed.into_vectors(2).unwrap();
        assert_eq!(vectors, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
    }

    #[test]
    fn response_length_mismatch_is_rejected() {
        let payload = r#"{"data":[{"embedding":[1.0],"index":0}]}"#;
        let parsed: EmbeddingResponse = serde_json::from_str(payload).unwrap();
        assert!(matches!(
            parsed.into_vectors(3),
            Err(ScoringError::Embedding(_))
        ));
    }

    #[test]
    fn request_serializes_model_and_inputs() {
        let inputs = ["kucing lucu", ""];
        let request = EmbeddingRequest {
            model: "m",
            input: &inputs,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json, serde_json::json!({"model": "m", "input": ["kucing lucu", ""]}));
    }

    #[test]
    fn non_http_endpoint_fails_initialization() {
        let err = HttpEncoder::load(EncoderVariant::Transformer, config("ftp://example.com"))
            .unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn unreachable_endpoint_fails_initialization() {
        // Port 9 (discard) on loopback is closed in test environments.
        let err = HttpEncoder::load(
            EncoderVariant::DeepAveragingNetwork,
            config("http://127.0.0.1:9/v1"),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ScoringError::Initialization {
                variant: EncoderVariant::DeepAveragingNetwork,
                ..
            }
        ));
    }

    #[test]
    fn backoff_is_capped() {
        assert_eq!(retry_backoff(1), Duration::from_millis(500));
        assert_eq!(retry_backoff(5), retry_backoff(50));
    }
}
