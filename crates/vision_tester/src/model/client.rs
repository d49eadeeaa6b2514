//! Client for the inference server's model listing and generate APIs

use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use super::descriptor::{KeywordPredicate, ModelDescriptor, VisionPredicate};
use super::wire::{GenerateRequest, GenerateResponse, TagsResponse};
use crate::config::TIMING_CONFIG;
use crate::endpoint::ServerEndpoint;
use crate::error::{ClientError, Result};
use crate::payload::ImagePayload;

/// Outcome of a successful connection probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionReport {
    pub models: Vec<ModelDescriptor>,
}

impl ConnectionReport {
    /// Models whose names look vision-capable, in server order
    pub fn vision_models(&self) -> impl Iterator<Item = &ModelDescriptor> {
        self.models.iter().filter(|m| m.is_vision_capable)
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

/// Stateless client for a multimodal inference server
///
/// Endpoint, model and timeout are passed into every call; the client only
/// holds a pooled HTTP client and the vision predicate. Cloning is cheap and
/// clones can be used from any task concurrently.
#[derive(Clone)]
pub struct InferenceClient {
    http: reqwest::Client,
    predicate: Arc<dyn VisionPredicate>,
}

impl Default for InferenceClient {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InferenceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceClient").finish_non_exhaustive()
    }
}

impl InferenceClient {
    /// Create a client using the default keyword vision heuristic
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            predicate: Arc::new(KeywordPredicate::default()),
        }
    }

    /// Replace the vision-capability heuristic
    pub fn with_predicate(mut self, predicate: impl VisionPredicate + 'static) -> Self {
        self.predicate = Arc::new(predicate);
        self
    }

    /// List the models the server advertises via `GET /api/tags`
    ///
    /// Entries without a `name` are skipped. Server order is preserved.
    ///
    /// # Arguments
    /// * `endpoint` - Server base URL
    /// * `timeout` - Bound on the whole request
    ///
    /// # Returns
    /// One descriptor per named entry, flagged by the client's vision predicate
    pub async fn list_models(
        &self,
        endpoint: &ServerEndpoint,
        timeout: Duration,
    ) -> Result<Vec<ModelDescriptor>> {
        let url = endpoint.tags_url();
        debug!("Listing models from {}", url);

        let response = self.http.get(&url).timeout(timeout).send().await?;
        let tags: TagsResponse = read_json(response).await?;

        let total = tags.models.len();
        let models: Vec<ModelDescriptor> = tags
            .models
            .into_iter()
            .filter_map(|entry| entry.name)
            .map(|name| ModelDescriptor::with_predicate(name, self.predicate.as_ref()))
            .collect();

        if models.len() < total {
            warn!(
                "Skipped {} model entries without a name",
                total - models.len()
            );
        }
        debug!("Server advertises {} models", models.len());

        Ok(models)
    }

    /// Probe the server with the configured list timeout
    pub async fn check_connection(&self, endpoint: &ServerEndpoint) -> Result<ConnectionReport> {
        let models = self
            .list_models(endpoint, TIMING_CONFIG.list_timeout)
            .await?;
        info!(
            "Connected to {} ({} models, {} likely vision)",
            endpoint,
            models.len(),
            models.iter().filter(|m| m.is_vision_capable).count()
        );
        Ok(ConnectionReport { models })
    }

    /// Ask `model` about `image` via a single non-streaming `POST /api/generate`
    ///
    /// # Arguments
    /// * `endpoint` - Server base URL
    /// * `model` - Model name as listed by the server
    /// * `prompt` - Question text sent verbatim
    /// * `image` - Encoded payload, attached as the single image
    /// * `timeout` - Bound on the whole request, including reading the body
    ///
    /// # Returns
    /// The server's `response` text, or `"No response received"` when a 200
    /// body carries none. Transport failures and timeouts are `Unreachable`,
    /// non-200 statuses are `ServerRejected` and unparseable bodies are
    /// `ProtocolViolation`.
    pub async fn generate(
        &self,
        endpoint: &ServerEndpoint,
        model: &str,
        prompt: &str,
        image: &ImagePayload,
        timeout: Duration,
    ) -> Result<String> {
        let url = endpoint.generate_url();
        let request = GenerateRequest::new(model, prompt, image.base64());

        info!("Sending generate request to {} (model: {})", url, model);
        let start = Instant::now();

        let response = self
            .http
            .post(&url)
            .json(&request)
            .timeout(timeout)
            .send()
            .await?;
        let body: GenerateResponse = read_json(response).await?;

        debug!(
            "Generate completed in {:.3}s",
            start.elapsed().as_secs_f64()
        );

        Ok(body.into_text())
    }
}

/// Read a 200 body as JSON, mapping other statuses to `ServerRejected`
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    let body = response.text().await?;

    if status != StatusCode::OK {
        warn!("Server rejected request with HTTP {}", status.as_u16());
        return Err(ClientError::ServerRejected {
            status: status.as_u16(),
            body,
        });
    }

    serde_json::from_str(&body).map_err(|e| ClientError::ProtocolViolation {
        description: e.to_string(),
    })
}
