//! Run client calls off the caller's task and deliver one outcome

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tracing::debug;

use crate::endpoint::ServerEndpoint;
use crate::error::{ClientError, Result};
use crate::model::{InferenceClient, ModelDescriptor};
use crate::payload::ImagePayload;

/// Receives the single terminal outcome of a spawned call
#[derive(Debug)]
pub struct PendingCall<T> {
    rx: oneshot::Receiver<Result<T>>,
}

impl<T> PendingCall<T> {
    /// Wait for the outcome
    ///
    /// If the worker was torn down before finishing (runtime shutdown or a
    /// panic), this reports `Unreachable` rather than hanging.
    pub async fn wait(self) -> Result<T> {
        self.rx.await.unwrap_or_else(|_| {
            Err(ClientError::Unreachable {
                description: "Request worker stopped before completing".to_string(),
            })
        })
    }

    /// Non-blocking check, for callers that poll from a UI loop
    ///
    /// Returns `None` while the call is still running.
    pub fn try_take(&mut self) -> Option<Result<T>> {
        match self.rx.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => Some(Err(ClientError::Unreachable {
                description: "Request worker stopped before completing".to_string(),
            })),
        }
    }
}

/// Spawn a generate call on the current tokio runtime
///
/// # Arguments
/// * `client` - Client to clone into the task; clones share one HTTP pool
/// * `endpoint` - Server base URL
/// * `model` - Model name as listed by the server
/// * `prompt` - Question text
/// * `image` - Shared payload; repeated calls reuse the same encoded image
/// * `timeout` - Bound on the whole request
///
/// # Returns
/// A handle that yields exactly one outcome. Dropping it does not cancel the
/// request; the result is discarded when it arrives.
pub fn spawn_generate(
    client: &InferenceClient,
    endpoint: ServerEndpoint,
    model: String,
    prompt: String,
    image: Arc<ImagePayload>,
    timeout: Duration,
) -> PendingCall<String> {
    let client = client.clone();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let outcome = client
            .generate(&endpoint, &model, &prompt, &image, timeout)
            .await;
        if tx.send(outcome).is_err() {
            debug!("Generate result dropped: caller stopped waiting");
        }
    });

    PendingCall { rx }
}

/// Spawn a model listing call on the current tokio runtime
pub fn spawn_list_models(
    client: &InferenceClient,
    endpoint: ServerEndpoint,
    timeout: Duration,
) -> PendingCall<Vec<ModelDescriptor>> {
    let client = client.clone();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let outcome = client.list_models(&endpoint, timeout).await;
        if tx.send(outcome).is_err() {
            debug!("Model list dropped: caller stopped waiting");
        }
    });

    PendingCall { rx }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, GrayImage};
    use mockito::Matcher;
    use serde_json::json;

    #[tokio::test]
    async fn test_spawn_generate_delivers_result() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/generate")
            .with_status(200)
            .with_body(r#"{"response":"a gray square"}"#)
            .create_async()
            .await;

        let image = Arc::new(
            ImagePayload::from_image(DynamicImage::ImageLuma8(GrayImage::new(3, 3))).unwrap(),
        );
        let pending = spawn_generate(
            &InferenceClient::new(),
            ServerEndpoint::parse(&server.url()).unwrap(),
            "llava".to_string(),
            "describe".to_string(),
            image,
            Duration::from_secs(5),
        );

        assert_eq!(pending.wait().await.unwrap(), "a gray square");
    }

    #[tokio::test]
    async fn test_spawn_generate_shares_image_across_calls() {
        let image = Arc::new(
            ImagePayload::from_image(DynamicImage::ImageLuma8(GrayImage::new(3, 3))).unwrap(),
        );

        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/generate")
            .match_body(Matcher::PartialJson(json!({ "images": [image.base64()] })))
            .with_status(200)
            .with_body(r#"{"response":"ok"}"#)
            .expect(2)
            .create_async()
            .await;

        let client = InferenceClient::new();
        let endpoint = ServerEndpoint::parse(&server.url()).unwrap();

        let first = spawn_generate(
            &client,
            endpoint.clone(),
            "llava".to_string(),
            "color?".to_string(),
            Arc::clone(&image),
            Duration::from_secs(5),
        );
        let second = spawn_generate(
            &client,
            endpoint,
            "llava".to_string(),
            "shape?".to_string(),
            Arc::clone(&image),
            Duration::from_secs(5),
        );

        assert_eq!(first.wait().await.unwrap(), "ok");
        assert_eq!(second.wait().await.unwrap(), "ok");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_spawn_list_models_delivers_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/tags")
            .with_status(503)
            .with_body("loading")
            .create_async()
            .await;

        let pending = spawn_list_models(
            &InferenceClient::new(),
            ServerEndpoint::parse(&server.url()).unwrap(),
            Duration::from_secs(5),
        );

        assert_eq!(
            pending.wait().await.unwrap_err(),
            ClientError::ServerRejected {
                status: 503,
                body: "loading".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_dropped_sender_reports_unreachable() {
        let (tx, rx) = oneshot::channel::<Result<String>>();
        drop(tx);
        let mut pending = PendingCall { rx };
        assert!(matches!(
            pending.try_take(),
            Some(Err(ClientError::Unreachable { .. }))
        ));
    }

    #[tokio::test]
    async fn test_try_take_is_none_while_running() {
        let (_tx, rx) = oneshot::channel::<Result<String>>();
        let mut pending = PendingCall { rx };
        assert!(pending.try_take().is_none());
    }
}
