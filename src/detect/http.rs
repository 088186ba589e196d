//! HTTP detector backend talking to an inference sidecar.

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

use super::{DetectError, DetectResult, ImagePayload, ObjectDetector};

/// Default sidecar endpoint when `DETECTOR_URL` is not set.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:5003/detect";

/// Detector backed by an HTTP inference service.
///
/// The sidecar accepts the submitted data URL as-is and owns image decoding,
/// orientation normalization, and the confidence threshold.
pub struct HttpDetector {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpDetector {
    /// Create a detector pointing at the given endpoint.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct DetectRequest {
    image: String,
}

#[derive(Debug, Deserialize)]
struct DetectResponse {
    labels: Vec<String>,
}

impl ObjectDetector for HttpDetector {
    fn detect(&self, image: &ImagePayload) -> BoxFuture<'static, DetectResult<Vec<String>>> {
        let client = self.client.clone();
        let endpoint = self.endpoint.clone();
        let body = DetectRequest {
            image: image.as_str().to_owned(),
        };

        Box::pin(async move {
            let response = client
                .post(&endpoint)
                .json(&body)
                .send()
                .await
                .map_err(|err| {
                    DetectError::unavailable(format!("request to `{endpoint}` failed"), err)
                })?
                .error_for_status()
                .map_err(|err| {
                    DetectError::unavailable(format!("`{endpoint}` answered with an error"), err)
                })?;

            let payload: DetectResponse = response
                .json()
                .await
                .map_err(|err| DetectError::InvalidResponse(err.to_string()))?;

            let mut labels = Vec::new();
            for label in payload.labels {
                if !labels.contains(&label) {
                    labels.push(label);
                }
            }
            Ok(labels)
        })
    }
}
