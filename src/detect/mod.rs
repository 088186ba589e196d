//! Object-detection collaborator boundary.
//!
//! The session engine only depends on this abstract contract; the actual
//! recognition model lives behind it (an HTTP inference sidecar in the
//! default build).

#[cfg(feature = "http-detector")]
pub mod http;

use std::error::Error;

use futures::future::BoxFuture;
use thiserror::Error;

/// Result alias for detection operations.
pub type DetectResult<T> = Result<T, DetectError>;

/// Error raised by detector backends regardless of the underlying model.
#[derive(Debug, Error)]
pub enum DetectError {
    /// The backend could not be reached or failed internally.
    #[error("detector unavailable: {message}")]
    Unavailable {
        /// Human-readable description of the failure.
        message: String,
        /// Underlying backend failure.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// The backend answered with something that is not a detection result.
    #[error("detector returned an invalid response: {0}")]
    InvalidResponse(String),
}

impl DetectError {
    /// Construct an unavailable error from any backend failure.
    pub fn unavailable(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        DetectError::Unavailable {
            message,
            source: Box::new(source),
        }
    }
}

/// Undecoded image evidence exactly as submitted by a client
/// (a base64 data URL). Decoding and orientation fixes are the detector
/// backend's problem.
#[derive(Debug, Clone)]
pub struct ImagePayload(String);

impl ImagePayload {
    /// Wrap a raw submission payload.
    pub fn new(raw: String) -> Self {
        Self(raw)
    }

    /// The raw payload string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ImagePayload {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

/// Abstraction over the object-recognition capability.
///
/// `detect` returns the set of labels seen in the image, deduplicated and in
/// detection order. No latency bound is guaranteed; callers must not hold any
/// lock across the call.
pub trait ObjectDetector: Send + Sync {
    /// Run detection over one submitted image.
    fn detect(&self, image: &ImagePayload) -> BoxFuture<'static, DetectResult<Vec<String>>>;
}
