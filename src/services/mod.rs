//! Service layer: game flow, arbitration, fan-out, and supporting services.

/// OpenAPI documentation generation.
pub mod documentation;
/// Client-facing event fan-out.
pub mod game_events;
/// Game lifecycle and the round loop.
pub mod game_service;
/// Health check service.
pub mod health_service;
/// Read-only session snapshots.
pub mod public_service;
/// Per-round countdown timer.
pub mod round_timer;
/// Best-effort score persistence.
pub mod score_service;
/// Submission validation and scoring arbitration.
pub mod submission_service;
/// WebSocket connection and message handling service.
pub mod websocket_service;

#[cfg(test)]
pub(crate) mod test_support;
