//! OpenAPI documentation generation.

use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Neon Hunt Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::public::lobby,
        crate::routes::websocket::ws_handler,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::game::LobbyPlayer,
            crate::dto::game::LobbySnapshot,
            crate::dto::ws::ClientMessage,
            crate::dto::ws::ServerMessage,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "lobby", description = "Read-only session snapshots"),
        (name = "clients", description = "WebSocket operations for game clients"),
    )
)]
pub struct ApiDoc;
