pub mod chat;
pub mod config;
pub mod data;
pub mod dice;
pub mod error;
pub mod handlers;
pub mod state;

use axum::{
    http::Method,
    routing::{get, post},
    Router,
};
use crate::config::Config;
use crate::dice::{SeededRoller, SharedRoller};
use crate::handlers::{rest, ws};
use crate::state::{AppState, ChannelSessionManager};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::{DefaultMakeSpan, TraceLayer},
};

pub fn create_app(config: Config) -> Router {
    let seed = config.dice.seed.unwrap_or_else(dice::roller::time_seed);
    tracing::info!(seed, "Seeding shared dice roller");

    let state = Arc::new(AppState {
        roller: SharedRoller::new(SeededRoller::new(seed)),
        session_manager: ChannelSessionManager::default(),
        config: Arc::new(config),
    });

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_origin(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/pool", post(rest::pool_handler))
        .route("/roll", post(rest::roll_handler))
        .route("/ws/channel/{id}", get(ws::websocket_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default().include_headers(true)))
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, DiceConfig, LoggingConfig, ServerConfig};
    use crate::data::RollResponse;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use tower::ServiceExt;

    fn test_config(seed: Option<u64>) -> Config {
        Config {
            server: ServerConfig { addr: "0.0.0.0:0".to_string() },
            logging: LoggingConfig { level: "info".to_string() },
            dice: DiceConfig { seed, ..DiceConfig::default() },
        }
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_create_app_initialization() {
        let app = create_app(test_config(None));
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"OK");
    }

    #[tokio::test]
    async fn test_pool_route() {
        let app = create_app(test_config(None));
        let response = app.oneshot(post_json("/pool", r#"{"notation":"3s1l"}"#)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["skilled"].as_array().unwrap().len(), 3);
        assert_eq!(json["unskilled"].as_array().unwrap().len(), 0);
        assert_eq!(json["lucky"].as_array().unwrap().len(), 1);
        assert_eq!(json["unlucky"].as_array().unwrap().len(), 2);
        assert_eq!(json["skilled"][0]["kind"], "skilled");
    }

    #[tokio::test]
    async fn test_roll_route_is_reproducible_with_fixed_seed() {
        let mut outcomes = vec![];
        for _ in 0..2 {
            let app = create_app(test_config(Some(0)));
            let response = app.oneshot(post_json("/roll", r#"{"notation":"1s1l"}"#)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);

            let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let parsed: RollResponse = serde_json::from_slice(&body).unwrap();
            outcomes.push(parsed.results);
        }

        assert_eq!(outcomes[0], outcomes[1]);
    }

    #[tokio::test]
    async fn test_roll_route_rejects_oversized_pool() {
        let app = create_app(test_config(None));
        let response = app.oneshot(post_json("/roll", r#"{"notation":"4s0l"}"#)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"], "the number of skilled dice, 4, exceeds the maximum of 3");
    }
}
