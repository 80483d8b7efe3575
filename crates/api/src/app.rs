use axum::{middleware, routing::get, Router};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{metrics_handler, metrics_middleware, require_admin, trace_id};
use crate::routes::{app_config, feature_flags, health};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
}

pub fn create_app(config: Config, pool: PgPool) -> Router {
    let config = Arc::new(config);

    let state = AppState {
        pool,
        config: config.clone(),
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Admin routes (require admin API key)
    let admin_routes = Router::new()
        .route(
            "/api/v1/admin/feature-flags",
            get(feature_flags::list_flags).post(feature_flags::create_flag),
        )
        .route(
            "/api/v1/admin/feature-flags/:flag_key",
            get(feature_flags::get_flag)
                .patch(feature_flags::update_flag)
                .delete(feature_flags::delete_flag),
        )
        .route("/api/v1/admin/config", get(app_config::list_config))
        .route(
            "/api/v1/admin/config/:config_key",
            get(app_config::get_config)
                .put(app_config::upsert_config)
                .delete(app_config::delete_config),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    // Flag evaluation and resolved config (no authentication required)
    let client_routes = Router::new()
        .route(
            "/api/v1/feature-flags/evaluate",
            get(feature_flags::evaluate_flags),
        )
        .route(
            "/api/v1/feature-flags/:flag_key/evaluate",
            get(feature_flags::evaluate_single_flag),
        )
        .route("/api/v1/config", get(app_config::public_config));

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    Router::new()
        .merge(public_routes)
        .merge(client_routes)
        .merge(admin_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware)) // Prometheus metrics
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id)) // Request ID and logging
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, http::StatusCode};
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    const ADMIN_KEY: &str = "erp_test_admin_key";

    fn test_app(admin_api_key_hash: &str) -> Router {
        let config = Config::load_for_test(&[
            ("database.url", "postgres://nobody@127.0.0.1:1/none"),
            ("security.admin_api_key_hash", admin_api_key_hash),
        ])
        .expect("Failed to load config");
        let pool = PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(200))
            .connect_lazy(&config.database.url)
            .expect("lazy pool");
        create_app(config, pool)
    }

    async fn status_of(app: Router, request: Request<Body>) -> StatusCode {
        app.oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn test_live_does_not_touch_database() {
        let app = test_app("");
        let request = Request::get("/api/health/live").body(Body::empty()).unwrap();
        assert_eq!(status_of(app, request).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_ready_unavailable_without_database() {
        let app = test_app("");
        let request = Request::get("/api/health/ready").body(Body::empty()).unwrap();
        assert_eq!(status_of(app, request).await, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_health_unhealthy_without_database() {
        let app = test_app("");
        let request = Request::get("/api/health").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "unhealthy");
        assert_eq!(json["components"][0]["name"], "database");
    }

    #[tokio::test]
    async fn test_admin_disabled_without_configured_hash() {
        let app = test_app("");
        let request = Request::get("/api/v1/admin/feature-flags")
            .header("X-API-Key", ADMIN_KEY)
            .body(Body::empty())
            .unwrap();
        assert_eq!(status_of(app, request).await, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_admin_requires_key() {
        let hash = shared::crypto::sha256_hex(ADMIN_KEY);
        let request = Request::get("/api/v1/admin/config")
            .body(Body::empty())
            .unwrap();
        assert_eq!(
            status_of(test_app(&hash), request).await,
            StatusCode::UNAUTHORIZED
        );

        let request = Request::delete("/api/v1/admin/feature-flags/new_dashboard")
            .header("X-API-Key", "wrong_key")
            .body(Body::empty())
            .unwrap();
        assert_eq!(
            status_of(test_app(&hash), request).await,
            StatusCode::UNAUTHORIZED
        );
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let app = test_app("");
        let request = Request::get("/api/v1/nope").body(Body::empty()).unwrap();
        assert_eq!(status_of(app, request).await, StatusCode::NOT_FOUND);
    }
}
