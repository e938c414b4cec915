use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use shared::jwt::{JwtConfig, JwtError};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, require_user_auth, security_headers_middleware, trace_id,
    UserAuth,
};
use crate::routes::{auth, health, stones, users};
use crate::services::PhotoStorage;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub jwt: Arc<JwtConfig>,
    pub photos: PhotoStorage,
}

impl AppState {
    pub fn new(config: Config, pool: PgPool) -> Result<Self, JwtError> {
        let jwt = UserAuth::create_jwt_config(&config.jwt)?;
        let photos = PhotoStorage::new(&config.uploads);

        Ok(Self {
            pool,
            config: Arc::new(config),
            jwt: Arc::new(jwt),
            photos,
        })
    }
}

pub fn create_app(state: AppState) -> Router {
    let config = state.config.clone();

    let cors = if config.security.cors_origins.is_empty() {
        // Any origin, for local development
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

    let auth_layer = || middleware::from_fn_with_state(state.clone(), require_user_auth);

    let public_routes = Router::new()
        .route("/", get(health::banner))
        .route("/api/health", get(health::health_check))
        .route("/metrics", get(metrics_handler))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/stones", get(stones::list_stones))
        .route("/api/stones/by-token/:qr_token", get(stones::get_by_token))
        .route("/api/stones/:stone_id", get(stones::get_stone));

    let protected_routes = Router::new()
        .route("/api/me", get(users::get_me))
        .route("/api/stones/activate", post(stones::activate_stone))
        .route_layer(auth_layer());

    // Reading a stone's history is public, adding to it is not.
    let location_routes = Router::new().route(
        "/api/stones/:stone_id/locations",
        get(stones::list_locations)
            .merge(post(stones::report_location).route_layer(auth_layer())),
    );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(location_routes)
        .nest_service(
            config.uploads.public_path.trim_end_matches('/'),
            ServeDir::new(&config.uploads.dir),
        )
        // Global middleware (order matters: bottom layers run first)
        .layer(DefaultBodyLimit::max(config.server.max_body_size))
        .layer(middleware::from_fn_with_state(
            config.security.hsts_enabled,
            security_headers_middleware,
        ))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
