/// Application state and router builder
///
/// The shared state holds the immutable configuration, the store adapter
/// handles (absent when persistence is unconfigured — the affected routes
/// answer 503), and the pipeline orchestrator with its injected stage
/// collaborators. Everything is constructed once at startup; request
/// handlers only read.
///
/// # Router layout
///
/// ```text
/// /
/// ├── GET  /                    # Service info (public)
/// ├── GET  /health              # Liveness + store connectivity (public)
/// ├── POST /estimate-cost       # Model cost estimate (public)
/// ├── /auth/
/// │   ├── POST /register        # Create account (public)
/// │   ├── POST /login           # Issue bearer token (public)
/// │   ├── POST /logout          # Audit logout (bearer)
/// │   ├── GET  /me              # Current identity claims (bearer)
/// │   └── GET  /history         # Audit trail, newest first (bearer)
/// ├── POST /generate-blog       # Run the generation pipeline (bearer)
/// └── GET  /blogs/:id           # Fetch an owned artifact (bearer)
/// ```

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::config::Config;
use crate::error::ApiError;
use scribeflow_pipeline::orchestrator::{PipelineConfig, PipelineOrchestrator};
use scribeflow_pipeline::stages::{ArticleGenerator, ContentExtractor, ImageFetcher};
use scribeflow_shared::auth::middleware::bearer_auth_middleware;
use scribeflow_shared::store::{ArtifactStore, AuditStore, CredentialStore};

/// Store adapter handles, bundled so they configure (or degrade) together
#[derive(Clone)]
pub struct Stores {
    /// User records
    pub users: Arc<dyn CredentialStore>,

    /// Append-only audit trail
    pub audit: Arc<dyn AuditStore>,

    /// Generated artifacts
    pub artifacts: Arc<dyn ArtifactStore>,
}

/// Shared application state
///
/// Cloned per request via axum's `State` extractor; `Arc`s inside keep the
/// clone cheap.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<Config>,

    /// Store adapters; `None` until persistence is configured
    pub stores: Option<Stores>,

    /// Pipeline orchestrator; present iff stores are
    pub pipeline: Option<Arc<PipelineOrchestrator>>,

    /// Generator handle for cost estimation and info endpoints
    pub generator: Arc<dyn ArticleGenerator>,
}

impl AppState {
    /// Creates application state, wiring the orchestrator when stores exist
    pub fn new(
        config: Config,
        stores: Option<Stores>,
        extractor: Arc<dyn ContentExtractor>,
        generator: Arc<dyn ArticleGenerator>,
        images: Arc<dyn ImageFetcher>,
    ) -> Self {
        let pipeline = stores.as_ref().map(|s| {
            Arc::new(PipelineOrchestrator::with_config(
                extractor.clone(),
                generator.clone(),
                images.clone(),
                s.artifacts.clone(),
                s.audit.clone(),
                PipelineConfig {
                    stage_timeout: Duration::from_secs(config.limits.request_timeout_seconds),
                    section_image_count: 3,
                },
            ))
        });

        Self {
            config: Arc::new(config),
            stores,
            pipeline,
            generator,
        }
    }

    /// Store handles, or 503 when persistence is unconfigured
    pub fn stores(&self) -> Result<&Stores, ApiError> {
        self.stores.as_ref().ok_or_else(|| {
            ApiError::ServiceUnavailable("Persistent storage is not configured".to_string())
        })
    }

    /// Pipeline orchestrator, or 503 when persistence is unconfigured
    pub fn pipeline(&self) -> Result<&Arc<PipelineOrchestrator>, ApiError> {
        self.pipeline.as_ref().ok_or_else(|| {
            ApiError::ServiceUnavailable("Persistent storage is not configured".to_string())
        })
    }

    /// Token configuration, or 503 when the signing secret is unconfigured
    pub fn auth_config(&self) -> Result<&crate::config::AuthConfig, ApiError> {
        self.config.auth.as_ref().ok_or_else(|| {
            ApiError::ServiceUnavailable("Authentication is not configured".to_string())
        })
    }
}

/// Builds the complete axum router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Public routes
    let public_routes = Router::new()
        .route("/", get(routes::health::root))
        .route("/health", get(routes::health::health_check))
        .route("/estimate-cost", post(routes::generate::estimate_cost));

    // Auth routes without bearer protection
    let auth_public = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login));

    // Auth routes behind the identity middleware
    let auth_protected = Router::new()
        .route("/logout", post(routes::auth::logout))
        .route("/me", get(routes::auth::me))
        .route("/history", get(routes::auth::history))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            bearer_auth_layer,
        ));

    // Pipeline routes (bearer-protected)
    let pipeline_routes = Router::new()
        .route("/generate-blog", post(routes::generate::generate_blog))
        .route("/blogs/:id", get(routes::blogs::get_blog))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            bearer_auth_layer,
        ));

    let cors = build_cors_layer(&state.config);

    Router::new()
        .merge(public_routes)
        .nest("/auth", auth_public.merge(auth_protected))
        .merge(pipeline_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// Configures CORS from the allowed-origin list
fn build_cors_layer(config: &Config) -> CorsLayer {
    if config.api.cors_origins.contains(&"*".to_string()) {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(Duration::from_secs(3600))
    }
}

/// Identity middleware layer
///
/// Answers 503 while the signing secret is unconfigured; otherwise
/// delegates to the shared bearer middleware, which injects `Identity` into
/// request extensions or rejects with one uniform 401.
async fn bearer_auth_layer(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let auth = match state.auth_config() {
        Ok(auth) => auth,
        Err(e) => return e.into_response(),
    };

    match bearer_auth_middleware(auth.jwt_secret.clone(), req, next).await {
        Ok(response) => response,
        Err(e) => e.into_response(),
    }
}
