/// Common test utilities for integration tests
///
/// Builds the full router against in-memory stores and mock stage
/// collaborators, so the suites exercise the real HTTP surface — routing,
/// middleware, error mapping — without a database or network.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt as _;

use scribeflow_api::app::{build_router, AppState, Stores};
use scribeflow_api::config::{
    ApiConfig, AuthConfig, Config, GeneratorConfig, ImageConfig, LimitsConfig,
};
use scribeflow_pipeline::stages::mock::{MockExtractor, MockGenerator, MockImageFetcher};
use scribeflow_shared::store::memory::MemoryStore;

/// Signing secret used by every test context
pub const TEST_SECRET: &str = "integration-test-secret-at-least-32-bytes";

/// Test context containing the app and handles to its collaborators
pub struct TestContext {
    pub app: Router,
    pub store: Arc<MemoryStore>,
    pub extractor: Arc<MockExtractor>,
    pub generator: Arc<MockGenerator>,
    pub images: Arc<MockImageFetcher>,
}

/// Base configuration for tests (auth on, database section unused)
pub fn test_config() -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            app_env: "test".to_string(),
            cors_origins: vec!["*".to_string()],
        },
        database: None,
        auth: Some(AuthConfig {
            jwt_secret: TEST_SECRET.to_string(),
            token_ttl_minutes: 60,
        }),
        generator: GeneratorConfig {
            api_key: String::new(),
            model: "mock-model".to_string(),
        },
        images: ImageConfig {
            access_key: String::new(),
        },
        limits: LimitsConfig {
            max_content_length: 10_000,
            request_timeout_seconds: 5,
        },
    }
}

impl TestContext {
    /// Context with all collaborators succeeding
    pub fn new() -> Self {
        Self::with_collaborators(
            MockExtractor::new(),
            MockGenerator::new(),
            MockImageFetcher::new(),
            test_config(),
        )
    }

    /// Context with specific collaborator behavior
    pub fn with_collaborators(
        extractor: MockExtractor,
        generator: MockGenerator,
        images: MockImageFetcher,
        config: Config,
    ) -> Self {
        let extractor = Arc::new(extractor);
        let generator = Arc::new(generator);
        let images = Arc::new(images);
        let store = Arc::new(MemoryStore::new());

        let stores = Stores {
            users: store.clone(),
            audit: store.clone(),
            artifacts: store.clone(),
        };

        let state = AppState::new(
            config,
            Some(stores),
            extractor.clone(),
            generator.clone(),
            images.clone(),
        );

        TestContext {
            app: build_router(state),
            store,
            extractor,
            generator,
            images,
        }
    }

    /// Context with persistence left unconfigured (store routes answer 503)
    pub fn without_stores() -> Self {
        let extractor = Arc::new(MockExtractor::new());
        let generator = Arc::new(MockGenerator::new());
        let images = Arc::new(MockImageFetcher::new());
        let store = Arc::new(MemoryStore::new());

        let state = AppState::new(
            test_config(),
            None,
            extractor.clone(),
            generator.clone(),
            images.clone(),
        );

        TestContext {
            app: build_router(state),
            store,
            extractor,
            generator,
            images,
        }
    }

    /// Context with the signing secret left unconfigured
    pub fn without_auth() -> Self {
        let mut config = test_config();
        config.auth = None;
        Self::with_collaborators(
            MockExtractor::new(),
            MockGenerator::new(),
            MockImageFetcher::new(),
            config,
        )
    }

    /// Sends one request and returns (status, parsed JSON body)
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        (status, body)
    }

    /// Registers an account, asserting success
    pub async fn register(&self, email: &str, secret: &str) -> Value {
        let (status, body) = self
            .request(
                "POST",
                "/auth/register",
                None,
                Some(json!({ "email": email, "secret": secret })),
            )
            .await;

        assert_eq!(status, StatusCode::OK, "register failed: {}", body);
        body
    }

    /// Logs in, asserting success, and returns the bearer token
    pub async fn login(&self, email: &str, secret: &str) -> String {
        let (status, body) = self
            .request(
                "POST",
                "/auth/login",
                None,
                Some(json!({ "email": email, "secret": secret })),
            )
            .await;

        assert_eq!(status, StatusCode::OK, "login failed: {}", body);
        body["access_token"].as_str().unwrap().to_string()
    }
}
