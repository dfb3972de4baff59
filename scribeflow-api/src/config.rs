/// Configuration management for the API server
///
/// Configuration is loaded from the environment exactly once at startup into
/// an immutable value that is passed by reference to every component; there
/// is no lazy global and no lookup-on-first-access indirection.
///
/// # Environment Variables
///
/// - `API_HOST` / `API_PORT`: bind address (default 0.0.0.0:8080)
/// - `APP_ENV`: environment label for logs (default "development")
/// - `DATABASE_URL`: PostgreSQL connection string (optional — see below)
/// - `DATABASE_MAX_CONNECTIONS`: pool size (default 10)
/// - `JWT_SECRET`: token signing secret, at least 32 bytes (optional)
/// - `TOKEN_TTL_MINUTES`: bearer token lifetime (default 60)
/// - `GEMINI_API_KEY` / `GEMINI_MODEL`: model provider credentials
/// - `UNSPLASH_ACCESS_KEY`: image provider key
/// - `MAX_CONTENT_LENGTH`: extraction cap in characters (default 10000)
/// - `REQUEST_TIMEOUT_SECONDS`: per-stage external call bound (default 30)
/// - `CORS_ALLOWED_ORIGINS`: comma-separated origins, or `*`
///
/// A missing `DATABASE_URL` or `JWT_SECRET` does not fail startup: the
/// routes that need them answer `503` until the variable is provided. A
/// *present but undersized* secret is a configuration error and does fail.

use serde::{Deserialize, Serialize};
use std::env;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Database configuration, absent when `DATABASE_URL` is not set
    pub database: Option<DatabaseSettings>,

    /// Token configuration, absent when `JWT_SECRET` is not set
    pub auth: Option<AuthConfig>,

    /// Model provider configuration
    pub generator: GeneratorConfig,

    /// Image provider configuration
    pub images: ImageConfig,

    /// Pipeline limits
    pub limits: LimitsConfig,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Environment label ("development", "production")
    pub app_env: String,

    /// Allowed CORS origins; `["*"]` means permissive
    pub cors_origins: Vec<String>,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of pooled connections
    pub max_connections: u32,
}

/// Token configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for token signing
    ///
    /// Rotating this invalidates every outstanding token immediately.
    pub jwt_secret: String,

    /// Bearer token lifetime in minutes
    pub token_ttl_minutes: i64,
}

/// Model provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Provider API key (empty means generation will fail at call time)
    pub api_key: String,

    /// Model name
    pub model: String,
}

/// Image provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageConfig {
    /// Unsplash access key (empty disables the degradable image stage)
    pub access_key: String,
}

/// Pipeline limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Maximum characters of extracted text fed to analysis
    pub max_content_length: usize,

    /// Per-stage bound on external calls, in seconds
    pub request_timeout_seconds: u64,
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error only for values that are present but invalid (an
    /// unparseable port, a too-short secret). Absent optional values degrade
    /// instead of failing.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("API_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()?;
        let app_env = env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let cors_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let database = match env::var("DATABASE_URL") {
            Ok(url) if !url.is_empty() => Some(DatabaseSettings {
                url,
                max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse::<u32>()?,
            }),
            _ => None,
        };

        let auth = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => {
                if secret.len() < 32 {
                    anyhow::bail!("JWT_SECRET must be at least 32 characters long");
                }
                Some(AuthConfig {
                    jwt_secret: secret,
                    token_ttl_minutes: env::var("TOKEN_TTL_MINUTES")
                        .unwrap_or_else(|_| "60".to_string())
                        .parse::<i64>()?,
                })
            }
            _ => None,
        };

        let generator = GeneratorConfig {
            api_key: env::var("GEMINI_API_KEY").unwrap_or_default(),
            model: env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| "gemini-3-flash-preview".to_string()),
        };

        let images = ImageConfig {
            access_key: env::var("UNSPLASH_ACCESS_KEY").unwrap_or_default(),
        };

        let limits = LimitsConfig {
            max_content_length: env::var("MAX_CONTENT_LENGTH")
                .unwrap_or_else(|_| "10000".to_string())
                .parse::<usize>()?,
            request_timeout_seconds: env::var("REQUEST_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| "30".to_string())
                .parse::<u64>()?,
        };

        Ok(Self {
            api: ApiConfig {
                host,
                port,
                app_env,
                cors_origins,
            },
            database,
            auth,
            generator,
            images,
            limits,
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_config() -> Config {
        Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                app_env: "test".to_string(),
                cors_origins: vec!["*".to_string()],
            },
            database: None,
            auth: None,
            generator: GeneratorConfig {
                api_key: String::new(),
                model: "gemini-test".to_string(),
            },
            images: ImageConfig {
                access_key: String::new(),
            },
            limits: LimitsConfig {
                max_content_length: 10_000,
                request_timeout_seconds: 30,
            },
        }
    }

    #[test]
    fn test_bind_address() {
        assert_eq!(minimal_config().bind_address(), "127.0.0.1:8080");
    }

    #[test]
    fn test_missing_secrets_leave_sections_unset() {
        let config = minimal_config();
        assert!(config.database.is_none());
        assert!(config.auth.is_none());
    }
}
