use std::env;

/// AppConfig
///
/// Holds the application's entire configuration state. This struct is designed
/// to be immutable once loaded, ensuring consistency across all threads and
/// services. It is pulled into the application state via FromRef.
#[derive(Clone)]
pub struct AppConfig {
    // Base URL of the external identity provider's REST API.
    pub provider_base_url: String,
    // Server-side API key used for the provider's profile-fetch endpoint.
    pub provider_api_key: String,
    // Address the HTTP server binds to.
    pub bind_addr: String,
    // Runtime environment marker. Controls the logging format and fail-fast rules.
    pub env: Env,
}

/// Env
///
/// Defines the runtime context, used to switch between development defaults
/// and secure, production-grade configuration requirements.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

impl Default for AppConfig {
    /// default
    ///
    /// Provides a safe, non-panicking AppConfig instance primarily used for
    /// test setup. This allows tests to build application state without
    /// setting environment variables.
    fn default() -> Self {
        Self {
            provider_base_url: "http://localhost:4000".to_string(),
            provider_api_key: "test-api-key".to_string(),
            bind_addr: "127.0.0.1:3000".to_string(),
            env: Env::Local,
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// The canonical function for initializing the application configuration
    /// at startup. Reads all parameters from environment variables and
    /// implements the **fail-fast** principle.
    ///
    /// # Panics
    /// Panics if a critical environment variable required for the current
    /// runtime environment (especially Production) is not set. This prevents
    /// the application from starting with an incomplete or insecure
    /// configuration.
    pub fn load() -> Self {
        let env_str = env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());
        let env = match env_str.as_str() {
            "production" => Env::Production,
            _ => Env::Local,
        };

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        match env {
            Env::Local => Self {
                env: Env::Local,
                // Local development talks to a provider stub unless told otherwise.
                provider_base_url: env::var("IDENTITY_PROVIDER_URL")
                    .unwrap_or_else(|_| "http://localhost:4000".to_string()),
                provider_api_key: env::var("IDENTITY_PROVIDER_API_KEY")
                    .unwrap_or_else(|_| "test-api-key".to_string()),
                bind_addr,
            },
            Env::Production => Self {
                env: Env::Production,
                // Production demands explicit settings for the provider integration.
                provider_base_url: env::var("IDENTITY_PROVIDER_URL")
                    .expect("FATAL: IDENTITY_PROVIDER_URL required in prod"),
                provider_api_key: env::var("IDENTITY_PROVIDER_API_KEY")
                    .expect("FATAL: IDENTITY_PROVIDER_API_KEY required in prod"),
                bind_addr,
            },
        }
    }
}
