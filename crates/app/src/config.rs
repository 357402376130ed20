//! Environment-driven configuration.

/// Runtime configuration for a session.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the order-management service.
    pub api_url: String,
    /// Bearer token for authenticated requests, if the deployment needs one.
    pub token: Option<String>,
}

impl AppConfig {
    /// Read configuration from `STOCKFLOW_API_URL` / `STOCKFLOW_TOKEN`.
    pub fn from_env() -> Self {
        let api_url = std::env::var("STOCKFLOW_API_URL").unwrap_or_else(|_| {
            tracing::warn!("STOCKFLOW_API_URL not set; using http://localhost:8080");
            "http://localhost:8080".to_string()
        });
        let token = std::env::var("STOCKFLOW_TOKEN").ok();

        Self { api_url, token }
    }
}
