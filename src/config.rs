use std::env;

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub environment: String,
    pub google_api_key: String,
    pub gemini_base_url: String,
    pub analyzer_model: String,
    pub validator_model: String,
    pub safety_block_threshold: String,
    pub otel_service_name: String,
    pub otel_exporter_endpoint: String,
    pub default_temperature: f32,
    pub default_max_tokens: u32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            port: env::var("APP_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("APP_PORT must be a number")?,
            environment: env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            google_api_key: env::var("GOOGLE_API_KEY").context(
                "GOOGLE_API_KEY is not set. Add GOOGLE_API_KEY=<your key> to a .env file \
                 next to the binary or export it in the environment before starting",
            )?,
            gemini_base_url: env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| "https://generativelanguage.googleapis.com/v1beta".to_string()),
            analyzer_model: env::var("ANALYZER_MODEL")
                .unwrap_or_else(|_| "gemini-1.5-flash-latest".to_string()),
            validator_model: env::var("VALIDATOR_MODEL")
                .unwrap_or_else(|_| "gemini-1.5-pro-latest".to_string()),
            safety_block_threshold: env::var("SAFETY_BLOCK_THRESHOLD")
                .unwrap_or_else(|_| "BLOCK_MEDIUM_AND_ABOVE".to_string()),
            otel_service_name: env::var("OTEL_SERVICE_NAME")
                .unwrap_or_else(|_| "scamguard".to_string()),
            otel_exporter_endpoint: env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
                .unwrap_or_else(|_| "http://localhost:4317".to_string()),
            default_temperature: env::var("DEFAULT_TEMPERATURE")
                .unwrap_or_else(|_| "0.3".to_string())
                .parse()
                .context("DEFAULT_TEMPERATURE must be a number")?,
            default_max_tokens: env::var("DEFAULT_MAX_TOKENS")
                .unwrap_or_else(|_| "4096".to_string())
                .parse()
                .context("DEFAULT_MAX_TOKENS must be a number")?,
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
