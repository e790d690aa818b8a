use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Scraping API error: {0}")]
    ScrapeApi(#[from] ScrapeApiError),

    #[error("Inference error: {0}")]
    Inference(#[from] InferenceError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Chart rendering failed: {message}")]
    ChartRender { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

#[derive(Error, Debug, Clone)]
pub enum ScrapeApiError {
    #[error("Invalid API token")]
    InvalidToken,

    #[error("Actor not found: {actor_id}")]
    ActorNotFound { actor_id: String },

    #[error("Rate limit exceeded. Retry after {retry_after} seconds")]
    RateLimitExceeded { retry_after: u64 },

    #[error("Actor run finished with status {status}")]
    RunFailed { status: String },

    #[error("Actor run did not finish within {seconds} seconds")]
    RunTimedOut { seconds: u64 },

    #[error("Invalid API response: {details}")]
    InvalidResponse { details: String },

    #[error("Server error: {status_code}")]
    ServerError { status_code: u16 },

    #[error("Request timeout")]
    RequestTimeout,
}

#[derive(Error, Debug, Clone)]
pub enum InferenceError {
    #[error("API key invalid or missing")]
    InvalidApiKey,

    #[error("Model not available: {model}")]
    ModelNotAvailable { model: String },

    #[error("Model still loading: {model}")]
    ModelLoading { model: String },

    #[error("Rate limit exceeded. Retry after {retry_after} seconds")]
    RateLimitExceeded { retry_after: u64 },

    #[error("Empty prediction from {model}")]
    EmptyPrediction { model: String },

    #[error("Unknown label from model: {label}")]
    UnknownLabel { label: String },

    #[error("Invalid response format from {model}")]
    InvalidResponseFormat { model: String },

    #[error("Request timeout for {model}")]
    RequestTimeout { model: String },

    #[error("Server error: {status_code}")]
    ServerError { status_code: u16 },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    #[error("Environment variable not set: {var_name}")]
    MissingEnvironmentVariable { var_name: String },

    #[error("Configuration parsing error: {0}")]
    Parse(#[from] toml::de::Error),
}
