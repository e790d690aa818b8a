use crate::error::ConfigError;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// Runtime configuration. Values come from the environment, optionally
/// overridden by a TOML file pointed to by `MOODSCOPE_CONFIG`.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// API token for the hosted scraping actor.
    pub apify_token: String,
    /// Actor id of the Instagram post scraper.
    pub actor_id: String,
    /// API token for the hosted inference endpoints.
    pub hf_token: String,
    /// Image-classification model id for facial emotions.
    pub emotion_model: String,
    /// Text-classification model id for comment sentiment.
    pub sentiment_model: String,
    pub port: u16,
    /// Directory for downloaded post images and chart PNGs.
    pub static_dir: PathBuf,
    /// Path of the single JSON report snapshot.
    pub snapshot_path: PathBuf,
    /// Maximum number of posts requested from the actor.
    pub results_limit: u32,
    /// Upper bound on how long to wait for an actor run to finish.
    pub run_wait_secs: u64,
    /// Interval between actor run status polls.
    pub run_poll_secs: u64,
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    apify_token: Option<String>,
    actor_id: Option<String>,
    hf_token: Option<String>,
    emotion_model: Option<String>,
    sentiment_model: Option<String>,
    port: Option<u16>,
    static_dir: Option<PathBuf>,
    snapshot_path: Option<PathBuf>,
    results_limit: Option<u32>,
    run_wait_secs: Option<u64>,
    run_poll_secs: Option<u64>,
}

impl AppConfig {
    pub const DEFAULT_ACTOR_ID: &'static str = "shu8hvrXbJbY3Eb9W";
    pub const DEFAULT_EMOTION_MODEL: &'static str = "ycbq999/facial_emotions_image_detection";
    pub const DEFAULT_SENTIMENT_MODEL: &'static str =
        "distilbert-base-uncased-finetuned-sst-2-english";

    pub fn load() -> Result<Self, ConfigError> {
        match env::var("MOODSCOPE_CONFIG") {
            Ok(path) => {
                debug!("Loading configuration from {path}");
                Self::from_file(Path::new(&path))
            }
            Err(_) => Self::resolve(FileConfig::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        let file: FileConfig = toml::from_str(&raw)?;
        Self::resolve(file)
    }

    /// File values win over the environment; everything but the two API
    /// tokens has a default.
    fn resolve(file: FileConfig) -> Result<Self, ConfigError> {
        let apify_token = required(file.apify_token, "MOODSCOPE_APIFY_TOKEN")?;
        let hf_token = required(file.hf_token, "MOODSCOPE_HF_TOKEN")?;

        Ok(Self {
            apify_token,
            hf_token,
            actor_id: optional(file.actor_id, "MOODSCOPE_ACTOR_ID")
                .unwrap_or_else(|| Self::DEFAULT_ACTOR_ID.to_string()),
            emotion_model: optional(file.emotion_model, "MOODSCOPE_EMOTION_MODEL")
                .unwrap_or_else(|| Self::DEFAULT_EMOTION_MODEL.to_string()),
            sentiment_model: optional(file.sentiment_model, "MOODSCOPE_SENTIMENT_MODEL")
                .unwrap_or_else(|| Self::DEFAULT_SENTIMENT_MODEL.to_string()),
            port: match file.port {
                Some(port) => port,
                None => parse_env("PORT", 3000)?,
            },
            static_dir: file
                .static_dir
                .or_else(|| env::var("MOODSCOPE_STATIC_DIR").ok().map(PathBuf::from))
                .unwrap_or_else(|| PathBuf::from("static")),
            snapshot_path: file
                .snapshot_path
                .or_else(|| env::var("MOODSCOPE_SNAPSHOT_PATH").ok().map(PathBuf::from))
                .unwrap_or_else(|| PathBuf::from("data.json")),
            results_limit: match file.results_limit {
                Some(limit) => limit,
                None => parse_env("MOODSCOPE_RESULTS_LIMIT", 200)?,
            },
            run_wait_secs: match file.run_wait_secs {
                Some(secs) => secs,
                None => parse_env("MOODSCOPE_RUN_WAIT_SECS", 300)?,
            },
            run_poll_secs: match file.run_poll_secs {
                Some(secs) => secs,
                None => parse_env("MOODSCOPE_RUN_POLL_SECS", 5)?,
            },
        })
    }
}

fn required(file_value: Option<String>, var_name: &str) -> Result<String, ConfigError> {
    file_value
        .or_else(|| env::var(var_name).ok())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ConfigError::MissingEnvironmentVariable {
            var_name: var_name.to_string(),
        })
}

fn optional(file_value: Option<String>, var_name: &str) -> Option<String> {
    file_value.or_else(|| env::var(var_name).ok())
}

fn parse_env<T: FromStr>(var_name: &str, default: T) -> Result<T, ConfigError> {
    match env::var(var_name) {
        Ok(raw) => match raw.parse() {
            Ok(value) => Ok(value),
            Err(_) => Err(ConfigError::InvalidValue {
                field: var_name.to_string(),
                value: raw,
            }),
        },
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn full_config_from_file() {
        let file = write_config(
            r#"
            apify_token = "apify-secret"
            hf_token = "hf-secret"
            actor_id = "someActor"
            emotion_model = "org/emotion"
            sentiment_model = "org/sentiment"
            port = 8080
            static_dir = "assets"
            snapshot_path = "report.json"
            results_limit = 50
            run_wait_secs = 60
            run_poll_secs = 2
            "#,
        );

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.apify_token, "apify-secret");
        assert_eq!(config.hf_token, "hf-secret");
        assert_eq!(config.actor_id, "someActor");
        assert_eq!(config.port, 8080);
        assert_eq!(config.static_dir, PathBuf::from("assets"));
        assert_eq!(config.snapshot_path, PathBuf::from("report.json"));
        assert_eq!(config.results_limit, 50);
        assert_eq!(config.run_wait_secs, 60);
        assert_eq!(config.run_poll_secs, 2);
    }

    #[test]
    fn defaults_fill_missing_fields() {
        let file = write_config(
            r#"
            apify_token = "apify-secret"
            hf_token = "hf-secret"
            "#,
        );

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.actor_id, AppConfig::DEFAULT_ACTOR_ID);
        assert_eq!(config.emotion_model, AppConfig::DEFAULT_EMOTION_MODEL);
        assert_eq!(config.sentiment_model, AppConfig::DEFAULT_SENTIMENT_MODEL);
        assert_eq!(config.results_limit, 200);
        assert_eq!(config.snapshot_path, PathBuf::from("data.json"));
    }

    #[test]
    fn missing_file_is_reported() {
        let result = AppConfig::from_file(Path::new("/nonexistent/moodscope.toml"));
        assert!(matches!(result, Err(ConfigError::FileNotFound { .. })));
    }

    #[test]
    fn invalid_toml_is_reported() {
        let file = write_config("apify_token = [not valid");
        let result = AppConfig::from_file(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
