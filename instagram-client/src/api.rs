use crate::metrics::{MetricsCollector, RequestMetrics};
use crate::retry::{with_retry, RetryConfig};
use moodscope_core::{Comment, CoreError, InstagramPost, ScrapeApiError};
use reqwest::{Client, Method, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

const APIFY_API_BASE: &str = "https://api.apify.com/v2";

const RUN_STATUS_SUCCEEDED: &str = "SUCCEEDED";
const RUN_STATUSES_FAILED: [&str; 3] = ["FAILED", "ABORTED", "TIMED-OUT"];

/// Input document for the Instagram post scraping actor. Field names are
/// the actor's wire format.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorRunInput {
    pub direct_urls: Vec<String>,
    pub results_type: String,
    pub results_limit: u32,
    pub search_type: String,
    pub search_limit: u32,
    pub add_parent_data: bool,
    pub include_follower_count: bool,
}

impl ActorRunInput {
    /// Input that scrapes recent posts (with follower count) for one profile.
    pub fn posts_for(profile_url: &str, results_limit: u32) -> Self {
        Self {
            direct_urls: vec![profile_url.to_string()],
            results_type: "posts".to_string(),
            results_limit,
            search_type: "hashtag".to_string(),
            search_limit: 1,
            add_parent_data: false,
            include_follower_count: true,
        }
    }
}

/// Most API responses arrive wrapped in a `data` envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    pub data: T,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorRun {
    pub id: String,
    pub status: String,
    pub default_dataset_id: String,
    #[serde(default)]
    pub follower_count: Option<u64>,
}

impl ActorRun {
    pub fn is_succeeded(&self) -> bool {
        self.status == RUN_STATUS_SUCCEEDED
    }

    pub fn is_failed(&self) -> bool {
        RUN_STATUSES_FAILED.contains(&self.status.as_str())
    }
}

/// One scraped post as stored in the actor's dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapedPost {
    pub display_url: String,
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub latest_comments: Vec<ScrapedComment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapedComment {
    pub text: String,
}

impl From<ScrapedPost> for InstagramPost {
    fn from(post: ScrapedPost) -> Self {
        Self {
            caption: post.caption,
            display_url: post.display_url,
            latest_comments: post
                .latest_comments
                .into_iter()
                .map(|comment| Comment { text: comment.text })
                .collect(),
        }
    }
}

/// Client for the hosted scraping actor API: starts a run, polls it to a
/// terminal status, and fetches the resulting dataset.
#[derive(Debug)]
pub struct ScrapeClient {
    http_client: Client,
    token: String,
    actor_id: String,
    metrics: Arc<MetricsCollector>,
    retry: RetryConfig,
    run_wait: Duration,
    run_poll: Duration,
}

impl ScrapeClient {
    pub fn new(token: String, actor_id: String) -> Self {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http_client,
            token,
            actor_id,
            metrics: Arc::new(MetricsCollector::new()),
            retry: RetryConfig::apify(),
            run_wait: Duration::from_secs(300),
            run_poll: Duration::from_secs(5),
        }
    }

    /// Override how long [`ScrapeClient::call`] waits for a run and how
    /// often it polls.
    pub fn with_run_wait(mut self, run_wait: Duration, run_poll: Duration) -> Self {
        self.run_wait = run_wait;
        self.run_poll = run_poll;
        self
    }

    async fn make_request(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<Response, CoreError> {
        let url = format!("{}{}", APIFY_API_BASE, path);
        let start_time = Instant::now();
        let mut success = false;
        let mut status_code = None;
        let mut rate_limited = false;

        let mut request_builder = self
            .http_client
            .request(method.clone(), &url)
            .bearer_auth(&self.token);
        if let Some(json_body) = body {
            request_builder = request_builder.json(json_body);
        }

        debug!("Making scraping API request: {} {}", method, path);
        let result = request_builder.send().await;

        let outcome = match result {
            Ok(response) => {
                status_code = Some(response.status().as_u16());

                if response.status().is_success() {
                    success = true;
                    debug!("Request successful: {} {}", response.status(), path);
                    Ok(response)
                } else {
                    error!(
                        "Request failed with status: {} for {}",
                        response.status(),
                        path
                    );

                    match response.status().as_u16() {
                        429 => {
                            rate_limited = true;
                            let retry_after = response
                                .headers()
                                .get("retry-after")
                                .and_then(|value| value.to_str().ok())
                                .and_then(|value| value.parse::<u64>().ok())
                                .unwrap_or(60);
                            warn!("Rate limited, retry after {} seconds", retry_after);
                            Err(CoreError::ScrapeApi(ScrapeApiError::RateLimitExceeded {
                                retry_after,
                            }))
                        }
                        401 | 403 => Err(CoreError::ScrapeApi(ScrapeApiError::InvalidToken)),
                        404 if path.starts_with("/acts/") => {
                            Err(CoreError::ScrapeApi(ScrapeApiError::ActorNotFound {
                                actor_id: self.actor_id.clone(),
                            }))
                        }
                        404 => Err(CoreError::ScrapeApi(ScrapeApiError::InvalidResponse {
                            details: format!("resource not found: {path}"),
                        })),
                        code if response.status().is_server_error() => {
                            Err(CoreError::ScrapeApi(ScrapeApiError::ServerError {
                                status_code: code,
                            }))
                        }
                        code => Err(CoreError::ScrapeApi(ScrapeApiError::InvalidResponse {
                            details: format!("unexpected status {code} for {path}"),
                        })),
                    }
                }
            }
            Err(e) => {
                error!("Network error for {} {}: {}", method, path, e);
                if e.is_timeout() {
                    Err(CoreError::ScrapeApi(ScrapeApiError::RequestTimeout))
                } else {
                    Err(CoreError::Network(e))
                }
            }
        };

        self.metrics
            .record_request(RequestMetrics {
                endpoint: path.to_string(),
                status_code,
                response_time: start_time.elapsed(),
                success,
                rate_limited,
            })
            .await;

        outcome
    }

    /// Start an actor run without waiting for it.
    pub async fn start_run(&self, input: &ActorRunInput) -> Result<ActorRun, CoreError> {
        let body = serde_json::to_value(input)?;
        let path = format!("/acts/{}/runs", self.actor_id);

        with_retry("start_actor_run", &self.retry, || async {
            let response = self.make_request(Method::POST, &path, Some(&body)).await?;
            let envelope: ApiEnvelope<ActorRun> = response.json().await.map_err(|e| {
                error!("Failed to parse actor run: {}", e);
                CoreError::ScrapeApi(ScrapeApiError::InvalidResponse {
                    details: "Failed to parse actor run".to_string(),
                })
            })?;
            info!("Started actor run {}", envelope.data.id);
            Ok(envelope.data)
        })
        .await
    }

    /// Fetch the current state of a run.
    pub async fn run_status(&self, run_id: &str) -> Result<ActorRun, CoreError> {
        let path = format!("/actor-runs/{run_id}");

        with_retry("actor_run_status", &self.retry, || async {
            let response = self.make_request(Method::GET, &path, None).await?;
            let envelope: ApiEnvelope<ActorRun> = response.json().await.map_err(|e| {
                error!("Failed to parse run status: {}", e);
                CoreError::ScrapeApi(ScrapeApiError::InvalidResponse {
                    details: "Failed to parse run status".to_string(),
                })
            })?;
            Ok(envelope.data)
        })
        .await
    }

    /// Start a run and block until it reaches a terminal status, bounded by
    /// the configured wait.
    pub async fn call(&self, input: &ActorRunInput) -> Result<ActorRun, CoreError> {
        let started = Instant::now();
        let mut run = self.start_run(input).await?;

        loop {
            if run.is_succeeded() {
                info!("Actor run {} succeeded", run.id);
                return Ok(run);
            }
            if run.is_failed() {
                warn!("Actor run {} finished with status {}", run.id, run.status);
                return Err(CoreError::ScrapeApi(ScrapeApiError::RunFailed {
                    status: run.status,
                }));
            }
            if started.elapsed() >= self.run_wait {
                return Err(CoreError::ScrapeApi(ScrapeApiError::RunTimedOut {
                    seconds: self.run_wait.as_secs(),
                }));
            }

            debug!("Actor run {} is {}, polling again", run.id, run.status);
            tokio::time::sleep(self.run_poll).await;
            run = self.run_status(&run.id).await?;
        }
    }

    /// Fetch all items of a run's default dataset. Items that do not look
    /// like posts are skipped with a warning rather than failing the run.
    pub async fn dataset_items(&self, dataset_id: &str) -> Result<Vec<ScrapedPost>, CoreError> {
        let path = format!("/datasets/{dataset_id}/items?clean=true&format=json");

        let items: Vec<serde_json::Value> = with_retry("dataset_items", &self.retry, || async {
            let response = self.make_request(Method::GET, &path, None).await?;
            response.json().await.map_err(|e| {
                error!("Failed to parse dataset items: {}", e);
                CoreError::ScrapeApi(ScrapeApiError::InvalidResponse {
                    details: format!("Failed to parse items of dataset {dataset_id}"),
                })
            })
        })
        .await?;

        let total = items.len();
        let posts: Vec<ScrapedPost> = items
            .into_iter()
            .filter_map(|item| match serde_json::from_value(item) {
                Ok(post) => Some(post),
                Err(e) => {
                    warn!("Skipping malformed dataset item: {}", e);
                    None
                }
            })
            .collect();

        info!("Retrieved {} posts from dataset ({} items)", posts.len(), total);
        Ok(posts)
    }

    pub async fn get_metrics(&self) -> crate::metrics::ApiMetrics {
        self.metrics.get_metrics().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_input_uses_actor_wire_names() {
        let input = ActorRunInput::posts_for("https://www.instagram.com/someone/", 200);
        let value = serde_json::to_value(&input).unwrap();

        assert_eq!(
            value["directUrls"],
            serde_json::json!(["https://www.instagram.com/someone/"])
        );
        assert_eq!(value["resultsType"], "posts");
        assert_eq!(value["resultsLimit"], 200);
        assert_eq!(value["searchType"], "hashtag");
        assert_eq!(value["searchLimit"], 1);
        assert_eq!(value["addParentData"], false);
        assert_eq!(value["includeFollowerCount"], true);
    }

    #[test]
    fn actor_run_parses_from_envelope() {
        let raw = r#"{
            "data": {
                "id": "run123",
                "status": "SUCCEEDED",
                "defaultDatasetId": "dataset456",
                "followerCount": 1200
            }
        }"#;

        let envelope: ApiEnvelope<ActorRun> = serde_json::from_str(raw).unwrap();
        let run = envelope.data;
        assert_eq!(run.id, "run123");
        assert!(run.is_succeeded());
        assert!(!run.is_failed());
        assert_eq!(run.default_dataset_id, "dataset456");
        assert_eq!(run.follower_count, Some(1200));
    }

    #[test]
    fn run_without_follower_count_still_parses() {
        let raw = r#"{"data": {"id": "run123", "status": "RUNNING", "defaultDatasetId": "d"}}"#;
        let envelope: ApiEnvelope<ActorRun> = serde_json::from_str(raw).unwrap();
        assert_eq!(envelope.data.follower_count, None);
        assert!(!envelope.data.is_succeeded());
        assert!(!envelope.data.is_failed());
    }

    #[test]
    fn failed_statuses_are_terminal() {
        for status in RUN_STATUSES_FAILED {
            let run = ActorRun {
                id: "run".to_string(),
                status: status.to_string(),
                default_dataset_id: "d".to_string(),
                follower_count: None,
            };
            assert!(run.is_failed(), "{status} should be terminal");
        }
    }

    #[test]
    fn scraped_post_parses_dataset_item() {
        let raw = r#"{
            "displayUrl": "https://cdn.example.com/image.jpg",
            "caption": "sunset",
            "latestComments": [{"text": "nice shot"}, {"text": "wow"}],
            "likesCount": 42
        }"#;

        let post: ScrapedPost = serde_json::from_str(raw).unwrap();
        assert_eq!(post.display_url, "https://cdn.example.com/image.jpg");
        assert_eq!(post.caption, "sunset");
        assert_eq!(post.latest_comments.len(), 2);

        let converted: InstagramPost = post.into();
        assert_eq!(converted.latest_comments[0].text, "nice shot");
    }

    #[test]
    fn scraped_post_defaults_missing_optionals() {
        let raw = r#"{"displayUrl": "https://cdn.example.com/image.jpg"}"#;
        let post: ScrapedPost = serde_json::from_str(raw).unwrap();
        assert_eq!(post.caption, "");
        assert!(post.latest_comments.is_empty());
    }

    #[tokio::test]
    async fn client_starts_with_empty_metrics() {
        let client = ScrapeClient::new("token".to_string(), "actor".to_string());
        let metrics = client.get_metrics().await;
        assert_eq!(metrics.total_requests, 0);
    }
}
