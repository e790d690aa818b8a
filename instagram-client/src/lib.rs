pub mod api;
pub mod metrics;
pub mod profile;
pub mod retry;

pub use api::{ActorRun, ActorRunInput, ScrapeClient, ScrapedComment, ScrapedPost};
pub use profile::{download_image, extract_username, fetch_username};
pub use retry::{with_retry, RetryConfig};
