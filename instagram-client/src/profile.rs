use moodscope_core::CoreError;
use reqwest::Client;
use scraper::{Html, Selector};
use std::path::Path;
use tracing::{debug, info};
use url::Url;

/// Pull the username out of a profile page's `og:title` meta tag.
pub fn extract_username(html: &str) -> Result<String, CoreError> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(r#"meta[property="og:title"]"#).map_err(|e| {
        CoreError::Internal {
            message: format!("invalid og:title selector: {e}"),
        }
    })?;

    document
        .select(&selector)
        .next()
        .and_then(|element| element.value().attr("content"))
        .map(|content| content.to_string())
        .ok_or(CoreError::NotFound {
            resource: "og:title meta tag".to_string(),
        })
}

/// Fetch the profile page and extract its username. Best effort: any page
/// without the meta tag is reported as not found.
pub async fn fetch_username(client: &Client, profile_url: &str) -> Result<String, CoreError> {
    let url = Url::parse(profile_url).map_err(|e| CoreError::InvalidInput {
        message: format!("invalid profile URL: {e}"),
    })?;

    debug!("Fetching profile page {}", url);
    let body = client.get(url).send().await?.text().await?;
    let username = extract_username(&body)?;
    info!("Extracted username: {}", username);
    Ok(username)
}

/// Download a post image to disk, returning its bytes for classification.
pub async fn download_image(
    client: &Client,
    image_url: &str,
    path: &Path,
) -> Result<Vec<u8>, CoreError> {
    debug!("Downloading image {} to {}", image_url, path.display());
    let bytes = client.get(image_url).send().await?.bytes().await?;
    tokio::fs::write(path, &bytes).await?;
    Ok(bytes.to_vec())
}
