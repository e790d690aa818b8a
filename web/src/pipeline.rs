use crate::AppState;
use chrono::Utc;
use inference_client::{EmotionClassifier, SentimentClassifier};
use instagram_client::{download_image, ActorRunInput};
use moodscope_core::{Comment, CoreError, InstagramPost, ProfileSnapshot};
use report::charts;
use report::html;
use report::{psychological_state, EmotionTally, SentimentTally};
use tracing::{debug, info};

/// Number of posts rendered into the left column; the rest go right.
pub fn left_column_len(total: usize) -> usize {
    total.div_ceil(2)
}

/// Classify every comment, tallying sentiments and accumulating the
/// rendered comment paragraphs.
pub async fn classify_comments<S: SentimentClassifier>(
    classifier: &S,
    comments: &[Comment],
    tally: &mut SentimentTally,
) -> Result<String, CoreError> {
    let mut rendered = String::new();
    for comment in comments {
        let score = classifier.classify_text(&comment.text).await?;
        tally.record(score.sentiment);
        rendered.push_str(&html::comment_html(&comment.text, &score));
    }
    Ok(rendered)
}

/// Run the scrape-classify-aggregate-render pipeline for one profile and
/// persist the resulting snapshot. Posts are processed sequentially.
pub async fn analyze_profile(
    state: &AppState,
    username: &str,
    profile_url: &str,
) -> Result<ProfileSnapshot, CoreError> {
    let static_dir = &state.config.static_dir;
    tokio::fs::create_dir_all(static_dir).await?;

    let input = ActorRunInput::posts_for(profile_url, state.config.results_limit);
    let run = state.scraper.call(&input).await?;
    let posts: Vec<InstagramPost> = state
        .scraper
        .dataset_items(&run.default_dataset_id)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    info!("Scraped {} posts for {}", posts.len(), username);

    let mut emotion_tally = EmotionTally::new();
    let mut sentiment_tally = SentimentTally::new();
    let mut posts_html_left = String::new();
    let mut posts_html_right = String::new();
    let split = left_column_len(posts.len());

    for (i, post) in posts.iter().enumerate() {
        let filename = format!("image_{i}.jpg");
        let image_path = static_dir.join(&filename);
        let image = download_image(&state.http, &post.display_url, &image_path).await?;

        let emotion = state.inference.classify_image(&image).await?;
        emotion_tally.record(emotion);
        debug!("Post {} classified as {}", i, emotion);

        let comments_html = classify_comments(
            state.inference.as_ref(),
            &post.latest_comments,
            &mut sentiment_tally,
        )
        .await?;

        let card = html::post_html(
            &format!("/static/{filename}"),
            &post.caption,
            emotion,
            &comments_html,
        );
        if i < split {
            posts_html_left.push_str(&card);
        } else {
            posts_html_right.push_str(&card);
        }
    }

    charts::render_emotion_chart(&emotion_tally, &static_dir.join("emotion_distribution.png"))?;
    charts::render_sentiment_chart(
        &sentiment_tally,
        &static_dir.join("sentiment_distribution.png"),
    )?;

    let state_label = psychological_state(&emotion_tally);
    let snapshot = ProfileSnapshot {
        username: username.to_string(),
        posts: posts.len(),
        follower_count: run.follower_count.unwrap_or(0),
        psychological_state: state_label.label().to_string(),
        posts_html_left,
        posts_html_right,
        generated_at: Some(Utc::now()),
    };
    state.store.save(&snapshot).await?;

    Ok(snapshot)
}
