use moodscope_core::{CoreError, Emotion, SentimentScore};

pub mod hf;

pub use hf::HfInferenceClient;

/// Classifies the dominant facial emotion of an image.
#[allow(async_fn_in_trait)]
pub trait EmotionClassifier {
    async fn classify_image(&self, image: &[u8]) -> Result<Emotion, CoreError>;
}

/// Classifies the sentiment of a piece of text.
#[allow(async_fn_in_trait)]
pub trait SentimentClassifier {
    async fn classify_text(&self, text: &str) -> Result<SentimentScore, CoreError>;
}
