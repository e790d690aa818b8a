use crate::{EmotionClassifier, SentimentClassifier};
use moodscope_core::{CoreError, Emotion, InferenceError, Sentiment, SentimentScore};
use reqwest::{header, Client, Response};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error};

const HF_INFERENCE_BASE: &str = "https://api-inference.huggingface.co/models";

/// One label prediction as returned by a hosted classification pipeline.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Prediction {
    pub label: String,
    pub score: f64,
}

/// Client for hosted pre-trained classification models: a ViT checkpoint
/// for facial emotions and a text pipeline for comment sentiment.
#[derive(Debug)]
pub struct HfInferenceClient {
    http_client: Client,
    api_token: String,
    emotion_model: String,
    sentiment_model: String,
}

impl HfInferenceClient {
    pub fn new(api_token: String, emotion_model: String, sentiment_model: String) -> Self {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http_client,
            api_token,
            emotion_model,
            sentiment_model,
        }
    }

    fn model_url(&self, model: &str) -> String {
        format!("{}/{}", HF_INFERENCE_BASE, model)
    }

    async fn check_status(&self, response: Response, model: &str) -> Result<Response, CoreError> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status().as_u16();
        error!("Inference request failed with status {} for {}", status, model);
        let inference_error = match status {
            401 | 403 => InferenceError::InvalidApiKey,
            404 => InferenceError::ModelNotAvailable {
                model: model.to_string(),
            },
            429 => {
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|value| value.to_str().ok())
                    .and_then(|value| value.parse::<u64>().ok())
                    .unwrap_or(60);
                InferenceError::RateLimitExceeded { retry_after }
            }
            // The hosted API answers 503 while a cold model is loading
            503 => InferenceError::ModelLoading {
                model: model.to_string(),
            },
            code => InferenceError::ServerError { status_code: code },
        };
        Err(CoreError::Inference(inference_error))
    }

    fn network_error(&self, e: reqwest::Error, model: &str) -> CoreError {
        if e.is_timeout() {
            CoreError::Inference(InferenceError::RequestTimeout {
                model: model.to_string(),
            })
        } else {
            CoreError::Network(e)
        }
    }
}

/// Text pipelines answer `[[{label, score}, ...]]`, image pipelines a flat
/// `[{label, score}, ...]`. Accept either shape.
pub fn flatten_predictions(
    value: serde_json::Value,
    model: &str,
) -> Result<Vec<Prediction>, CoreError> {
    let invalid = || {
        CoreError::Inference(InferenceError::InvalidResponseFormat {
            model: model.to_string(),
        })
    };

    match value {
        serde_json::Value::Array(items) => {
            let flat = match items.first() {
                Some(serde_json::Value::Array(_)) => match items.into_iter().next() {
                    Some(inner) => inner,
                    None => return Err(invalid()),
                },
                _ => serde_json::Value::Array(items),
            };
            serde_json::from_value(flat).map_err(|_| invalid())
        }
        _ => Err(invalid()),
    }
}

/// The highest-scoring prediction wins.
pub fn top_prediction(predictions: &[Prediction]) -> Option<&Prediction> {
    predictions.iter().max_by(|a, b| {
        a.score
            .partial_cmp(&b.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    })
}

impl EmotionClassifier for HfInferenceClient {
    async fn classify_image(&self, image: &[u8]) -> Result<Emotion, CoreError> {
        let model = &self.emotion_model;
        let response = self
            .http_client
            .post(self.model_url(model))
            .bearer_auth(&self.api_token)
            .header(header::CONTENT_TYPE, "application/octet-stream")
            .body(image.to_vec())
            .send()
            .await
            .map_err(|e| self.network_error(e, model))?;
        let response = self.check_status(response, model).await?;

        let value: serde_json::Value = response.json().await.map_err(|_| {
            CoreError::Inference(InferenceError::InvalidResponseFormat {
                model: model.to_string(),
            })
        })?;
        let predictions = flatten_predictions(value, model)?;
        let top = top_prediction(&predictions).ok_or_else(|| {
            CoreError::Inference(InferenceError::EmptyPrediction {
                model: model.to_string(),
            })
        })?;

        debug!("Emotion prediction: {} ({:.3})", top.label, top.score);
        Emotion::parse_label(&top.label).ok_or_else(|| {
            CoreError::Inference(InferenceError::UnknownLabel {
                label: top.label.clone(),
            })
        })
    }
}

impl SentimentClassifier for HfInferenceClient {
    async fn classify_text(&self, text: &str) -> Result<SentimentScore, CoreError> {
        let model = &self.sentiment_model;
        let response = self
            .http_client
            .post(self.model_url(model))
            .bearer_auth(&self.api_token)
            .json(&serde_json::json!({ "inputs": text }))
            .send()
            .await
            .map_err(|e| self.network_error(e, model))?;
        let response = self.check_status(response, model).await?;

        let value: serde_json::Value = response.json().await.map_err(|_| {
            CoreError::Inference(InferenceError::InvalidResponseFormat {
                model: model.to_string(),
            })
        })?;
        let predictions = flatten_predictions(value, model)?;
        let top = top_prediction(&predictions).ok_or_else(|| {
            CoreError::Inference(InferenceError::EmptyPrediction {
                model: model.to_string(),
            })
        })?;

        debug!("Sentiment prediction: {} ({:.3})", top.label, top.score);
        let sentiment = Sentiment::parse_label(&top.label).ok_or_else(|| {
            CoreError::Inference(InferenceError::UnknownLabel {
                label: top.label.clone(),
            })
        })?;

        Ok(SentimentScore {
            sentiment,
            score: top.score,
        })
    }
}
