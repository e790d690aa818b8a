use crate::aggregate::{EmotionTally, SentimentTally};
use moodscope_core::{CoreError, Emotion, Sentiment};
use plotters::prelude::*;
use std::path::Path;
use tracing::info;

const CHART_SIZE: (u32, u32) = (1000, 600);

fn emotion_color(emotion: Emotion) -> RGBColor {
    match emotion {
        Emotion::Sad => RGBColor(70, 105, 180),
        Emotion::Disgust => RGBColor(85, 140, 60),
        Emotion::Happy => RGBColor(240, 200, 40),
        Emotion::Anger => RGBColor(200, 55, 45),
        Emotion::Surprise => RGBColor(235, 140, 50),
        Emotion::Neutral => RGBColor(150, 150, 150),
        Emotion::Fear => RGBColor(125, 80, 165),
    }
}

/// Pie slices for the emotion distribution, zero-count labels dropped.
pub fn emotion_slices(tally: &EmotionTally) -> (Vec<f64>, Vec<String>, Vec<RGBColor>) {
    let mut sizes = Vec::new();
    let mut labels = Vec::new();
    let mut colors = Vec::new();
    for (emotion, count) in tally.iter() {
        if count > 0 {
            sizes.push(count as f64);
            labels.push(emotion.label().to_string());
            colors.push(emotion_color(emotion));
        }
    }
    (sizes, labels, colors)
}

/// Pie slices for the sentiment distribution: green positive, red negative.
pub fn sentiment_slices(tally: &SentimentTally) -> (Vec<f64>, Vec<String>, Vec<RGBColor>) {
    let mut sizes = Vec::new();
    let mut labels = Vec::new();
    let mut colors = Vec::new();
    for (sentiment, count, color) in [
        (Sentiment::Positive, tally.positive, RGBColor(60, 160, 75)),
        (Sentiment::Negative, tally.negative, RGBColor(200, 55, 45)),
    ] {
        if count > 0 {
            sizes.push(count as f64);
            labels.push(sentiment.label().to_string());
            colors.push(color);
        }
    }
    (sizes, labels, colors)
}

pub fn render_emotion_chart(tally: &EmotionTally, path: &Path) -> Result<(), CoreError> {
    let (sizes, labels, colors) = emotion_slices(tally);
    render_pie(path, "POST EMOTION ANALYSIS", &sizes, &labels, &colors)
}

pub fn render_sentiment_chart(tally: &SentimentTally, path: &Path) -> Result<(), CoreError> {
    let (sizes, labels, colors) = sentiment_slices(tally);
    render_pie(path, "COMMENT SENTIMENT ANALYSIS", &sizes, &labels, &colors)
}

fn render_pie(
    path: &Path,
    title: &str,
    sizes: &[f64],
    labels: &[String],
    colors: &[RGBColor],
) -> Result<(), CoreError> {
    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;
    let root = root
        .titled(title, ("sans-serif", 40))
        .map_err(chart_err)?;

    // With nothing tallied the chart is just its title; an all-zero pie
    // would divide by zero in the percentage labels.
    if !sizes.is_empty() {
        let dims = root.dim_in_pixel();
        let center = ((dims.0 / 2) as i32, (dims.1 / 2) as i32);
        let radius = f64::from(dims.0.min(dims.1)) * 0.35;

        let mut pie = Pie::new(&center, &radius, sizes, colors, labels);
        pie.label_style(("sans-serif", 22).into_font());
        pie.percentages(("sans-serif", 18).into_font().color(&BLACK));
        root.draw(&pie).map_err(chart_err)?;
    }

    root.present().map_err(chart_err)?;
    info!("Rendered chart {}", path.display());
    Ok(())
}

fn chart_err<E: std::fmt::Display>(error: E) -> CoreError {
    CoreError::ChartRender {
        message: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emotion_slices_drop_zero_counts() {
        let mut tally = EmotionTally::new();
        tally.record(Emotion::Happy);
        tally.record(Emotion::Happy);
        tally.record(Emotion::Fear);

        let (sizes, labels, colors) = emotion_slices(&tally);
        assert_eq!(sizes, vec![2.0, 1.0]);
        assert_eq!(labels, vec!["HAPPY".to_string(), "FEAR".to_string()]);
        assert_eq!(colors.len(), 2);
    }

    #[test]
    fn empty_tally_yields_no_slices() {
        let (sizes, labels, _) = emotion_slices(&EmotionTally::new());
        assert!(sizes.is_empty());
        assert!(labels.is_empty());
    }

    #[test]
    fn sentiment_slices_keep_label_order() {
        let mut tally = SentimentTally::new();
        tally.record(Sentiment::Positive);
        tally.record(Sentiment::Negative);
        tally.record(Sentiment::Negative);

        let (sizes, labels, _) = sentiment_slices(&tally);
        assert_eq!(sizes, vec![1.0, 2.0]);
        assert_eq!(labels, vec!["POSITIVE".to_string(), "NEGATIVE".to_string()]);
    }

    #[test]
    fn negative_only_tally_has_single_slice() {
        let mut tally = SentimentTally::new();
        tally.record(Sentiment::Negative);

        let (sizes, labels, _) = sentiment_slices(&tally);
        assert_eq!(sizes, vec![1.0]);
        assert_eq!(labels, vec!["NEGATIVE".to_string()]);
    }
}
