use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Facial emotion labels produced by the image classifier, in canonical
/// tally order. The order matters: ties between equally frequent labels
/// resolve to the earliest one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Emotion {
    Sad,
    Disgust,
    Happy,
    Anger,
    Surprise,
    Neutral,
    Fear,
}

impl Emotion {
    pub const ALL: [Emotion; 7] = [
        Emotion::Sad,
        Emotion::Disgust,
        Emotion::Happy,
        Emotion::Anger,
        Emotion::Surprise,
        Emotion::Neutral,
        Emotion::Fear,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Emotion::Sad => "SAD",
            Emotion::Disgust => "DISGUST",
            Emotion::Happy => "HAPPY",
            Emotion::Anger => "ANGER",
            Emotion::Surprise => "SURPRISE",
            Emotion::Neutral => "NEUTRAL",
            Emotion::Fear => "FEAR",
        }
    }

    /// Parse a label as returned by the hosted model. Case-insensitive;
    /// accepts both "anger" and "angry" since model checkpoints differ.
    pub fn parse_label(label: &str) -> Option<Emotion> {
        match label.to_ascii_lowercase().as_str() {
            "sad" | "sadness" => Some(Emotion::Sad),
            "disgust" => Some(Emotion::Disgust),
            "happy" | "happiness" => Some(Emotion::Happy),
            "anger" | "angry" => Some(Emotion::Anger),
            "surprise" => Some(Emotion::Surprise),
            "neutral" => Some(Emotion::Neutral),
            "fear" => Some(Emotion::Fear),
            _ => None,
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Comment sentiment labels produced by the text classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sentiment {
    Positive,
    Negative,
}

impl Sentiment {
    pub fn label(&self) -> &'static str {
        match self {
            Sentiment::Positive => "POSITIVE",
            Sentiment::Negative => "NEGATIVE",
        }
    }

    pub fn parse_label(label: &str) -> Option<Sentiment> {
        match label.to_ascii_uppercase().as_str() {
            "POSITIVE" => Some(Sentiment::Positive),
            "NEGATIVE" => Some(Sentiment::Negative),
            _ => None,
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A sentiment prediction with its confidence score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentimentScore {
    pub sentiment: Sentiment,
    pub score: f64,
}

/// Psychological state inferred from the dominant post emotion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PsychologicalState {
    Cheerful,
    Depressed,
    StressedOrAnxious,
    Anxious,
    Disturbed,
    Neutral,
}

impl PsychologicalState {
    pub fn label(&self) -> &'static str {
        match self {
            PsychologicalState::Cheerful => "CHEERFUL",
            PsychologicalState::Depressed => "DEPRESSED",
            PsychologicalState::StressedOrAnxious => "STRESSED or ANXIOUS",
            PsychologicalState::Anxious => "ANXIOUS",
            PsychologicalState::Disturbed => "DISTURBED",
            PsychologicalState::Neutral => "NEUTRAL",
        }
    }
}

impl fmt::Display for PsychologicalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<Emotion> for PsychologicalState {
    fn from(emotion: Emotion) -> Self {
        match emotion {
            Emotion::Happy => PsychologicalState::Cheerful,
            Emotion::Sad => PsychologicalState::Depressed,
            Emotion::Anger => PsychologicalState::StressedOrAnxious,
            Emotion::Fear => PsychologicalState::Anxious,
            Emotion::Disgust => PsychologicalState::Disturbed,
            Emotion::Surprise | Emotion::Neutral => PsychologicalState::Neutral,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstagramPost {
    pub caption: String,
    pub display_url: String,
    pub latest_comments: Vec<Comment>,
}

/// The single persisted report document. Overwritten on every run; field
/// names match the JSON file the display page reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileSnapshot {
    pub username: String,
    pub posts: usize,
    pub follower_count: u64,
    pub psychological_state: String,
    pub posts_html_left: String,
    pub posts_html_right: String,
    #[serde(default)]
    pub generated_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emotion_labels_round_trip() {
        for emotion in Emotion::ALL {
            assert_eq!(Emotion::parse_label(emotion.label()), Some(emotion));
        }
        assert_eq!(Emotion::parse_label("angry"), Some(Emotion::Anger));
        assert_eq!(Emotion::parse_label("Happy"), Some(Emotion::Happy));
        assert_eq!(Emotion::parse_label("confused"), None);
    }

    #[test]
    fn sentiment_labels() {
        assert_eq!(Sentiment::parse_label("positive"), Some(Sentiment::Positive));
        assert_eq!(Sentiment::parse_label("NEGATIVE"), Some(Sentiment::Negative));
        assert_eq!(Sentiment::parse_label("MIXED"), None);
        assert_eq!(Sentiment::Positive.label(), "POSITIVE");
    }

    #[test]
    fn psychological_state_mapping_table() {
        let expected = [
            (Emotion::Happy, "CHEERFUL"),
            (Emotion::Sad, "DEPRESSED"),
            (Emotion::Anger, "STRESSED or ANXIOUS"),
            (Emotion::Fear, "ANXIOUS"),
            (Emotion::Disgust, "DISTURBED"),
            (Emotion::Surprise, "NEUTRAL"),
            (Emotion::Neutral, "NEUTRAL"),
        ];
        for (emotion, label) in expected {
            let state: PsychologicalState = emotion.into();
            assert_eq!(state.label(), label, "for {emotion}");
        }
    }

    #[test]
    fn snapshot_serializes_with_original_field_names() {
        let snapshot = ProfileSnapshot {
            username: "someone".to_string(),
            posts: 3,
            follower_count: 120,
            psychological_state: "CHEERFUL".to_string(),
            posts_html_left: "<div></div>".to_string(),
            posts_html_right: String::new(),
            generated_at: None,
        };

        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value["username"], "someone");
        assert_eq!(value["posts"], 3);
        assert_eq!(value["follower_count"], 120);
        assert_eq!(value["psychological_state"], "CHEERFUL");
        assert!(value.get("posts_html_left").is_some());
        assert!(value.get("posts_html_right").is_some());
    }

    #[test]
    fn snapshot_deserializes_without_timestamp() {
        // Reports written before the timestamp field existed still load.
        let raw = r#"{
            "username": "someone",
            "posts": 0,
            "follower_count": 0,
            "psychological_state": "NEUTRAL",
            "posts_html_left": "",
            "posts_html_right": ""
        }"#;
        let snapshot: ProfileSnapshot = serde_json::from_str(raw).unwrap();
        assert!(snapshot.generated_at.is_none());
    }
}
