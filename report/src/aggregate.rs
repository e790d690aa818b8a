use moodscope_core::{Emotion, PsychologicalState, Sentiment};

/// Counts of each emotion label, kept in canonical label order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmotionTally {
    counts: [u64; Emotion::ALL.len()],
}

impl EmotionTally {
    pub fn new() -> Self {
        Self::default()
    }

    fn index(emotion: Emotion) -> usize {
        Emotion::ALL
            .iter()
            .position(|&candidate| candidate == emotion)
            .unwrap_or(0)
    }

    pub fn record(&mut self, emotion: Emotion) {
        self.counts[Self::index(emotion)] += 1;
    }

    pub fn count(&self, emotion: Emotion) -> u64 {
        self.counts[Self::index(emotion)]
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Emotion, u64)> + '_ {
        Emotion::ALL
            .iter()
            .zip(self.counts.iter())
            .map(|(&emotion, &count)| (emotion, count))
    }

    /// The most frequent emotion; ties (and an empty tally) resolve to the
    /// earliest label in canonical order.
    pub fn dominant(&self) -> Emotion {
        let mut best = Emotion::ALL[0];
        let mut best_count = self.counts[0];
        for (emotion, count) in self.iter().skip(1) {
            if count > best_count {
                best = emotion;
                best_count = count;
            }
        }
        best
    }
}

/// Counts of each comment sentiment label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SentimentTally {
    pub positive: u64,
    pub negative: u64,
}

impl SentimentTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, sentiment: Sentiment) {
        match sentiment {
            Sentiment::Positive => self.positive += 1,
            Sentiment::Negative => self.negative += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.positive + self.negative
    }
}

/// The inferred state is a straight lookup from the dominant emotion.
pub fn psychological_state(tally: &EmotionTally) -> PsychologicalState {
    tally.dominant().into()
}
