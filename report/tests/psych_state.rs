use moodscope_core::{Emotion, PsychologicalState};
use report::{psychological_state, EmotionTally};

fn state_for_dominant(emotion: Emotion) -> PsychologicalState {
    let mut tally = EmotionTally::new();
    // One of everything, plus extras of the label under test, so the
    // tested label is the strict maximum.
    for other in Emotion::ALL {
        tally.record(other);
    }
    tally.record(emotion);
    psychological_state(&tally)
}

#[test]
fn dominant_happy_is_cheerful() {
    assert_eq!(state_for_dominant(Emotion::Happy), PsychologicalState::Cheerful);
}

#[test]
fn dominant_sad_is_depressed() {
    assert_eq!(state_for_dominant(Emotion::Sad), PsychologicalState::Depressed);
}

#[test]
fn dominant_anger_is_stressed_or_anxious() {
    assert_eq!(
        state_for_dominant(Emotion::Anger),
        PsychologicalState::StressedOrAnxious
    );
    assert_eq!(
        state_for_dominant(Emotion::Anger).label(),
        "STRESSED or ANXIOUS"
    );
}

#[test]
fn dominant_fear_is_anxious() {
    assert_eq!(state_for_dominant(Emotion::Fear), PsychologicalState::Anxious);
}

#[test]
fn dominant_disgust_is_disturbed() {
    assert_eq!(state_for_dominant(Emotion::Disgust), PsychologicalState::Disturbed);
}

#[test]
fn dominant_surprise_is_neutral() {
    assert_eq!(state_for_dominant(Emotion::Surprise), PsychologicalState::Neutral);
}

#[test]
fn dominant_neutral_is_neutral() {
    assert_eq!(state_for_dominant(Emotion::Neutral), PsychologicalState::Neutral);
}
