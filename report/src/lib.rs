pub mod aggregate;
pub mod charts;
pub mod html;
pub mod snapshot;

pub use aggregate::{psychological_state, EmotionTally, SentimentTally};
pub use snapshot::SnapshotStore;
