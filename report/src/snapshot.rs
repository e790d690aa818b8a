use moodscope_core::{CoreError, ProfileSnapshot};
use std::path::PathBuf;
use tracing::info;

/// Persistence for the single report document. Every save overwrites the
/// previous report; there is exactly one snapshot at a time.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub async fn save(&self, snapshot: &ProfileSnapshot) -> Result<(), CoreError> {
        let json = serde_json::to_string(snapshot)?;
        tokio::fs::write(&self.path, json).await?;
        info!(
            "Saved report for {} to {}",
            snapshot.username,
            self.path.display()
        );
        Ok(())
    }

    pub async fn load(&self) -> Result<ProfileSnapshot, CoreError> {
        let raw = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CoreError::NotFound {
                    resource: self.path.display().to_string(),
                }
            } else {
                CoreError::Io(e)
            }
        })?;
        Ok(serde_json::from_str(&raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn snapshot() -> ProfileSnapshot {
        ProfileSnapshot {
            username: "someone".to_string(),
            posts: 2,
            follower_count: 99,
            psychological_state: "NEUTRAL".to_string(),
            posts_html_left: "<div>a</div>".to_string(),
            posts_html_right: "<div>b</div>".to_string(),
            generated_at: Some(Utc::now()),
        }
    }

    #[tokio::test]
    async fn save_then_load_returns_the_same_report() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("data.json"));

        store.save(&snapshot()).await.unwrap();
        let loaded = store.load().await.unwrap();

        assert_eq!(loaded.username, "someone");
        assert_eq!(loaded.posts, 2);
        assert_eq!(loaded.follower_count, 99);
        assert_eq!(loaded.posts_html_left, "<div>a</div>");
    }

    #[tokio::test]
    async fn save_overwrites_the_previous_report() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("data.json"));

        store.save(&snapshot()).await.unwrap();
        let mut second = snapshot();
        second.username = "someone_else".to_string();
        store.save(&second).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.username, "someone_else");
    }

    #[tokio::test]
    async fn loading_a_missing_snapshot_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("data.json"));

        let result = store.load().await;
        assert!(matches!(result, Err(CoreError::NotFound { .. })));
    }
}
