use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    models::{Comment, Post, Subreddit},
};

/// Flat records as handed over by the fetch layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub posts: Vec<Post>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub subreddits: Vec<Subreddit>,
}

impl Snapshot {
    /// Comments belonging to `post_id`, in snapshot order.
    pub fn comments_for(&self, post_id: &str) -> Vec<Comment> {
        self.comments
            .iter()
            .filter(|comment| comment.post_id == post_id)
            .cloned()
            .collect()
    }
}

pub async fn load_snapshot(path: impl AsRef<Path>) -> Result<Snapshot> {
    let raw = tokio::fs::read_to_string(path.as_ref()).await?;
    let snapshot: Snapshot = serde_json::from_str(&raw)?;

    tracing::info!(
        path = %path.as_ref().display(),
        posts = snapshot.posts.len(),
        comments = snapshot.comments.len(),
        subreddits = snapshot.subreddits.len(),
        "Snapshot loaded"
    );

    Ok(snapshot)
}
