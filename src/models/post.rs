use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Author, Votable, VoteTally, timestamp};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostType {
    #[default]
    Text,
    Link,
    Image,
    Video,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub author_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,
    pub subreddit_id: String,
    pub subreddit: String,
    #[serde(flatten)]
    pub votes: VoteTally,
    #[serde(default)]
    pub comment_count: u32,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub updated_at: DateTime<Utc>,
    #[serde(rename = "type", default)]
    pub post_type: PostType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

impl Post {
    /// Copy of this post with one more comment counted.
    pub fn with_comment_added(&self) -> Post {
        Post {
            comment_count: self.comment_count.saturating_add(1),
            ..self.clone()
        }
    }
}

impl Votable for Post {
    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn tally(&self) -> &VoteTally {
        &self.votes
    }

    fn tally_mut(&mut self) -> &mut VoteTally {
        &mut self.votes
    }
}
