use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::timestamp;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subreddit {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub banner: Option<String>,
    #[serde(default)]
    pub member_count: u64,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub is_user_subscribed: bool,
}
