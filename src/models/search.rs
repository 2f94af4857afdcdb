use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{Post, Subreddit};

#[derive(Debug, Deserialize, Validate)]
pub struct SearchQuery {
    #[validate(length(min = 1, max = 200))]
    pub q: String, // search query
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchResults {
    pub query: String,
    pub posts: Vec<Post>,
    pub subreddits: Vec<Subreddit>,
}

impl SearchResults {
    pub fn total_results(&self) -> usize {
        self.posts.len() + self.subreddits.len()
    }
}
