pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod snapshot;

use chrono::{DateTime, Utc};
use serde::Serialize;

pub use services::{
    comment_service::{
        CommentForest, TreeAnomaly, build_tree, build_tree_with_report, flatten, insert_reply,
    },
    ranking_service::{
        Clock, FixedClock, SortMode, SystemClock, hot_score, rank, rank_in_place, rank_tree,
    },
    vote_service::apply_vote,
};

use crate::{
    config::Config,
    error::Result,
    models::{Post, SearchQuery, SearchResults},
    services::{
        comment_service,
        feed_service::{self, FeedQuery},
        search_service,
    },
    snapshot::Snapshot,
};

/// A ranked post together with its assembled, ranked comment thread.
#[derive(Debug, Serialize)]
pub struct RenderedPost {
    pub post: Post,
    pub comments: CommentForest,
}

#[derive(Debug, Serialize)]
pub struct RenderedFeed {
    pub sort: SortMode,
    pub generated_at: DateTime<Utc>,
    pub posts: Vec<RenderedPost>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<SearchResults>,
}

/// Everything the front page needs from one snapshot.
pub fn render_feed(snapshot: &Snapshot, config: &Config, clock: &dyn Clock) -> Result<RenderedFeed> {
    let now = clock.now();
    let query = FeedQuery {
        sort: config.default_sort,
        time_range: config.time_range,
        subreddit: config.subreddit.clone(),
        limit: config.feed_limit,
    };

    let posts = feed_service::get_posts(&snapshot.posts, &query, now)
        .into_iter()
        .map(|post| {
            let mut thread = comment_service::build_tree_with_report(&snapshot.comments_for(&post.id));
            for anomaly in &thread.anomalies {
                tracing::warn!(post_id = %post.id, %anomaly, "Malformed comment graph");
            }
            thread.comments = rank_tree(&thread.comments, config.default_sort, now);
            RenderedPost {
                post,
                comments: thread,
            }
        })
        .collect();

    let search = match &config.search_query {
        Some(q) => Some(search_service::search_content(
            &snapshot.posts,
            &snapshot.subreddits,
            &SearchQuery { q: q.clone() },
        )?),
        None => None,
    };

    Ok(RenderedFeed {
        sort: config.default_sort,
        generated_at: now,
        posts,
        search,
    })
}
