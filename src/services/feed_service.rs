use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    models::Post,
    services::ranking_service::{SortMode, rank},
};

pub const DEFAULT_FEED_LIMIT: usize = 25;

// Time range for listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    Hour,
    Day,
    Week,
    Month,
    Year,
    All,
}

impl TimeRange {
    /// Window length, or `None` for `All`.
    pub fn window(self) -> Option<Duration> {
        match self {
            TimeRange::Hour => Some(Duration::hours(1)),
            TimeRange::Day => Some(Duration::days(1)),
            TimeRange::Week => Some(Duration::weeks(1)),
            TimeRange::Month => Some(Duration::days(30)),
            TimeRange::Year => Some(Duration::days(365)),
            TimeRange::All => None,
        }
    }
}

impl FromStr for TimeRange {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hour" => Ok(TimeRange::Hour),
            "day" => Ok(TimeRange::Day),
            "week" => Ok(TimeRange::Week),
            "month" => Ok(TimeRange::Month),
            "year" => Ok(TimeRange::Year),
            "all" => Ok(TimeRange::All),
            _ => Err(format!("Unknown TimeRange: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedQuery {
    #[serde(default)]
    pub sort: SortMode,
    pub time_range: Option<TimeRange>,
    pub subreddit: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    DEFAULT_FEED_LIMIT
}

impl Default for FeedQuery {
    fn default() -> Self {
        Self {
            sort: SortMode::Hot,
            time_range: None,
            subreddit: None,
            limit: DEFAULT_FEED_LIMIT,
        }
    }
}

/// Filters, ranks and truncates a post listing.
pub fn get_posts(posts: &[Post], query: &FeedQuery, now: DateTime<Utc>) -> Vec<Post> {
    let cutoff = query
        .time_range
        .and_then(TimeRange::window)
        .map(|window| now - window);

    let filtered: Vec<Post> = posts
        .iter()
        .filter(|post| match &query.subreddit {
            Some(name) => post.subreddit.eq_ignore_ascii_case(name),
            None => true,
        })
        .filter(|post| cutoff.is_none_or(|cutoff| post.created_at >= cutoff))
        .cloned()
        .collect();

    let limit = if query.limit == 0 {
        DEFAULT_FEED_LIMIT
    } else {
        query.limit
    };

    let mut ranked = rank(&filtered, query.sort, now);
    ranked.truncate(limit);

    tracing::debug!(
        sort = %query.sort,
        matched = filtered.len(),
        returned = ranked.len(),
        "Feed assembled"
    );

    ranked
}
