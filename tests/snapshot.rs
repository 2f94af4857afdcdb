//! Snapshot loading and feed rendering tests

mod common;

use std::io::Write;

use aggregator_core::config::Config;
use aggregator_core::error::AppError;
use aggregator_core::models::{PostType, VoteDirection};
use aggregator_core::snapshot::load_snapshot;
use aggregator_core::{FixedClock, SortMode, render_feed};
use common::shape;

const SNAPSHOT: &str = r#"{
  "posts": [
    {
      "id": "p1", "title": "Rust 2024 edition is out", "content": "Lots of changes",
      "author_id": "u1", "subreddit_id": "s1", "subreddit": "rust",
      "upvotes": 120, "downvotes": 4, "user_vote": 1, "comment_count": 3,
      "created_at": "2023-05-30T12:00:00.000Z", "updated_at": "2023-05-30T12:00:00.000Z",
      "type": "text"
    },
    {
      "id": "p2", "title": "Show me your homelab", "content": "",
      "author_id": "u2", "subreddit_id": "s2", "subreddit": "homelab",
      "upvotes": 40, "downvotes": 1,
      "created_at": 1685404800, "updated_at": 1685404800,
      "type": "image", "url": "https://example.com/rack.png"
    }
  ],
  "comments": [
    { "id": "c1", "post_id": "p1", "content": "Finally", "author_id": "u2",
      "upvotes": 3, "downvotes": 0,
      "created_at": "2023-05-30T13:00:00Z", "updated_at": "2023-05-30T13:00:00Z" },
    { "id": "c2", "post_id": "p1", "content": "", "author_id": "u3", "parent_id": "c1",
      "upvotes": 1, "downvotes": 0, "is_deleted": true,
      "created_at": "2023-05-30T14:00:00Z", "updated_at": "2023-05-30T14:00:00Z" },
    { "id": "c3", "post_id": "p1", "content": "Agreed", "author_id": "u1", "parent_id": "c2",
      "upvotes": 2, "downvotes": 0,
      "created_at": "2023-05-30T15:00:00Z", "updated_at": "2023-05-30T15:00:00Z" },
    { "id": "c4", "post_id": "p2", "content": "Nice", "author_id": "u1", "parent_id": "gone",
      "upvotes": 1, "downvotes": 0,
      "created_at": "2023-05-30T16:00:00Z", "updated_at": "2023-05-30T16:00:00Z" }
  ],
  "subreddits": [
    { "id": "s1", "name": "rust", "description": "The Rust language",
      "member_count": 300000, "created_at": "2010-01-01T00:00:00Z" }
  ]
}"#;

fn write_snapshot() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(SNAPSHOT.as_bytes()).unwrap();
    file
}

fn config_for(path: &str, extra: &[(&str, &str)]) -> Config {
    let path = path.to_string();
    let extra: Vec<(String, String)> = extra
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Config::from_lookup(move |key| {
        if key == "SNAPSHOT_PATH" {
            return Some(path.clone());
        }
        extra
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    })
    .unwrap()
}

#[tokio::test]
async fn loads_records_with_mixed_timestamps() {
    let file = write_snapshot();
    let snapshot = load_snapshot(file.path()).await.unwrap();

    assert_eq!(snapshot.posts.len(), 2);
    assert_eq!(snapshot.posts[0].votes.user_vote, Some(VoteDirection::Up));
    assert_eq!(snapshot.posts[1].post_type, PostType::Image);
    assert_eq!(snapshot.posts[1].created_at.timestamp(), 1_685_404_800);
    assert_eq!(snapshot.comments_for("p1").len(), 3);
    assert!(snapshot.comments[0].replies.is_empty());
}

#[tokio::test]
async fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_snapshot(dir.path().join("absent.json")).await.unwrap_err();
    assert!(matches!(err, AppError::Io(_)));
}

#[tokio::test]
async fn malformed_json_is_a_json_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"{\"posts\": [").unwrap();
    let err = load_snapshot(file.path()).await.unwrap_err();
    assert!(matches!(err, AppError::Json(_)));
}

#[tokio::test]
async fn renders_ranked_feed_with_threads() {
    let file = write_snapshot();
    let snapshot = load_snapshot(file.path()).await.unwrap();
    let config = config_for(
        file.path().to_str().unwrap(),
        &[("DEFAULT_SORT", "top"), ("SEARCH_QUERY", "rust")],
    );
    assert_eq!(config.default_sort, SortMode::Top);

    let feed = render_feed(&snapshot, &config, &FixedClock(common::now())).unwrap();

    let post_ids: Vec<&str> = feed.posts.iter().map(|p| p.post.id.as_str()).collect();
    assert_eq!(post_ids, vec!["p1", "p2"]);

    let thread = &feed.posts[0].comments;
    assert_eq!(shape(&thread.comments), "c1[c2[c3]]");
    assert!(thread.comments[0].replies[0].is_deleted);
    assert!(thread.anomalies.is_empty());

    let orphaned = &feed.posts[1].comments;
    assert_eq!(shape(&orphaned.comments), "c4");
    assert_eq!(orphaned.anomalies.len(), 1);

    let search = feed.search.as_ref().unwrap();
    assert_eq!(search.posts.len(), 1);
    assert_eq!(search.subreddits.len(), 1);

    let json = serde_json::to_value(&feed).unwrap();
    assert_eq!(json["sort"], "top");
}

#[tokio::test]
async fn subreddit_filter_limits_feed() {
    let file = write_snapshot();
    let snapshot = load_snapshot(file.path()).await.unwrap();
    let config = config_for(file.path().to_str().unwrap(), &[("SUBREDDIT", "HomeLab")]);

    let feed = render_feed(&snapshot, &config, &FixedClock(common::now())).unwrap();
    assert_eq!(feed.posts.len(), 1);
    assert_eq!(feed.posts[0].post.id, "p2");
    assert!(feed.search.is_none());
}
