#![allow(dead_code)]

use aggregator_core::models::{Comment, Post, PostType, VoteDirection, VoteTally};
use chrono::{DateTime, TimeZone, Utc};

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 6, 1, 0, 0, 0).unwrap()
}

pub fn day(d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 1, d, 0, 0, 0).unwrap()
}

pub fn post(id: &str, upvotes: u32, downvotes: u32) -> Post {
    post_at(id, upvotes, downvotes, day(1))
}

pub fn post_at(id: &str, upvotes: u32, downvotes: u32, created_at: DateTime<Utc>) -> Post {
    Post {
        id: id.to_string(),
        title: format!("Post {}", id),
        content: format!("Body of post {}", id),
        author_id: "author".to_string(),
        author: None,
        subreddit_id: "t5_rust".to_string(),
        subreddit: "rust".to_string(),
        votes: VoteTally::new(upvotes, downvotes),
        comment_count: 0,
        created_at,
        updated_at: created_at,
        post_type: PostType::Text,
        url: None,
        thumbnail: None,
    }
}

pub fn voted_post(id: &str, upvotes: u32, downvotes: u32, vote: VoteDirection) -> Post {
    let mut post = post(id, upvotes, downvotes);
    post.votes.user_vote = Some(vote);
    post
}

pub fn comment(id: &str, parent_id: Option<&str>) -> Comment {
    Comment {
        id: id.to_string(),
        post_id: "p1".to_string(),
        content: format!("Comment {}", id),
        author_id: "author".to_string(),
        author: None,
        parent_id: parent_id.map(str::to_string),
        votes: VoteTally::new(1, 0),
        created_at: day(2),
        updated_at: day(2),
        replies: Vec::new(),
        is_deleted: false,
    }
}

pub fn ids<T: aggregator_core::models::Votable>(items: &[T]) -> Vec<String> {
    items.iter().map(|item| item.id().to_string()).collect()
}

/// `id -> [child ids]` rendering of a forest, e.g. `1[2[4],3]`.
pub fn shape(forest: &[Comment]) -> String {
    forest
        .iter()
        .map(|comment| {
            if comment.replies.is_empty() {
                comment.id.clone()
            } else {
                format!("{}[{}]", comment.id, shape(&comment.replies))
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// A single thread nested `depth` levels deep: `c0 <- c1 <- ... <- c{depth-1}`.
pub fn deep_chain(depth: usize) -> Vec<Comment> {
    let mut comments = vec![comment("c0", None)];
    for i in 1..depth {
        let parent = format!("c{}", i - 1);
        comments.push(comment(&format!("c{}", i), Some(parent.as_str())));
    }
    comments
}

/// Follows the first reply at each level down to the bottom of the thread.
pub fn deepest(forest: &[Comment]) -> Option<&Comment> {
    let mut current = forest.first()?;
    while let Some(reply) = current.replies.first() {
        current = reply;
    }
    Some(current)
}
