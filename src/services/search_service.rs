use validator::Validate;

use crate::{
    error::Result,
    models::{Post, SearchQuery, SearchResults, Subreddit},
};

/// Case-insensitive substring search over post text and subreddit names.
pub fn search_content(
    posts: &[Post],
    subreddits: &[Subreddit],
    query: &SearchQuery,
) -> Result<SearchResults> {
    query.validate()?;

    let needle = query.q.trim().to_lowercase();

    let matched_posts: Vec<Post> = posts
        .iter()
        .filter(|post| {
            post.title.to_lowercase().contains(&needle)
                || post.content.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect();

    let matched_subreddits: Vec<Subreddit> = subreddits
        .iter()
        .filter(|subreddit| {
            subreddit.name.to_lowercase().contains(&needle)
                || subreddit.description.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect();

    let results = SearchResults {
        query: query.q.clone(),
        posts: matched_posts,
        subreddits: matched_subreddits,
    };

    tracing::debug!(
        query = %results.query,
        total = results.total_results(),
        "Search completed"
    );

    Ok(results)
}
