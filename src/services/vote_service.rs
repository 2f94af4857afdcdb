use crate::{
    error::{AppError, Result},
    models::{Comment, Post, Votable, VoteDirection, VoteTally},
    services::comment_service::find_comment_mut,
};

impl VoteTally {
    /// Retracts the current ballot, then counts `new_vote`.
    ///
    /// A retraction that would underflow a counter clamps it to zero and logs
    /// a warning; it means the caller handed in an inconsistent `user_vote`.
    pub fn apply(&self, new_vote: VoteDirection) -> VoteTally {
        self.apply_for(None, new_vote)
    }

    /// Same as [`VoteTally::apply`], naming `item_id` in any clamp warning.
    fn apply_for(&self, item_id: Option<&str>, new_vote: VoteDirection) -> VoteTally {
        let mut upvotes = self.upvotes;
        let mut downvotes = self.downvotes;

        match self.user_vote {
            Some(VoteDirection::Up) => {
                upvotes = retract(upvotes, "upvotes", item_id);
            }
            Some(VoteDirection::Down) => {
                downvotes = retract(downvotes, "downvotes", item_id);
            }
            Some(VoteDirection::None) | None => {}
        }

        match new_vote {
            VoteDirection::Up => upvotes = upvotes.saturating_add(1),
            VoteDirection::Down => downvotes = downvotes.saturating_add(1),
            VoteDirection::None => {}
        }

        VoteTally {
            upvotes,
            downvotes,
            user_vote: Some(new_vote),
        }
    }
}

fn retract(counter: u32, name: &str, item_id: Option<&str>) -> u32 {
    if counter == 0 {
        tracing::warn!(
            item_id = item_id.unwrap_or("<detached>"),
            counter = name,
            "Vote retraction would drive counter negative, clamping to zero"
        );
        return 0;
    }
    counter - 1
}

/// Returns a copy of `item` with the vote change applied.
pub fn apply_vote<T: Votable + Clone>(item: &T, new_vote: VoteDirection) -> T {
    let mut updated = item.clone();
    let tally = item.tally().apply_for(Some(item.id()), new_vote);
    *updated.tally_mut() = tally;
    updated
}

/// Applies a vote to the post with `post_id`, returning a fresh list.
pub fn vote_post_in_feed(posts: &[Post], post_id: &str, vote: VoteDirection) -> Result<Vec<Post>> {
    let position = posts
        .iter()
        .position(|post| post.id == post_id)
        .ok_or_else(|| AppError::NotFound(format!("Post {} not found", post_id)))?;

    let mut updated = posts.to_vec();
    updated[position] = apply_vote(&posts[position], vote);
    Ok(updated)
}

/// Applies a vote to a comment anywhere in `forest`, returning a fresh forest.
pub fn vote_comment_in_tree(
    forest: &[Comment],
    comment_id: &str,
    vote: VoteDirection,
) -> Result<Vec<Comment>> {
    let mut updated = forest.to_vec();
    let target = find_comment_mut(&mut updated, comment_id)
        .ok_or_else(|| AppError::NotFound(format!("Comment {} not found", comment_id)))?;
    target.votes = target.votes.apply_for(Some(comment_id), vote);
    Ok(updated)
}
