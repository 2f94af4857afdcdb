use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{Author, Votable, VoteTally, timestamp};

/// A comment and, once threaded, its replies.
///
/// `Clone`, `PartialEq` and `Drop` walk the reply tree with an explicit
/// stack, so arbitrarily deep threads stay off the call stack.
#[derive(Debug, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub post_id: String,
    #[serde(default)]
    pub content: String,
    pub author_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(flatten)]
    pub votes: VoteTally,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub updated_at: DateTime<Utc>,
    /// Populated by the tree builder; never authoritative on input.
    #[serde(default)]
    pub replies: Vec<Comment>,
    #[serde(default)]
    pub is_deleted: bool,
}

impl Comment {
    /// Copy of this comment without its replies.
    pub fn detached(&self) -> Comment {
        Comment {
            id: self.id.clone(),
            post_id: self.post_id.clone(),
            content: self.content.clone(),
            author_id: self.author_id.clone(),
            author: self.author.clone(),
            parent_id: self.parent_id.clone(),
            votes: self.votes.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
            replies: Vec::new(),
            is_deleted: self.is_deleted,
        }
    }

    fn same_fields(&self, other: &Comment) -> bool {
        self.id == other.id
            && self.post_id == other.post_id
            && self.content == other.content
            && self.author_id == other.author_id
            && self.author == other.author
            && self.parent_id == other.parent_id
            && self.votes == other.votes
            && self.created_at == other.created_at
            && self.updated_at == other.updated_at
            && self.is_deleted == other.is_deleted
    }
}

impl Clone for Comment {
    fn clone(&self) -> Self {
        // Breadth-first copy: every node is listed after its parent, so the
        // reverse pass below has finished a node's replies before attaching it.
        let mut sources: Vec<(&Comment, usize)> = vec![(self, 0)];
        let mut next = 0;
        while next < sources.len() {
            let (source, _) = sources[next];
            sources.extend(source.replies.iter().map(|reply| (reply, next)));
            next += 1;
        }

        let mut copies: Vec<Comment> = sources.iter().map(|(source, _)| source.detached()).collect();
        while copies.len() > 1 {
            let index = copies.len() - 1;
            let parent = sources[index].1;
            let Some(mut copy) = copies.pop() else { break };
            copy.replies.reverse();
            copies[parent].replies.push(copy);
        }

        match copies.pop() {
            Some(mut root) => {
                root.replies.reverse();
                root
            }
            None => self.detached(),
        }
    }
}

impl PartialEq for Comment {
    fn eq(&self, other: &Self) -> bool {
        let mut pending: Vec<(&Comment, &Comment)> = vec![(self, other)];
        while let Some((left, right)) = pending.pop() {
            if !left.same_fields(right) || left.replies.len() != right.replies.len() {
                return false;
            }
            pending.extend(left.replies.iter().zip(right.replies.iter()));
        }
        true
    }
}

impl Drop for Comment {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.replies);
        while let Some(mut comment) = pending.pop() {
            pending.append(&mut comment.replies);
        }
    }
}

impl Votable for Comment {
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

// Create comment request
#[derive(Debug, Validate, Deserialize)]
pub struct CreateCommentRequest {
    #[validate(length(min = 1, max = 10000))]
    pub content: String,
    pub post_id: String,
    pub parent_id: Option<String>,
}
