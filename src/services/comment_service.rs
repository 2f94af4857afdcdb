use std::{collections::HashMap, fmt};

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, Result},
    models::{Comment, CreateCommentRequest, VoteDirection, VoteTally},
};

/// Structural defect found while assembling a forest. Every anomaly promotes
/// the offending comment to a top-level root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeAnomaly {
    Orphan { id: String, parent_id: String },
    SelfParent { id: String },
    ForeignParent { id: String, parent_id: String },
    Cycle { id: String, parent_id: String },
    DuplicateId { id: String },
}

impl fmt::Display for TreeAnomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeAnomaly::Orphan { id, parent_id } => {
                write!(f, "comment {} replies to missing comment {}", id, parent_id)
            }
            TreeAnomaly::SelfParent { id } => write!(f, "comment {} replies to itself", id),
            TreeAnomaly::ForeignParent { id, parent_id } => write!(
                f,
                "comment {} replies to comment {} on another post",
                id, parent_id
            ),
            TreeAnomaly::Cycle { id, parent_id } => write!(
                f,
                "comment {} closes a reply cycle through {}",
                id, parent_id
            ),
            TreeAnomaly::DuplicateId { id } => write!(f, "comment id {} appears more than once", id),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CommentForest {
    pub comments: Vec<Comment>,
    pub anomalies: Vec<TreeAnomaly>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    Unseen,
    OnPath,
    Done,
}

/// Assembles top-level comments with their replies populated, logging any
/// structural anomaly.
pub fn build_tree(comments: &[Comment]) -> Vec<Comment> {
    let forest = build_tree_with_report(comments);
    for anomaly in &forest.anomalies {
        tracing::warn!(%anomaly, "Malformed comment graph");
    }
    forest.comments
}

/// Assembles the forest in O(n) and reports what had to be repaired.
///
/// Roots and siblings keep input order. Orphans, self-replies, replies across
/// posts and cycle members are promoted to roots instead of being dropped.
pub fn build_tree_with_report(comments: &[Comment]) -> CommentForest {
    let mut anomalies = Vec::new();

    let mut index: HashMap<&str, usize> = HashMap::with_capacity(comments.len());
    for (i, comment) in comments.iter().enumerate() {
        if index.contains_key(comment.id.as_str()) {
            anomalies.push(TreeAnomaly::DuplicateId {
                id: comment.id.clone(),
            });
        } else {
            index.insert(comment.id.as_str(), i);
        }
    }

    let mut parent_of: Vec<Option<usize>> = comments
        .iter()
        .map(|comment| {
            let parent_id = comment.parent_id.as_deref()?;
            if parent_id == comment.id {
                anomalies.push(TreeAnomaly::SelfParent {
                    id: comment.id.clone(),
                });
                return None;
            }
            let Some(&parent) = index.get(parent_id) else {
                anomalies.push(TreeAnomaly::Orphan {
                    id: comment.id.clone(),
                    parent_id: parent_id.to_string(),
                });
                return None;
            };
            if comments[parent].post_id != comment.post_id {
                anomalies.push(TreeAnomaly::ForeignParent {
                    id: comment.id.clone(),
                    parent_id: parent_id.to_string(),
                });
                return None;
            }
            Some(parent)
        })
        .collect();

    break_cycles(comments, &mut parent_of, &mut anomalies);

    let mut roots = Vec::new();
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); comments.len()];
    for (i, parent) in parent_of.iter().enumerate() {
        match parent {
            Some(p) => children[*p].push(i),
            None => roots.push(i),
        }
    }

    // Pre-order over the repaired forest; assembling it back to front
    // guarantees every child is finished before its parent.
    let mut order = Vec::with_capacity(comments.len());
    let mut stack: Vec<usize> = roots.iter().rev().copied().collect();
    while let Some(node) = stack.pop() {
        order.push(node);
        stack.extend(children[node].iter().rev().copied());
    }

    let mut built: Vec<Option<Comment>> = vec![None; comments.len()];
    for &node in order.iter().rev() {
        let mut comment = comments[node].detached();
        comment.replies = children[node]
            .iter()
            .filter_map(|&child| built[child].take())
            .collect();
        built[node] = Some(comment);
    }

    let comments = roots
        .iter()
        .filter_map(|&root| built[root].take())
        .collect();

    CommentForest {
        comments,
        anomalies,
    }
}

/// Walks each parent chain once; a chain that re-enters itself is cut at the
/// cycle member that appears first in the input.
fn break_cycles(
    comments: &[Comment],
    parent_of: &mut [Option<usize>],
    anomalies: &mut Vec<TreeAnomaly>,
) {
    let mut state = vec![Visit::Unseen; comments.len()];
    let mut path: Vec<usize> = Vec::new();

    for start in 0..comments.len() {
        let mut cursor = Some(start);
        while let Some(node) = cursor {
            match state[node] {
                Visit::Done => break,
                Visit::OnPath => {
                    let Some(cycle_start) = path.iter().position(|&n| n == node) else {
                        break;
                    };
                    if let Some(&member) = path[cycle_start..].iter().min() {
                        if let Some(parent) = parent_of[member].take() {
                            anomalies.push(TreeAnomaly::Cycle {
                                id: comments[member].id.clone(),
                                parent_id: comments[parent].id.clone(),
                            });
                        }
                    }
                    break;
                }
                Visit::Unseen => {
                    state[node] = Visit::OnPath;
                    path.push(node);
                    cursor = parent_of[node];
                }
            }
        }
        for node in path.drain(..) {
            state[node] = Visit::Done;
        }
    }
}

/// Pre-order list of every comment in `forest`, with replies stripped.
pub fn flatten(forest: &[Comment]) -> Vec<Comment> {
    let mut flat = Vec::new();
    let mut stack: Vec<&Comment> = forest.iter().rev().collect();
    while let Some(comment) = stack.pop() {
        flat.push(comment.detached());
        stack.extend(comment.replies.iter().rev());
    }
    flat
}

pub fn count_comments(forest: &[Comment]) -> usize {
    let mut total = 0;
    let mut stack: Vec<&Comment> = forest.iter().collect();
    while let Some(comment) = stack.pop() {
        total += 1;
        stack.extend(comment.replies.iter());
    }
    total
}

fn contains_comment(forest: &[Comment], id: &str) -> bool {
    let mut stack: Vec<&Comment> = forest.iter().collect();
    while let Some(comment) = stack.pop() {
        if comment.id == id {
            return true;
        }
        stack.extend(comment.replies.iter());
    }
    false
}

/// Index path from the forest root list down to the first comment, in
/// pre-order, whose id is `id`.
fn locate(forest: &[Comment], id: &str) -> Option<Vec<usize>> {
    // Each trail entry is (parent's trail slot, index among its siblings).
    let mut trail: Vec<(Option<usize>, usize)> = Vec::new();
    let mut stack: Vec<(&Comment, usize)> = Vec::new();

    for (index, root) in forest.iter().enumerate().rev() {
        trail.push((None, index));
        stack.push((root, trail.len() - 1));
    }

    while let Some((comment, slot)) = stack.pop() {
        if comment.id == id {
            let mut path = Vec::new();
            let mut cursor = Some(slot);
            while let Some(at) = cursor {
                let (parent, index) = trail[at];
                path.push(index);
                cursor = parent;
            }
            path.reverse();
            return Some(path);
        }
        for (index, reply) in comment.replies.iter().enumerate().rev() {
            trail.push((Some(slot), index));
            stack.push((reply, trail.len() - 1));
        }
    }
    None
}

/// Finds a comment at any depth of `forest` for in-place edits.
pub(crate) fn find_comment_mut<'a>(forest: &'a mut [Comment], id: &str) -> Option<&'a mut Comment> {
    let path = locate(forest, id)?;
    let (&first, rest) = path.split_first()?;
    let mut comment = forest.get_mut(first)?;
    for &index in rest {
        comment = comment.replies.get_mut(index)?;
    }
    Some(comment)
}

/// Appends `new_comment` as the last reply of `parent_id`, searched at any
/// depth, or as the last root when `parent_id` is `None`.
pub fn insert_reply(
    forest: &[Comment],
    parent_id: Option<&str>,
    mut new_comment: Comment,
) -> Result<Vec<Comment>> {
    if contains_comment(forest, &new_comment.id) {
        return Err(AppError::Conflict(format!(
            "Comment {} already exists",
            new_comment.id
        )));
    }

    let mut updated = forest.to_vec();
    new_comment.parent_id = parent_id.map(str::to_string);

    let Some(parent_id) = parent_id else {
        updated.push(new_comment);
        return Ok(updated);
    };

    let parent = find_comment_mut(&mut updated, parent_id)
        .ok_or_else(|| AppError::ParentNotFound(parent_id.to_string()))?;

    if parent.post_id != new_comment.post_id {
        return Err(AppError::BadRequest(format!(
            "Comment {} belongs to post {}, not {}",
            parent.id, parent.post_id, new_comment.post_id
        )));
    }

    parent.replies.push(new_comment);
    Ok(updated)
}

/// Builds a freshly submitted comment, counting the author's own upvote.
pub fn new_comment(
    request: &CreateCommentRequest,
    author_id: &str,
    now: DateTime<Utc>,
) -> Result<Comment> {
    request.validate()?;

    Ok(Comment {
        id: Uuid::new_v4().to_string(),
        post_id: request.post_id.clone(),
        content: request.content.clone(),
        author_id: author_id.to_string(),
        author: None,
        parent_id: request.parent_id.clone(),
        votes: VoteTally {
            upvotes: 1,
            downvotes: 0,
            user_vote: Some(VoteDirection::Up),
        },
        created_at: now,
        updated_at: now,
        replies: Vec::new(),
        is_deleted: false,
    })
}
