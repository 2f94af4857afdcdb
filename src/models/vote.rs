use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// A single viewer's ballot on a post or comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i16", into = "i16")]
pub enum VoteDirection {
    Up,
    None,
    Down,
}

impl VoteDirection {
    pub fn as_i16(self) -> i16 {
        match self {
            VoteDirection::Up => 1,
            VoteDirection::None => 0,
            VoteDirection::Down => -1,
        }
    }
}

impl TryFrom<i16> for VoteDirection {
    type Error = AppError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(VoteDirection::Up),
            0 => Ok(VoteDirection::None),
            -1 => Ok(VoteDirection::Down),
            other => Err(AppError::InvalidVote(other)),
        }
    }
}

impl From<VoteDirection> for i16 {
    fn from(vote: VoteDirection) -> Self {
        vote.as_i16()
    }
}

/// Vote counters plus the current viewer's own ballot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    pub upvotes: u32,
    pub downvotes: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_vote: Option<VoteDirection>,
}

impl VoteTally {
    pub fn new(upvotes: u32, downvotes: u32) -> Self {
        Self {
            upvotes,
            downvotes,
            user_vote: None,
        }
    }

    pub fn score(&self) -> i64 {
        i64::from(self.upvotes) - i64::from(self.downvotes)
    }

    /// Total engagement, the `controversial` sort key.
    pub fn engagement(&self) -> u64 {
        u64::from(self.upvotes) + u64::from(self.downvotes)
    }
}

/// Anything that carries vote counters and can be ranked.
pub trait Votable {
    fn id(&self) -> &str;
    fn created_at(&self) -> DateTime<Utc>;
    fn tally(&self) -> &VoteTally;
    fn tally_mut(&mut self) -> &mut VoteTally;

    fn score(&self) -> i64 {
        self.tally().score()
    }
}
