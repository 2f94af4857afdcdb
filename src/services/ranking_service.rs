use std::{cmp::Ordering, fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Comment, Votable};

/// Fixed zero-point for the hot decay term. Opaque; only consistency
/// across calls matters.
pub const EPOCH_REFERENCE: f64 = 1_661_990_400.0;

/// Seconds of age that cost one order of magnitude of score.
pub const HOT_DECAY_SECONDS: f64 = 45_000.0;

// Sorting options for posts and comments
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum SortMode {
    #[default]
    Hot,
    New,
    Top,
    Controversial,
}

impl SortMode {
    /// Parses a sort name, falling back to `Hot` for anything unrecognized.
    pub fn parse(raw: &str) -> SortMode {
        raw.parse().unwrap_or_else(|_| {
            if !raw.is_empty() {
                tracing::debug!("Unknown sort mode {:?}, falling back to hot", raw);
            }
            SortMode::Hot
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortMode::Hot => "hot",
            SortMode::New => "new",
            SortMode::Top => "top",
            SortMode::Controversial => "controversial",
        }
    }
}

impl FromStr for SortMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hot" => Ok(SortMode::Hot),
            "new" => Ok(SortMode::New),
            "top" => Ok(SortMode::Top),
            "controversial" => Ok(SortMode::Controversial),
            _ => Err(format!("Unknown SortMode: {}", s)),
        }
    }
}

impl From<String> for SortMode {
    fn from(raw: String) -> Self {
        SortMode::parse(&raw)
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source of "now" for the hot score.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Log-scaled vote magnitude decayed by age. Higher is hotter.
pub fn hot_score<T: Votable + ?Sized>(item: &T, now: DateTime<Utc>) -> f64 {
    let score = item.score();
    let order = (score.unsigned_abs().max(1) as f64).log10();
    let sign = match score.cmp(&0) {
        Ordering::Greater => 1.0,
        Ordering::Less => -1.0,
        Ordering::Equal => 0.0,
    };

    let seconds_ago = (now - item.created_at()).num_milliseconds() as f64 / 1000.0;
    let seconds = seconds_ago - EPOCH_REFERENCE;

    sign * order - seconds / HOT_DECAY_SECONDS
}

/// Returns a new, stably sorted copy of `items`. Equal keys keep input order.
pub fn rank<T: Votable + Clone>(items: &[T], mode: SortMode, now: DateTime<Utc>) -> Vec<T> {
    let mut ranked = items.to_vec();
    rank_in_place(&mut ranked, mode, now);
    ranked
}

/// Stably reorders `items` by `mode` without copying them.
pub fn rank_in_place<T: Votable>(items: &mut Vec<T>, mode: SortMode, now: DateTime<Utc>) {
    match mode {
        SortMode::New => items.sort_by(|a, b| b.created_at().cmp(&a.created_at())),
        SortMode::Top => items.sort_by(|a, b| b.score().cmp(&a.score())),
        SortMode::Controversial => {
            items.sort_by(|a, b| b.tally().engagement().cmp(&a.tally().engagement()))
        }
        SortMode::Hot => {
            let mut keyed: Vec<(f64, T)> = std::mem::take(items)
                .into_iter()
                .map(|item| (hot_score(&item, now), item))
                .collect();
            keyed.sort_by(|(a, _), (b, _)| b.total_cmp(a));
            items.extend(keyed.into_iter().map(|(_, item)| item));
        }
    }
}

/// Ranks siblings at every depth of an assembled comment forest.
///
/// The forest is copied once; every sibling list is then sorted in place.
pub fn rank_tree(forest: &[Comment], mode: SortMode, now: DateTime<Utc>) -> Vec<Comment> {
    let mut ranked = forest.to_vec();
    rank_in_place(&mut ranked, mode, now);

    let mut pending: Vec<&mut Comment> = ranked.iter_mut().collect();
    while let Some(comment) = pending.pop() {
        if comment.replies.is_empty() {
            continue;
        }
        rank_in_place(&mut comment.replies, mode, now);
        pending.extend(comment.replies.iter_mut());
    }

    ranked
}
