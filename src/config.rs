use std::env;

use crate::{
    error::{AppError, Result},
    services::{
        feed_service::{DEFAULT_FEED_LIMIT, TimeRange},
        ranking_service::SortMode,
    },
};

#[derive(Debug, Clone)]
pub struct Config {
    pub snapshot_path: String,
    pub default_sort: SortMode,
    pub feed_limit: usize,
    pub time_range: Option<TimeRange>,
    pub subreddit: Option<String>,
    pub search_query: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup, so tests never touch the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let snapshot_path = lookup("SNAPSHOT_PATH")
            .filter(|path| !path.trim().is_empty())
            .ok_or_else(|| AppError::Config("SNAPSHOT_PATH must be set".to_string()))?;

        let time_range = match lookup("TIME_RANGE") {
            Some(raw) => Some(
                raw.parse::<TimeRange>()
                    .map_err(|e| AppError::Config(format!("TIME_RANGE: {}", e)))?,
            ),
            None => None,
        };

        let feed_limit = match lookup("FEED_LIMIT") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .map_err(|e| AppError::Config(format!("FEED_LIMIT: {}", e)))?,
            None => DEFAULT_FEED_LIMIT,
        };

        Ok(Self {
            snapshot_path,
            default_sort: SortMode::parse(&lookup("DEFAULT_SORT").unwrap_or_default()),
            feed_limit,
            time_range,
            subreddit: lookup("SUBREDDIT").filter(|s| !s.trim().is_empty()),
            search_query: lookup("SEARCH_QUERY").filter(|q| !q.trim().is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_snapshot_is_set() {
        let config = Config::from_lookup(lookup_from(&[("SNAPSHOT_PATH", "data.json")])).unwrap();
        assert_eq!(config.snapshot_path, "data.json");
        assert_eq!(config.default_sort, SortMode::Hot);
        assert_eq!(config.feed_limit, DEFAULT_FEED_LIMIT);
        assert!(config.time_range.is_none());
        assert!(config.subreddit.is_none());
    }

    #[test]
    fn missing_snapshot_path_is_an_error() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn unknown_sort_falls_back_to_hot() {
        let config = Config::from_lookup(lookup_from(&[
            ("SNAPSHOT_PATH", "data.json"),
            ("DEFAULT_SORT", "sideways"),
            ("FEED_LIMIT", " 10 "),
            ("TIME_RANGE", "week"),
        ]))
        .unwrap();
        assert_eq!(config.default_sort, SortMode::Hot);
        assert_eq!(config.feed_limit, 10);
        assert_eq!(config.time_range, Some(TimeRange::Week));
    }

    #[test]
    fn bad_feed_limit_is_rejected() {
        for raw in ["many", "-3", ""] {
            let err = Config::from_lookup(lookup_from(&[
                ("SNAPSHOT_PATH", "data.json"),
                ("FEED_LIMIT", raw),
            ]))
            .unwrap_err();
            assert!(
                matches!(err, AppError::Config(ref msg) if msg.starts_with("FEED_LIMIT")),
                "{:?}",
                err
            );
        }
    }

    #[test]
    fn bad_time_range_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[
            ("SNAPSHOT_PATH", "data.json"),
            ("TIME_RANGE", "decade"),
        ]))
        .unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
