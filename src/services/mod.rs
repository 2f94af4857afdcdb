pub mod comment_service;
pub mod feed_service;
pub mod ranking_service;
pub mod search_service;
pub mod vote_service;
