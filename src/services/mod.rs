pub mod diff_service;
pub mod feed_parser;
pub mod feed_service;
pub mod notify_service;
pub mod retry;
