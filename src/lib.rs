pub mod export;
pub mod filters;
pub mod http_cache;
pub mod http_client;
pub mod model;
pub mod persist;
pub mod sample_feed;
pub mod session;
pub mod summary;
pub mod transfer_fetch;
