pub mod board;
pub mod bounce;
pub mod demo_feed;
pub mod http_cache;
pub mod http_client;
pub mod model;
pub mod roles;
pub mod schedule_fetch;
pub mod stats_fetch;
pub mod teams;
