pub mod cache;
pub mod engine;
pub mod stats_service;

pub use cache::{cache_key, StatsCache};
pub use engine::StatsEngine;
pub use stats_service::StatsService;
