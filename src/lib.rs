pub mod config;
pub mod daily_log;
pub mod error;
pub mod fetch;
pub mod http_client;
pub mod leaderboard;
pub mod marathon;
pub mod providers;
pub mod stats_merge;
pub mod storage;
pub mod sync;
