pub mod api;
pub mod config;
pub mod export;
pub mod leaderboard;
pub mod logging;
pub mod parser;
pub mod schema;
pub mod statistic;
