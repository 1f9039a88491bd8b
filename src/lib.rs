pub mod archive;
pub mod config;
pub mod course;
pub mod error;
pub mod export;
pub mod fake_field;
pub mod features;
pub mod field_stats;
pub mod leaderboard;
pub mod par;
pub mod pipeline;
pub mod ranking;
pub mod rounds;
pub mod tables;
pub mod thru;
