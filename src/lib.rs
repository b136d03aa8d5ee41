//! Farmer leaderboard and regional crop analytics over crop-submission exports.
//!
//! Records come in through a [`loader::SubmissionSource`], get ranked by
//! [`ranking::Leaderboard`] and summarized by [`dashboard::summarize`].
pub mod dashboard;
pub mod error;
pub mod loader;
pub mod output;
pub mod ranking;
pub mod regional;
pub mod types;
pub mod util;

pub use crate::dashboard::{summarize, DashboardSummary, Filter};
pub use crate::error::{Error, Result};
pub use crate::loader::{CsvSource, JsonSource, LoadReport, SubmissionSource};
pub use crate::ranking::{Leaderboard, Medal};
pub use crate::types::{CategoryCount, LeaderboardEntry, SubmissionRecord};
