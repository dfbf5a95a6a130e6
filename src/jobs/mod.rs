//! Encoder job supervision: progress scanning and the async runner.

pub mod progress;
pub mod runner;

pub use progress::{parse_duration_line, parse_time_token, ProgressScanner};
pub use runner::{JobEvent, JobHandle, JobOutcome, JobRunner, FAILURE_EXIT_CODE};
