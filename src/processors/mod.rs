pub mod file_processor;
pub mod parallel_processor;
pub mod run_report;

pub use file_processor::FileProcessor;
pub use parallel_processor::ParallelProcessor;
pub use run_report::{FileFailure, FileStats, RunReport};
