pub mod pipeline;
pub mod steps;

pub use pipeline::{Pipeline, Stage};
pub use steps::{prepare_build_dir, prepare_work_dir, run_step, write_failure_log};
