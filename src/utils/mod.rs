//! Utility modules shared by the pipeline stages.

pub mod log;
