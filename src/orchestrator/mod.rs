pub mod batch;
pub mod pacing;
