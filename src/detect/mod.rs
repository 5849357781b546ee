pub mod field_classifier;
pub mod signup_detector;
pub mod submit_detector;
