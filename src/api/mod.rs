pub mod api_model;
pub mod harness;
