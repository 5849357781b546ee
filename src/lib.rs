//! Detects self-service signup workflows on web pages and exercises them
//! with synthetic identities through a headless browser bridge.

pub mod api;
pub mod browser;
pub mod cli;
pub mod detect;
pub mod error;
pub mod identity;
pub mod orchestrator;
pub mod page;
pub mod trace;

pub use api::harness::{HarnessSettings, SignupHarness, TargetPolicy};
pub use error::HarnessError;
