#![allow(dead_code)]

pub mod setup;

// Re-export main utilities for use by test files
#[allow(unused_imports)]
pub use setup::{body_json, get, ArenaSetup, ArenaSetupBuilder};
