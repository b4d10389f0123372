//! Test module for determinism and integration tests.
//!
//! - **Determinism tests**: verify the same seed produces identical fights
//! - **Integration tests**: full fights through the public API
//! - **Helper functions**: entity and engine factories for test setup
//!
//! # Test Structure
//!
//! - `determinism.rs`: seed reproducibility and stream independence
//! - `integration.rs`: end-to-end fights, the async driver, the registry
//! - `helpers.rs`: factory functions shared by the suites

mod helpers;

pub use helpers::*;
