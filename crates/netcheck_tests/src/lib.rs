//! Integration test suite for the netcheck pipeline.
//!
//! This crate exists only to run the seed scenarios from `spec.md` §8 as
//! integration tests. All actual test code lives in `tests/*.rs` files,
//! which depend on every other workspace crate as a dev-dependency.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p netcheck-tests
//! ```
