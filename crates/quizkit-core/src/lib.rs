//! quizkit-core: data model, scoring, and the test-taking flow.
//!
//! This crate defines the persisted data model, the correctness predicate and
//! scoring function, the state provider that mirrors tests and results to a
//! [`traits::DataStore`], and the session state machine that drives one
//! attempt from start to submission.

pub mod authoring;
pub mod catalog;
pub mod error;
pub mod model;
pub mod review;
pub mod scoring;
pub mod seed;
pub mod session;
pub mod state;
pub mod traits;
