//! cosmos-console: drives a fixed catalog of Gremlin queries through a
//! single graph session and reports results and service diagnostics.
//!
//! The catalog builds a small social graph (vertices, edges), walks it
//! (traversals, counts, sorting), then tears parts of it down again. Later
//! entries depend on earlier ones, so execution is strictly in catalog order
//! and halts at the first failure.

pub mod catalog;
pub mod error;
pub mod runner;
