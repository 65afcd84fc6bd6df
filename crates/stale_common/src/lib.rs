//! Shared foundational types for the stale change-detection engine.
//!
//! This crate provides the content hash type used throughout the workspace to
//! decide whether a source file's bytes have changed between test runs.

#![warn(missing_docs)]

pub mod hash;

pub use hash::ContentHash;
