//! Shared test utilities for jobdesk integration tests.
//!
//! This module provides:
//! - `TestHarness` wiring both pipelines onto temp directories and a fixed clock
//! - Fake collaborators (senders, stores, blob backends)
//! - Builders for postings and in-memory PDF/DOCX fixtures

pub mod builders;
pub mod fakes;
pub mod harness;

pub use builders::*;
pub use fakes::*;
pub use harness::TestHarness;
