//! Testing utilities for docsearch.
//!
//! This module provides a recording [`Fetcher`](crate::fetch::Fetcher) that
//! serves canned pages, statuses, and failures, optionally after a delay.

mod mocks;

pub use mocks::{MockResponse, RecordingFetcher};
