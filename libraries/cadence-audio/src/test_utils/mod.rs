//! Test utilities for engine testing
//!
//! Provides a recording host runtime and in-memory audio fixtures.

pub mod fixtures;
pub mod recording_host;

pub use fixtures::*;
pub use recording_host::*;
