//! Shared utilities for Hiroba.
//!
//! Logger initialisation and timestamp helpers used by the server binary and
//! its integration tests.

pub mod logger;
pub mod time;
