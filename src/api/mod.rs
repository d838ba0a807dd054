//! Provides clients and utilities for interacting with external APIs.
//!
//! Includes:
//! - `nasa`: Client for NASA's open data APIs (api.nasa.gov).

mod nasa;

pub use nasa::*;
