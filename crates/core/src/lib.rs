//! Domain types and pure helpers shared by the db, replicate, and api crates.
//!
//! Deliberately I/O-free: everything here is usable from both the request
//! path and the background workers without pulling in sqlx or reqwest.

pub mod error;
pub mod generation;

pub use error::CoreError;
