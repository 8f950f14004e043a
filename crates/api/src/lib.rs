//! Magic Image Generation web server library.
//!
//! Exposes the building blocks (config, state, error handling, views,
//! routes, generation engine) so integration tests and the binary
//! entrypoint can both access them.

pub mod config;
pub mod engine;
pub mod error;
pub mod routes;
pub mod state;
pub mod views;
