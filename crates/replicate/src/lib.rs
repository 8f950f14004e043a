//! HTTP client for the Replicate predictions API.
//!
//! [`ReplicateClient`] submits a prompt to a hosted model, polls the
//! prediction until it reaches a terminal status, and downloads the
//! resulting image bytes.

pub mod client;
pub mod prediction;

pub use client::{ReplicateClient, ReplicateError};
pub use prediction::{Prediction, PredictionStatus};
