pub mod generation;

pub use generation::{CreateGeneration, Generation, GenerationStatus};
