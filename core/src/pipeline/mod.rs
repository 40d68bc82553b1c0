// strata/src/pipeline/mod.rs

//! Defines the `Pipeline<P>` struct and its execution logic.

pub mod definition;
pub mod execution;

// Re-export the main Pipeline struct
pub use definition::Pipeline;
