// strata/src/fork/mod.rs

//! Runtime branching into one of two sub-pipelines.
//!
//! A fork is an ordinary chain entry. Its `before` asks the concrete `ForkedMiddleware`
//! which arm to take and runs that arm's `ForkedPipeline` against the parent's context;
//! its `after` is supplied by the concrete fork and runs on unwind like any other stage.

pub mod middleware;
pub mod pipeline;

pub use middleware::{Branch, BranchSelector, Fork, ForkedMiddleware, SelectorFork};
pub use pipeline::{ForkArms, ForkedPipeline};

use std::sync::Arc;

use crate::core::middleware::Middleware;

/// Constructs a fresh fork middleware over a pair of already built arms.
pub type ForkFactory = Arc<dyn Fn(ForkArms) -> Box<dyn Middleware> + Send + Sync>;

/// Wraps a constructor for a concrete forked middleware into a `ForkFactory`.
pub fn fork_factory_fn<F, C>(ctor: C) -> ForkFactory
where
  F: ForkedMiddleware + 'static,
  C: Fn(ForkArms) -> F + Send + Sync + 'static,
{
  Arc::new(move |arms| Box::new(Fork::new(ctor(arms))) as Box<dyn Middleware>)
}
