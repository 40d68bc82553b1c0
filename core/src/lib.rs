// src/lib.rs

//! Strata: an ASYNC middleware pipeline for Rust.
//!
//! Strata runs a payload through an ordered chain of middleware, with features like:
//!  - Paired `before`/`after` phases wrapped around the rest of the chain (onion order).
//!  - Short-circuiting: a `before` returning `false` stops the forward walk while the
//!    `after` phases of the stages that already succeeded still run.
//!  - A shared `Context` per invocation for passing data between stages.
//!  - Forks that route each payload into one of two sub-pipelines (or neither), sharing
//!    the parent's context.
//!  - A fluent builder that resolves middleware kinds through a pluggable resolver, with a
//!    type-keyed registry provided out of the box.

pub mod builder;
pub mod core;
pub mod error;
pub mod fork;
pub mod pipeline;
pub mod registry;
pub mod resolver;

// --- Re-exports for the Public API ---

pub use crate::core::context::Context;
pub use crate::core::kind::MiddlewareKind;
pub use crate::core::middleware::{factory_fn, Middleware, MiddlewareFactory, Payload};

pub use crate::pipeline::definition::Pipeline;
pub use crate::builder::PipelineBuilder;

pub use crate::fork::{
  fork_factory_fn, Branch, BranchSelector, Fork, ForkArms, ForkFactory, ForkedMiddleware, ForkedPipeline,
  SelectorFork,
};

pub use crate::resolver::ResolveMiddleware;
pub use crate::registry::MiddlewareRegistry;

pub use crate::error::{StrataError, StrataResult};

// Re-exported so middleware implementors use the same macro version as the traits.
pub use async_trait::async_trait;

/*
    Core Workflow:
    1. Implement `Middleware` for each stage (`#[strata::async_trait]`), and
       `ForkedMiddleware` for each branching point (or use `SelectorFork` with a closure).
    2. Create a `MiddlewareRegistry` and register a constructor per kind:
       `.register::<Auth, _>(Auth::new)`, `.register_fork::<ByRegion, _>(ByRegion::new)`.
    3. Assemble with `PipelineBuilder::new(Arc::new(registry))`:
       `.use_middleware::<Auth>()?`, `.fork::<ByRegion, _, _>(|l| ..., |r| ...)?`,
       then `.build::<MyPayload>()`.
    4. Call `pipeline.process(&payload).await` and inspect the returned `bool`.
*/
