// strata/src/core/middleware.rs

//! Defines the `Middleware` contract and the factory type pipelines are built from.

use crate::core::context::Context;
use async_trait::async_trait;
use std::any::Any;
use std::sync::Arc;

/// The type-erased payload middleware operate on.
///
/// `Pipeline<P>` is typed at its entry point; once the payload enters the chain it is seen
/// as `&Payload` so that forks and shared middleware agree on one representation.
/// Use `payload.downcast_ref::<P>()` to recover the concrete type.
pub type Payload = dyn Any + Send + Sync;

/// A unit of work with paired hooks around the remainder of a chain.
///
/// A fresh instance is created for every execution, so a middleware may keep
/// request-scoped state in `self` between `before` and `after`.
#[async_trait]
pub trait Middleware: Send {
  /// Performs the pre-work for this stage.
  ///
  /// Returning `false` stops the chain: no later middleware runs and this
  /// middleware's own `after` is skipped. Returning `true` continues.
  async fn before(&mut self, context: &mut Context, payload: &Payload) -> bool;

  /// Performs the post-work for this stage.
  ///
  /// Called exactly once for every `before` that returned `true`, after the rest of the
  /// chain has unwound, even if a later stage returned `false`.
  async fn after(&mut self, context: &mut Context, payload: &Payload);

  /// Name used in tracing spans.
  fn name(&self) -> &'static str {
    std::any::type_name::<Self>()
  }
}

/// A zero-argument constructor for a middleware instance.
///
/// Pipelines store factories rather than instances so each execution gets its own
/// middleware and no state leaks across invocations.
pub type MiddlewareFactory = Arc<dyn Fn() -> Box<dyn Middleware> + Send + Sync>;

/// Wraps a constructor for a concrete middleware type into a `MiddlewareFactory`.
pub fn factory_fn<M, F>(ctor: F) -> MiddlewareFactory
where
  M: Middleware + 'static,
  F: Fn() -> M + Send + Sync + 'static,
{
  Arc::new(move || Box::new(ctor()) as Box<dyn Middleware>)
}
