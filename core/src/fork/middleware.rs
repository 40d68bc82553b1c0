// strata/src/fork/middleware.rs

//! Defines the `ForkedMiddleware` extension point, the `Fork<F>` adapter that makes any
//! forked middleware a regular chain entry, and the closure-driven `SelectorFork`.

use crate::core::context::Context;
use crate::core::middleware::{Middleware, Payload};
use crate::fork::pipeline::ForkArms;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use tracing::{event, Level};

/// Which arm of a fork should handle a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Branch {
  Left,
  Right,
  /// Run neither arm; the fork passes through.
  Neither,
}

/// A middleware that delegates to at most one of two sub-pipelines per payload.
///
/// Implementors own a `ForkArms` (handed to their constructor by the resolver) and decide
/// per payload which arm runs. Wrap an implementor in `Fork` to place it in a chain;
/// `MiddlewareRegistry::register_fork` does this automatically.
#[async_trait]
pub trait ForkedMiddleware: Send {
  fn arms(&self) -> &ForkArms;

  /// Chooses the arm for `payload`. Evaluated on every call, never memoized.
  fn choose_pipeline(&self, payload: &Payload) -> Branch;

  /// Post-work for the fork stage. No-op unless overridden.
  async fn after(&mut self, _context: &mut Context, _payload: &Payload) {}
}

/// Adapts a `ForkedMiddleware` into a `Middleware`.
///
/// `before` runs the chosen arm against the parent's context and returns its result;
/// with `Branch::Neither` it returns `true` without delegating.
pub struct Fork<F> {
  inner: F,
}

impl<F: ForkedMiddleware> Fork<F> {
  pub fn new(inner: F) -> Self {
    Self { inner }
  }

  pub fn inner(&self) -> &F {
    &self.inner
  }

  pub fn into_inner(self) -> F {
    self.inner
  }
}

#[async_trait]
impl<F> Middleware for Fork<F>
where
  F: ForkedMiddleware + 'static,
{
  async fn before(&mut self, context: &mut Context, payload: &Payload) -> bool {
    let branch = self.inner.choose_pipeline(payload);
    match self.inner.arms().select(branch) {
      Some(arm) => {
        event!(Level::DEBUG, fork = %std::any::type_name::<F>(), ?branch, "Delegating to fork arm.");
        arm.process_with_context(context, payload).await
      }
      None => {
        event!(Level::DEBUG, fork = %std::any::type_name::<F>(), "No fork arm chosen, passing through.");
        true
      }
    }
  }

  async fn after(&mut self, context: &mut Context, payload: &Payload) {
    self.inner.after(context, payload).await
  }

  fn name(&self) -> &'static str {
    std::any::type_name::<F>()
  }
}

/// Strategy function choosing a fork arm from the payload.
pub type BranchSelector = Arc<dyn Fn(&Payload) -> Branch + Send + Sync>;

/// A fork whose arm selection is a closure rather than a dedicated type.
#[derive(Clone)]
pub struct SelectorFork {
  arms: ForkArms,
  selector: BranchSelector,
}

impl SelectorFork {
  pub fn new(arms: ForkArms, selector: impl Fn(&Payload) -> Branch + Send + Sync + 'static) -> Self {
    Self {
      arms,
      selector: Arc::new(selector),
    }
  }

  /// Builds a fork that reuses an already shared selector.
  pub fn with_selector(arms: ForkArms, selector: BranchSelector) -> Self {
    Self { arms, selector }
  }
}

impl ForkedMiddleware for SelectorFork {
  fn arms(&self) -> &ForkArms {
    &self.arms
  }

  fn choose_pipeline(&self, payload: &Payload) -> Branch {
    (self.selector)(payload)
  }
}

impl fmt::Debug for SelectorFork {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("SelectorFork").field("arms", &self.arms).finish()
  }
}
