// strata/src/builder.rs

//! Implements the fluent `PipelineBuilder` that assembles pipelines, including nested fork
//! sub-pipelines, from middleware kinds resolved through a `ResolveMiddleware`.

use crate::core::kind::MiddlewareKind;
use crate::core::middleware::{Middleware, MiddlewareFactory};
use crate::error::StrataResult;
use crate::fork::{ForkArms, ForkedMiddleware, ForkedPipeline};
use crate::pipeline::definition::Chain;
use crate::pipeline::Pipeline;
use crate::resolver::ResolveMiddleware;

use std::any::Any;
use std::fmt;
use std::sync::Arc;
use tracing::{event, instrument, Level};

/// Assembly session over an ordered list of middleware factories.
///
/// Every method consumes the builder and hands it back inside a `StrataResult`, so a
/// resolution failure ends the session: no partially assembled pipeline can escape.
/// `build` consumes the builder as well.
///
/// ```ignore
/// let pipeline = PipelineBuilder::new(registry.clone())
///   .use_middleware::<Authenticate>()?
///   .fork::<RouteByRegion, _, _>(
///     |left| left.use_middleware::<EuStorage>(),
///     |right| right.use_middleware::<UsStorage>(),
///   )?
///   .use_middleware::<Audit>()?
///   .build::<Request>();
///
/// let ok = pipeline.process(&request).await;
/// ```
pub struct PipelineBuilder {
  resolver: Arc<dyn ResolveMiddleware>,
  factories: Vec<MiddlewareFactory>,
}

impl PipelineBuilder {
  pub fn new(resolver: Arc<dyn ResolveMiddleware>) -> Self {
    Self {
      resolver,
      factories: Vec::new(),
    }
  }

  /// Appends middleware `M`, resolved through the resolver.
  pub fn use_middleware<M>(self) -> StrataResult<Self>
  where
    M: Middleware + 'static,
  {
    self.use_kind(MiddlewareKind::of::<M>())
  }

  /// Appends the middleware registered under `kind`.
  #[instrument(name = "PipelineBuilder::use_kind", skip_all, fields(kind = %kind, position = self.factories.len()))]
  pub fn use_kind(mut self, kind: MiddlewareKind) -> StrataResult<Self> {
    let factory = self.resolver.resolve_factory(&kind)?;
    self.factories.push(factory);
    event!(Level::DEBUG, "Middleware appended.");
    Ok(self)
  }

  /// Appends a fork of type `F` with arms configured by `configure_left` and
  /// `configure_right`.
  pub fn fork<F, L, R>(self, configure_left: L, configure_right: R) -> StrataResult<Self>
  where
    F: ForkedMiddleware + 'static,
    L: FnOnce(PipelineBuilder) -> StrataResult<PipelineBuilder>,
    R: FnOnce(PipelineBuilder) -> StrataResult<PipelineBuilder>,
  {
    self.fork_kind(MiddlewareKind::of::<F>(), configure_left, configure_right)
  }

  /// Appends the fork registered under `kind`.
  ///
  /// Each arm is populated by its callback on a fresh nested builder sharing this
  /// builder's resolver, then built immediately. The arms are built once and shared by
  /// every fork instance; a new fork instance is constructed per execution.
  #[instrument(name = "PipelineBuilder::fork_kind", skip_all, fields(kind = %kind, position = self.factories.len()))]
  pub fn fork_kind<L, R>(mut self, kind: MiddlewareKind, configure_left: L, configure_right: R) -> StrataResult<Self>
  where
    L: FnOnce(PipelineBuilder) -> StrataResult<PipelineBuilder>,
    R: FnOnce(PipelineBuilder) -> StrataResult<PipelineBuilder>,
  {
    let left = configure_left(self.nested())?.build_forked();
    let right = configure_right(self.nested())?.build_forked();
    event!(
      Level::DEBUG,
      left_len = left.len(),
      right_len = right.len(),
      "Fork arms built."
    );

    let arms = ForkArms::new(Arc::new(left), Arc::new(right));
    let create_fork = self.resolver.resolve_fork_factory(&kind)?;

    self.factories.push(Arc::new(move || create_fork(arms.clone())));
    event!(Level::DEBUG, "Fork appended.");
    Ok(self)
  }

  /// Number of stages appended so far.
  pub fn len(&self) -> usize {
    self.factories.len()
  }

  pub fn is_empty(&self) -> bool {
    self.factories.is_empty()
  }

  /// Freezes the accumulated stages into a pipeline accepting payloads of type `P`.
  pub fn build<P>(self) -> Pipeline<P>
  where
    P: Any + Send + Sync,
  {
    event!(Level::DEBUG, num_middleware = self.factories.len(), payload_type = %std::any::type_name::<P>(), "Pipeline built.");
    Pipeline::from_chain(Chain::new(self.factories))
  }

  fn build_forked(self) -> ForkedPipeline {
    ForkedPipeline::from_chain(Chain::new(self.factories))
  }

  fn nested(&self) -> PipelineBuilder {
    PipelineBuilder::new(self.resolver.clone())
  }
}

impl fmt::Debug for PipelineBuilder {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("PipelineBuilder")
      .field("num_middleware", &self.factories.len())
      .finish()
  }
}
