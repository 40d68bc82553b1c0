// strata/src/pipeline/definition.rs

//! Contains the `Pipeline<P>` struct and the untyped `Chain` shared with forked pipelines.

use crate::core::middleware::MiddlewareFactory;
use std::any::Any;
use std::fmt;
use std::marker::PhantomData;

/// An ordered, immutable list of middleware factories.
///
/// Insertion order is execution order. Both `Pipeline<P>` and `ForkedPipeline` are thin
/// shells over a `Chain`; the walk itself lives in `pipeline::execution`.
pub(crate) struct Chain {
  pub(crate) factories: Vec<MiddlewareFactory>,
}

impl Chain {
  pub(crate) fn new(factories: Vec<MiddlewareFactory>) -> Self {
    Self { factories }
  }

  pub(crate) fn len(&self) -> usize {
    self.factories.len()
  }
}

/// A top-level pipeline, typed over the payload `P` it accepts.
///
/// Built by `PipelineBuilder::build` or directly from factories. Immutable after
/// construction; concurrent `process` calls each get their own `Context`.
pub struct Pipeline<P> {
  pub(crate) chain: Chain,
  _payload: PhantomData<fn(&P)>,
}

impl<P> Pipeline<P>
where
  P: Any + Send + Sync,
{
  /// Creates a pipeline that runs `factories` in order.
  pub fn from_factories(factories: Vec<MiddlewareFactory>) -> Self {
    Self::from_chain(Chain::new(factories))
  }

  pub(crate) fn from_chain(chain: Chain) -> Self {
    Self {
      chain,
      _payload: PhantomData,
    }
  }

  /// Number of middleware stages in this pipeline.
  pub fn len(&self) -> usize {
    self.chain.len()
  }

  pub fn is_empty(&self) -> bool {
    self.chain.len() == 0
  }
}

impl<P> fmt::Debug for Pipeline<P> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Pipeline")
      .field("payload_type", &std::any::type_name::<P>())
      .field("num_middleware", &self.chain.len())
      .finish()
  }
}
