// strata/src/fork/pipeline.rs

//! Defines `ForkedPipeline`, the pipeline variant used as a fork arm, and `ForkArms`.

use crate::core::context::Context;
use crate::core::middleware::{MiddlewareFactory, Payload};
use crate::error::{StrataError, StrataResult};
use crate::fork::middleware::Branch;
use crate::pipeline::definition::Chain;
use std::fmt;
use std::sync::Arc;
use tracing::{event, instrument, Level};

/// A pipeline usable as one arm of a fork.
///
/// Unlike `Pipeline<P>` it is untyped, and it can run against a context supplied by the
/// caller so state flows across the fork boundary in both directions.
pub struct ForkedPipeline {
  chain: Chain,
}

impl ForkedPipeline {
  pub fn from_factories(factories: Vec<MiddlewareFactory>) -> Self {
    Self::from_chain(Chain::new(factories))
  }

  pub(crate) fn from_chain(chain: Chain) -> Self {
    Self { chain }
  }

  pub fn len(&self) -> usize {
    self.chain.len()
  }

  pub fn is_empty(&self) -> bool {
    self.chain.len() == 0
  }

  /// Runs the chain against the caller's `context`.
  #[instrument(
    name = "ForkedPipeline::process_with_context",
    skip_all,
    fields(num_middleware = self.chain.len())
  )]
  pub async fn process_with_context(&self, context: &mut Context, payload: &Payload) -> bool {
    event!(Level::TRACE, "Forked pipeline entered with parent context.");
    self.chain.run(context, payload).await
  }

  /// Runs the chain with a fresh context, as a top-level pipeline would.
  pub async fn process(&self, payload: &Payload) -> bool {
    let mut context = Context::new();
    self.process_with_context(&mut context, payload).await
  }
}

impl fmt::Debug for ForkedPipeline {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ForkedPipeline")
      .field("num_middleware", &self.chain.len())
      .finish()
  }
}

/// The two sub-pipelines a fork chooses between.
///
/// Both arms are always present once a `ForkArms` exists; they are shared, read-only
/// structures reused by every fork instance built over them.
#[derive(Clone, Debug)]
pub struct ForkArms {
  left: Arc<ForkedPipeline>,
  right: Arc<ForkedPipeline>,
}

impl ForkArms {
  pub fn new(left: Arc<ForkedPipeline>, right: Arc<ForkedPipeline>) -> Self {
    Self { left, right }
  }

  /// Validates a possibly incomplete pair of arms.
  pub fn try_new(left: Option<Arc<ForkedPipeline>>, right: Option<Arc<ForkedPipeline>>) -> StrataResult<Self> {
    let left = left.ok_or(StrataError::MissingForkArm { side: "left" })?;
    let right = right.ok_or(StrataError::MissingForkArm { side: "right" })?;
    Ok(Self::new(left, right))
  }

  pub fn left(&self) -> &Arc<ForkedPipeline> {
    &self.left
  }

  pub fn right(&self) -> &Arc<ForkedPipeline> {
    &self.right
  }

  /// Returns the arm for `branch`, or `None` for `Branch::Neither`.
  pub fn select(&self, branch: Branch) -> Option<&Arc<ForkedPipeline>> {
    match branch {
      Branch::Left => Some(&self.left),
      Branch::Right => Some(&self.right),
      Branch::Neither => None,
    }
  }
}
