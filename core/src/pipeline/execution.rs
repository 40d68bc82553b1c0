// strata/src/pipeline/execution.rs

//! Contains the chain walk and `Pipeline::process()`.

use crate::core::context::Context;
use crate::core::middleware::{Middleware, Payload};
use crate::pipeline::definition::{Chain, Pipeline};
use std::any::Any;
use tracing::{event, instrument, span, Instrument, Level};

impl Chain {
  /// Runs every stage against `context` and `payload`.
  ///
  /// `before` phases run in list order. Each middleware whose `before` returned `true` is
  /// pushed onto a stack; once the forward walk ends (end of list, or a `before` returned
  /// `false`) the stack is drained so `after` phases run in reverse order. The failing
  /// middleware itself is never pushed, so its `after` is skipped.
  pub(crate) async fn run(&self, context: &mut Context, payload: &Payload) -> bool {
    let mut started: Vec<(usize, Box<dyn Middleware>)> = Vec::with_capacity(self.factories.len());
    let mut success = true;

    for (stage_index, factory) in self.factories.iter().enumerate() {
      let mut middleware = factory();
      let stage_span = span!(
        Level::DEBUG,
        "middleware_before",
        stage_index,
        middleware = middleware.name()
      );

      let proceed = middleware.before(context, payload).instrument(stage_span).await;
      if !proceed {
        event!(
          Level::INFO,
          stage_index,
          middleware = middleware.name(),
          "Chain short-circuited by 'before'."
        );
        success = false;
        break;
      }
      started.push((stage_index, middleware));
    }

    while let Some((stage_index, mut middleware)) = started.pop() {
      let stage_span = span!(
        Level::DEBUG,
        "middleware_after",
        stage_index,
        middleware = middleware.name()
      );
      middleware.after(context, payload).instrument(stage_span).await;
    }

    success
  }
}

impl<P> Pipeline<P>
where
  P: Any + Send + Sync,
{
  /// Processes `payload` through the pipeline with a fresh `Context`.
  ///
  /// Returns `true` if every stage's `before` returned `true` (or the pipeline is empty),
  /// `false` if the chain was short-circuited.
  #[instrument(
    name = "Pipeline::process",
    skip_all,
    fields(
      payload_type = %std::any::type_name::<P>(),
      num_middleware = self.chain.len(),
    )
  )]
  pub async fn process(&self, payload: &P) -> bool {
    event!(Level::DEBUG, "Pipeline processing starting.");
    let mut context = Context::new();
    let success = self.chain.run(&mut context, payload).await;
    event!(Level::DEBUG, success, "Pipeline processing finished.");
    success
  }
}
