// strata/examples/fork_routing.rs

use std::sync::Arc;
use strata::{
  async_trait, Branch, Context, ForkArms, ForkedMiddleware, Middleware, MiddlewareRegistry, Payload,
  PipelineBuilder, SelectorFork, StrataResult,
};
use tracing::info;

#[derive(Debug)]
struct Order {
  id: u32,
  region: &'static str,
}

/// Routes EU orders left, US orders right and everything else through neither arm.
struct ByRegion {
  arms: ForkArms,
}

#[async_trait]
impl ForkedMiddleware for ByRegion {
  fn arms(&self) -> &ForkArms {
    &self.arms
  }

  fn choose_pipeline(&self, payload: &Payload) -> Branch {
    match payload.downcast_ref::<Order>().map(|o| o.region) {
      Some("eu") => Branch::Left,
      Some("us") => Branch::Right,
      _ => Branch::Neither,
    }
  }

  async fn after(&mut self, context: &mut Context, _payload: &Payload) {
    let tax = context.get::<f64>("tax_rate").copied();
    info!(?tax, "ByRegion: after");
  }
}

/// Writes a fixed tax rate into the shared context.
struct TaxRate<const BASIS_POINTS: u32>;

#[async_trait]
impl<const BASIS_POINTS: u32> Middleware for TaxRate<BASIS_POINTS> {
  async fn before(&mut self, context: &mut Context, _payload: &Payload) -> bool {
    context.insert("tax_rate", BASIS_POINTS as f64 / 10_000.0);
    true
  }

  async fn after(&mut self, _context: &mut Context, _payload: &Payload) {}
}

#[derive(Default)]
struct Invoice;

#[async_trait]
impl Middleware for Invoice {
  async fn before(&mut self, context: &mut Context, payload: &Payload) -> bool {
    let id = payload.downcast_ref::<Order>().map(|o| o.id).unwrap_or_default();
    match context.get::<f64>("tax_rate") {
      Some(rate) => info!("Invoicing order {} at {:.2}%", id, rate * 100.0),
      None => info!("Invoicing order {} without tax", id),
    }
    true
  }

  async fn after(&mut self, _context: &mut Context, _payload: &Payload) {}
}

#[tokio::main]
async fn main() -> StrataResult<()> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- Fork Routing Example ---");

  let registry = MiddlewareRegistry::new();
  registry
    .register(|| TaxRate::<2000>)
    .register(|| TaxRate::<800>)
    .register_default::<Invoice>()
    .register_fork(|arms| ByRegion { arms })
    // A closure-driven fork needs no dedicated type.
    .register_fork(|arms| {
      SelectorFork::new(arms, |payload| match payload.downcast_ref::<Order>() {
        Some(order) if order.id % 2 == 0 => Branch::Left,
        _ => Branch::Neither,
      })
    });

  let pipeline = PipelineBuilder::new(Arc::new(registry))
    .fork::<ByRegion, _, _>(
      |eu| eu.use_middleware::<TaxRate<2000>>(),
      |us| us.use_middleware::<TaxRate<800>>(),
    )?
    .fork::<SelectorFork, _, _>(|even| even.use_middleware::<Invoice>(), Ok)?
    .build::<Order>();

  for (id, region) in [(2, "eu"), (4, "us"), (6, "jp"), (7, "eu")] {
    let ok = pipeline.process(&Order { id, region }).await;
    info!(id, region, ok, "Order processed.");
  }

  Ok(())
}
