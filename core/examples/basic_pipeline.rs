// strata/examples/basic_pipeline.rs

use std::sync::Arc;
use strata::{async_trait, Context, Middleware, MiddlewareRegistry, Payload, PipelineBuilder, StrataResult};
use tracing::{info, warn};

// 1. Define the payload the pipeline is typed over.
#[derive(Debug)]
struct Request {
  user: Option<String>,
  path: String,
}

// 2. Define the middleware. A fresh instance is built per request, so `self` may hold
//    request-scoped state between `before` and `after`.
#[derive(Default)]
struct Timing {
  started: Option<std::time::Instant>,
}

#[async_trait]
impl Middleware for Timing {
  async fn before(&mut self, _context: &mut Context, _payload: &Payload) -> bool {
    self.started = Some(std::time::Instant::now());
    true
  }

  async fn after(&mut self, context: &mut Context, _payload: &Payload) {
    let elapsed = self.started.map(|s| s.elapsed()).unwrap_or_default();
    let user = context.get::<String>("user").cloned().unwrap_or_else(|| "<anonymous>".into());
    info!(?elapsed, %user, "Request finished.");
  }
}

#[derive(Default)]
struct Authenticate;

#[async_trait]
impl Middleware for Authenticate {
  async fn before(&mut self, context: &mut Context, payload: &Payload) -> bool {
    match payload.downcast_ref::<Request>().and_then(|r| r.user.clone()) {
      Some(user) => {
        context.insert("user", user);
        true
      }
      None => {
        warn!("Rejecting anonymous request.");
        false
      }
    }
  }

  async fn after(&mut self, _context: &mut Context, _payload: &Payload) {
    info!("Authenticate: after");
  }
}

#[derive(Default)]
struct Handle;

#[async_trait]
impl Middleware for Handle {
  async fn before(&mut self, context: &mut Context, payload: &Payload) -> bool {
    let path = payload.downcast_ref::<Request>().map(|r| r.path.as_str()).unwrap_or("?");
    let user = context.get::<String>("user").map(String::as_str).unwrap_or("?");
    info!("Handling {} for {}", path, user);
    true
  }

  async fn after(&mut self, _context: &mut Context, _payload: &Payload) {}
}

#[tokio::main]
async fn main() -> StrataResult<()> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- Basic Pipeline Example ---");

  // 3. Register a constructor per middleware kind.
  let registry = MiddlewareRegistry::new();
  registry
    .register_default::<Timing>()
    .register_default::<Authenticate>()
    .register_default::<Handle>();

  // 4. Assemble the chain. Unregistered kinds fail here, not at request time.
  let pipeline = PipelineBuilder::new(Arc::new(registry))
    .use_middleware::<Timing>()?
    .use_middleware::<Authenticate>()?
    .use_middleware::<Handle>()?
    .build::<Request>();

  // 5. Run payloads through it.
  let ok = pipeline
    .process(&Request {
      user: Some("ada".into()),
      path: "/reports".into(),
    })
    .await;
  info!("Authenticated request completed: {}", ok);

  // Authenticate short-circuits: Handle never runs, Timing still unwinds.
  let ok = pipeline
    .process(&Request {
      user: None,
      path: "/reports".into(),
    })
    .await;
  info!("Anonymous request completed: {}", ok);

  Ok(())
}
