pub mod context;
pub mod kind;
pub mod middleware;

// Re-export key types for easier access from other strata modules (and lib.rs)
pub use context::Context;
pub use kind::MiddlewareKind;
pub use middleware::{factory_fn, Middleware, MiddlewareFactory, Payload};
