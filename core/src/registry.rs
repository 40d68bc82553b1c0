// strata/src/registry.rs

//! Defines `MiddlewareRegistry`, a type-keyed table of middleware constructors that
//! serves as the crate's `ResolveMiddleware` implementation.

use crate::core::kind::MiddlewareKind;
use crate::core::middleware::{factory_fn, Middleware, MiddlewareFactory};
use crate::error::{StrataError, StrataResult};
use crate::fork::{fork_factory_fn, ForkArms, ForkFactory, ForkedMiddleware};
use crate::resolver::ResolveMiddleware;

use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use tracing::{event, instrument, Level};

/// The middleware registry.
///
/// Plain middleware and forked middleware live in separate tables, both keyed by
/// `MiddlewareKind`. Registration takes `&self`, so a registry can be shared behind an
/// `Arc` (as the builder requires) and still be extended. Registering a kind twice
/// replaces the earlier constructor.
#[derive(Default)]
pub struct MiddlewareRegistry {
  factories: RwLock<HashMap<MiddlewareKind, MiddlewareFactory>>,
  fork_factories: RwLock<HashMap<MiddlewareKind, ForkFactory>>,
}

impl MiddlewareRegistry {
  /// Creates a new, empty registry.
  pub fn new() -> Self {
    Self::default()
  }

  /// Registers `ctor` as the constructor for middleware type `M`.
  pub fn register<M, F>(&self, ctor: F) -> &Self
  where
    M: Middleware + 'static,
    F: Fn() -> M + Send + Sync + 'static,
  {
    self.register_kind(MiddlewareKind::of::<M>(), factory_fn(ctor))
  }

  /// Registers `M::default` as the constructor for `M`.
  pub fn register_default<M>(&self) -> &Self
  where
    M: Middleware + Default + 'static,
  {
    self.register::<M, _>(M::default)
  }

  /// Registers a raw factory under an explicit kind.
  ///
  /// Useful when the kind is a marker type rather than the middleware type itself, for
  /// example to register several differently configured instances of one middleware.
  #[instrument(name = "MiddlewareRegistry::register_kind", skip_all, fields(kind = %kind))]
  pub fn register_kind(&self, kind: MiddlewareKind, factory: MiddlewareFactory) -> &Self {
    if self.factories.write().insert(kind, factory).is_some() {
      event!(Level::DEBUG, "Replaced previously registered middleware factory.");
    } else {
      event!(Level::DEBUG, "Registered middleware factory.");
    }
    self
  }

  /// Registers `ctor` as the constructor for forked middleware type `F`.
  ///
  /// The constructed value is wrapped in `Fork<F>` so it can sit in a chain.
  pub fn register_fork<F, C>(&self, ctor: C) -> &Self
  where
    F: ForkedMiddleware + 'static,
    C: Fn(ForkArms) -> F + Send + Sync + 'static,
  {
    self.register_fork_kind(MiddlewareKind::of::<F>(), fork_factory_fn(ctor))
  }

  /// Registers a raw fork factory under an explicit kind.
  #[instrument(name = "MiddlewareRegistry::register_fork_kind", skip_all, fields(kind = %kind))]
  pub fn register_fork_kind(&self, kind: MiddlewareKind, factory: ForkFactory) -> &Self {
    if self.fork_factories.write().insert(kind, factory).is_some() {
      event!(Level::DEBUG, "Replaced previously registered fork factory.");
    } else {
      event!(Level::DEBUG, "Registered fork factory.");
    }
    self
  }

  pub fn is_registered(&self, kind: &MiddlewareKind) -> bool {
    self.factories.read().contains_key(kind)
  }

  pub fn is_fork_registered(&self, kind: &MiddlewareKind) -> bool {
    self.fork_factories.read().contains_key(kind)
  }

  /// Total number of registered kinds, plain and forked.
  pub fn len(&self) -> usize {
    self.factories.read().len() + self.fork_factories.read().len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

impl ResolveMiddleware for MiddlewareRegistry {
  fn resolve_factory(&self, kind: &MiddlewareKind) -> StrataResult<MiddlewareFactory> {
    self.factories.read().get(kind).cloned().ok_or_else(|| {
      event!(Level::ERROR, kind = %kind, "No middleware factory registered.");
      StrataError::MiddlewareNotRegistered {
        kind: kind.name().to_string(),
      }
    })
  }

  fn resolve_fork_factory(&self, kind: &MiddlewareKind) -> StrataResult<ForkFactory> {
    self.fork_factories.read().get(kind).cloned().ok_or_else(|| {
      event!(Level::ERROR, kind = %kind, "No fork factory registered.");
      StrataError::ForkNotRegistered {
        kind: kind.name().to_string(),
      }
    })
  }
}

impl fmt::Debug for MiddlewareRegistry {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let middleware: Vec<&'static str> = self.factories.read().keys().map(MiddlewareKind::name).collect();
    let forks: Vec<&'static str> = self.fork_factories.read().keys().map(MiddlewareKind::name).collect();
    f.debug_struct("MiddlewareRegistry")
      .field("middleware", &middleware)
      .field("forks", &forks)
      .finish()
  }
}
