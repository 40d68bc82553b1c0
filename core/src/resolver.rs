// strata/src/resolver.rs

//! Defines the `ResolveMiddleware` contract the builder uses to turn middleware kinds
//! into constructors.

use crate::core::kind::MiddlewareKind;
use crate::core::middleware::MiddlewareFactory;
use crate::error::StrataResult;
use crate::fork::ForkFactory;

/// Turns middleware kinds into constructors.
///
/// Implementations must fail, rather than return a no-op factory, when a kind cannot be
/// constructed. `MiddlewareRegistry` is the implementation shipped with this crate; a
/// resolver backed by some other container reports its own failures as
/// `StrataError::ResolverFailure`.
pub trait ResolveMiddleware: Send + Sync {
  /// Returns a zero-argument constructor for `kind`.
  fn resolve_factory(&self, kind: &MiddlewareKind) -> StrataResult<MiddlewareFactory>;

  /// Returns a constructor that builds the forked middleware `kind` over a pair of arms.
  fn resolve_fork_factory(&self, kind: &MiddlewareKind) -> StrataResult<ForkFactory>;
}
