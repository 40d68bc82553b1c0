// strata/src/core/kind.rs

//! Identifiers for middleware types, used as resolver keys.

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identifies a middleware (or forked middleware) type.
///
/// Equality and hashing use only the `TypeId`; the name is carried for error messages
/// and tracing.
#[derive(Clone, Copy)]
pub struct MiddlewareKind {
  type_id: TypeId,
  name: &'static str,
}

impl MiddlewareKind {
  pub fn of<M: ?Sized + 'static>() -> Self {
    Self {
      type_id: TypeId::of::<M>(),
      name: std::any::type_name::<M>(),
    }
  }

  pub fn type_id(&self) -> TypeId {
    self.type_id
  }

  pub fn name(&self) -> &'static str {
    self.name
  }
}

impl PartialEq for MiddlewareKind {
  fn eq(&self, other: &Self) -> bool {
    self.type_id == other.type_id
  }
}

impl Eq for MiddlewareKind {}

impl Hash for MiddlewareKind {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.type_id.hash(state);
  }
}

impl fmt::Debug for MiddlewareKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_tuple("MiddlewareKind").field(&self.name).finish()
  }
}

impl fmt::Display for MiddlewareKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name)
  }
}
