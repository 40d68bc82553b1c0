// strata/src/core/context.rs

//! Defines the `Context` shared by every middleware of one top-level invocation.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;

type ContextValue = Box<dyn Any + Send + Sync>;

/// A string-keyed store of type-erased values.
///
/// One `Context` is allocated per top-level `Pipeline::process` call and handed to each
/// middleware as `&mut Context`, including the middleware inside fork arms. It is
/// intentionally not `Clone`: forked sub-pipelines borrow the parent's context instead of
/// copying it, so anything written inside a fork is visible after the fork returns.
#[derive(Default)]
pub struct Context {
  entries: HashMap<String, ContextValue>,
}

impl Context {
  pub fn new() -> Self {
    Self::default()
  }

  /// Stores `value` under `key`, returning the previous value if there was one.
  pub fn insert<V>(&mut self, key: impl Into<String>, value: V) -> Option<ContextValue>
  where
    V: Any + Send + Sync,
  {
    self.entries.insert(key.into(), Box::new(value))
  }

  /// Returns the value under `key` if present and of type `V`.
  pub fn get<V: Any>(&self, key: &str) -> Option<&V> {
    self.entries.get(key).and_then(|value| value.downcast_ref::<V>())
  }

  pub fn get_mut<V: Any>(&mut self, key: &str) -> Option<&mut V> {
    self.entries.get_mut(key).and_then(|value| value.downcast_mut::<V>())
  }

  /// Removes and returns the value under `key` if it is of type `V`.
  /// A value of another type is left in place.
  pub fn take<V: Any>(&mut self, key: &str) -> Option<V> {
    if !self.entries.get(key).map_or(false, |value| value.is::<V>()) {
      return None;
    }
    self
      .entries
      .remove(key)
      .and_then(|value| value.downcast::<V>().ok())
      .map(|boxed| *boxed)
  }

  /// Removes the entry under `key` regardless of its type.
  pub fn remove(&mut self, key: &str) -> Option<ContextValue> {
    self.entries.remove(key)
  }

  pub fn contains_key(&self, key: &str) -> bool {
    self.entries.contains_key(key)
  }

  pub fn keys(&self) -> impl Iterator<Item = &str> {
    self.entries.keys().map(String::as_str)
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

// Values are opaque, so only the keys are printed.
impl fmt::Debug for Context {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut keys: Vec<&str> = self.keys().collect();
    keys.sort_unstable();
    f.debug_struct("Context").field("keys", &keys).finish()
  }
}
