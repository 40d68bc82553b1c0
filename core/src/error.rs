// strata/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StrataError {
  #[error("No factory registered for middleware kind: {kind}")]
  MiddlewareNotRegistered { kind: String },

  #[error("No fork factory registered for forked middleware kind: {kind}")]
  ForkNotRegistered { kind: String },

  #[error("Forked middleware requires a {side} pipeline but none was supplied")]
  MissingForkArm { side: &'static str },

  #[error("Resolver failed for middleware kind '{kind}'. Source: {source}")]
  ResolverFailure {
    kind: String,
    #[source]
    source: AnyhowError,
  },

  #[error("Error in an external resolver or user-provided operation. Source: {source}")]
  External {
    #[source]
    source: AnyhowError,
  },
}

impl From<AnyhowError> for StrataError {
  fn from(err: AnyhowError) -> Self {
    // Unwrap a StrataError that was boxed into anyhow on its way through user code.
    match err.downcast::<StrataError>() {
      Ok(strata_err) => strata_err,
      Err(source) => StrataError::External { source },
    }
  }
}

pub type StrataResult<T, E = StrataError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn anyhow_wrapping_a_strata_error_is_unwrapped() {
    let wrapped = anyhow::Error::new(StrataError::MissingForkArm { side: "left" });
    match StrataError::from(wrapped) {
      StrataError::MissingForkArm { side } => assert_eq!(side, "left"),
      other => panic!("Expected MissingForkArm, got {:?}", other),
    }
  }

  #[test]
  fn foreign_anyhow_error_becomes_external() {
    let err = StrataError::from(anyhow::anyhow!("container exploded"));
    assert!(matches!(err, StrataError::External { .. }));
    assert!(err.to_string().contains("container exploded"));
  }
}
