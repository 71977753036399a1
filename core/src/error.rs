// reflow/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReflowError {
  #[error("Step not found: {step_name}")]
  StepNotFound { step_name: String },

  #[error("Handler missing for non-optional step: {step_name}")]
  HandlerMissing { step_name: String },

  #[error("Type mismatch during context dispatch (expected {expected_type})")]
  TypeMismatch { expected_type: String },

  #[error("Error in user-provided handler or external operation. Source: {source}")]
  HandlerError {
    #[source]
    source: AnyhowError,
  },

  #[error("Configuration error for '{scope}': {message}")]
  ConfigurationError { scope: String, message: String },
}

impl From<AnyhowError> for ReflowError {
  fn from(err: AnyhowError) -> Self {
    // An anyhow error that already carries a ReflowError is kept as the source
    // instead of being flattened, so the original variant stays downcastable.
    ReflowError::HandlerError { source: err }
  }
}

pub type ReflowResult<T, E = ReflowError> = std::result::Result<T, E>;
