use thiserror::Error;

#[derive(Debug, Error)]
pub enum EvalError {
    #[error("invalid input: {0}")]
    Input(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("computation error: {0}")]
    Computation(String),
}

impl EvalError {
    pub fn input(msg: impl Into<String>) -> Self {
        EvalError::Input(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        EvalError::Configuration(msg.into())
    }

    pub fn computation(msg: impl Into<String>) -> Self {
        EvalError::Computation(msg.into())
    }
}

pub type EvalResult<T> = Result<T, EvalError>;
