use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum FunctionError {
    #[error("Unknown function: {0}. Supported values are: {1}")]
    UnknownFunction(String, String),

    #[error("Missing input {parameter} for function {function}")]
    MissingInput { function: String, parameter: String },

    #[error("Input {parameter} for function {function} must be a finite number")]
    NonFiniteInput { function: String, parameter: String },

    #[error("Function {function} expects {expected} arguments, got {actual}")]
    ArityMismatch { function: String, expected: usize, actual: usize },
}
