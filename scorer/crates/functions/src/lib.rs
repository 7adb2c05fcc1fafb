//! Closed-form synthetic test functions served by the scorer.
//!
//! Every function is pure and noise-free: evaluating it yields a primary
//! metric plus the L2 norm of the argument vector, each reported as a
//! `(mean, sem)` pair with a zero standard error.

pub mod colville;
pub mod error;
pub mod hartmann;
pub mod kind;
pub mod metric;

pub use error::FunctionError;
pub use kind::{FunctionDescriptor, FunctionKind, Inputs};
pub use metric::{Evaluation, Metric};
