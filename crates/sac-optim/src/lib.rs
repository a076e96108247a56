//! Dense nonlinear least-squares plumbing for model refinement.
//!
//! Refinement problems implement [`NllsProblem`] (residuals plus analytic
//! Jacobian over a flat parameter vector) and are solved through a backend;
//! the only backend here wraps the `levenberg-marquardt` crate.

mod backend_lm;
mod traits;

pub use backend_lm::LmBackend;
pub use traits::{NllsProblem, SolveOptions, SolveReport};
