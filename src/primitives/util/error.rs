use std::error::Error;
use std::fmt;

/// A type alias for `Result<T, SolverError>`.
pub type SolverResult<T> = Result<T, SolverError>;

/// An error that can occur during a root search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SolverError {
    /// The function has the same sign at both ends of the search interval.
    NotBracketed { lower: f64, upper: f64 },
    /// The tolerance was not met within the allowed number of iterations.
    NoConvergence { iteration_count: u32 },
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SolverError::NotBracketed { lower, upper } => write!(
                f,
                "no sign change of the function over [{}, {}]",
                lower, upper
            ),
            SolverError::NoConvergence { iteration_count } => write!(
                f,
                "root search did not converge after {} iterations",
                iteration_count
            ),
        }
    }
}

impl Error for SolverError {}
