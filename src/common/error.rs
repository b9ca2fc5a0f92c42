//! Error taxonomy for the simulator's boundary operations.
//!
//! Stage functions inside the pipeline core never return an error for a
//! hazard — a stall is ordinary control flow, represented by the `stalled`
//! flag on a [`crate::core::latch::StageLatch`], not a `Result::Err`. This
//! type exists for the two kinds of failure that stop the simulator outright.

use std::fmt;

/// A fatal simulator error, distinguishing configuration mistakes (bad CLI
/// input, an unparsable program) from program errors (a broken target
/// program driving the pipeline somewhere undefined).
#[derive(Debug)]
pub enum SimError {
    /// Bad command-line arguments or an unparsable input file. Reported to
    /// stderr; the pipeline never starts.
    Configuration(String),
    /// The simulated program did something only a broken program could do:
    /// a misaligned or out-of-range branch target, or division by zero.
    Program(String),
    /// Propagated I/O failure while reading the input file.
    Io(std::io::Error),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::Configuration(msg) => write!(f, "configuration error: {msg}"),
            SimError::Program(msg) => write!(f, "program error: {msg}"),
            SimError::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SimError {
    fn from(err: std::io::Error) -> Self {
        SimError::Io(err)
    }
}
