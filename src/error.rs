use std::error;
use std::fmt;

/// Failures reported by estimator construction and queries.
///
/// Configuration problems are rejected at construction time, before any
/// observation is accepted. Query-time problems come back as values so the
/// caller can handle them inline; nothing is retried internally.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Error {
    /// The mode or target set was rejected at construction time.
    InvalidConfig(&'static str),
    /// A quantile fell outside the open interval (0, 1), or a target's
    /// error bound reached a boundary and is therefore meaningless.
    InvalidQuantile(f64),
    /// A query arrived before any observation.
    EmptyStream,
    /// The band invariant failed verification after compression. This is a
    /// bug in the summary, never a usage error.
    InvariantViolation {
        /// Rank of the offending entry.
        rank: u64,
        /// What the invariant allowed at that rank.
        allowed: u64,
        /// The entry's actual `g + delta`.
        actual: u64,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::InvalidConfig(msg) => write!(f, "invalid configuration: {}", msg),
            Error::InvalidQuantile(phi) => write!(f, "invalid quantile: {}", phi),
            Error::EmptyStream => write!(f, "no observations to query"),
            Error::InvariantViolation {
                rank,
                allowed,
                actual,
            } => write!(
                f,
                "band invariant violated at rank {}: {} exceeds {}",
                rank, actual, allowed
            ),
        }
    }
}

impl error::Error for Error {}
