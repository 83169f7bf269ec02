//! Approximate quantiles over unbounded data streams in a bounded amount of
//! memory.
//!
//! Exact order statistics need the whole dataset. This crate keeps a
//! compressed summary instead -- an ordered sequence of weighted samples
//! whose per-sample uncertainty is provably capped -- following Cormode,
//! Korn, Muthukrishnan and Srivastava's "Effective Computation of Biased
//! Quantiles over Data Streams". Memory grows with the log of the stream,
//! not with the stream.
//!
//! Two operating modes are available, chosen once at construction:
//!
//! * [`Mode::Biased`] bounds the rank error of *any* quantile queried after
//!   the fact by a single epsilon, measured relative to the nearer end of
//!   the ordering.
//! * [`Mode::Targeted`] takes a fixed set of [`Quantile`] targets up front
//!   and holds each to its own tighter bound, compressing aggressively
//!   where nobody asked for precision.
//!
//! # Examples
//! ```
//! use stream_quantiles::{Estimator, Mode, Quantile};
//!
//! // Biased: any quantile, one guarantee.
//! let mut estimator = Estimator::new();
//! for i in 1..=10_000 {
//!     estimator.insert(f64::from(i));
//! }
//! let (median, epsilon) = estimator.query(0.5).unwrap();
//! assert!((median - 5_000.0).abs() <= epsilon * 10_000.0);
//!
//! // Targeted: declared quantiles, tighter guarantees.
//! let targets = vec![
//!     Quantile::new(0.5, 0.01).unwrap(),
//!     Quantile::new(0.95, 0.0001).unwrap(),
//! ];
//! let mut estimator = Estimator::with_mode(Mode::Targeted(targets)).unwrap();
//! for i in 1..=10_000 {
//!     estimator.insert(f64::from(i));
//! }
//! let (p95, epsilon) = estimator.query(0.95).unwrap();
//! assert!((p95 - 9_500.0).abs() <= epsilon * 10_000.0 + 1.0);
//! ```
//!
//! # Concurrency
//!
//! An [`Estimator`] is a single-writer structure: `insert`, `flush`, and
//! `query` all take `&mut self`, and no locking is provided internally.
//! Callers that share one across threads supply their own mutual exclusion;
//! independent estimators share nothing and run fully in parallel.
#![deny(
    missing_docs,
    missing_copy_implementations,
    missing_debug_implementations,
    unstable_features,
    unused_import_braces
)]

mod error;
mod estimator;
mod mode;
mod quantile;
mod summary;

pub mod util;

pub use crate::error::Error;
pub use crate::estimator::{Estimator, Snapshot};
pub use crate::mode::{Mode, DEFAULT_BIASED_EPSILON};
pub use crate::quantile::Quantile;
