use std::fmt;

use crate::error::Error;
use crate::mode::Mode;
use crate::summary::Summary;

/// Approximate quantile estimator over an unbounded stream of `f64`s.
///
/// An estimator owns one compressed summary configured for either biased or
/// targeted operation and does no algorithmic work of its own beyond a
/// little stream bookkeeping (`count`, `sum`, `cma`, `last`).
///
/// Insertion buffers in O(1) and periodically folds the batch into the
/// summary; queries drain the buffer first, so they always reflect every
/// inserted value. NaN observations are ignored.
///
/// # Examples
/// ```
/// use stream_quantiles::Estimator;
///
/// let mut estimator = Estimator::new();
/// for i in 1..=1000 {
///     estimator.insert(f64::from(i));
/// }
/// assert_eq!(estimator.query(0.5), Ok((500.0, 0.001)));
/// ```
///
/// # Concurrency
///
/// `insert`, `flush`, and `query` all take `&mut self`; compression
/// rewrites adjacent entries in place, so sharing an estimator across
/// threads requires a caller-supplied lock. Independent estimators share
/// nothing and run fully in parallel.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde_support", derive(serde::Serialize, serde::Deserialize))]
pub struct Estimator {
    summary: Summary,
    sum: Option<f64>,
    cma: Option<f64>,
    last_in: Option<f64>,
}

/// Read-only diagnostics for an estimator, taken at a point in time.
///
/// `Display` renders the whole snapshot as a one-line description.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde_support", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot {
    /// The mode the estimator was built with.
    pub mode: Mode,
    /// Observations folded into the compressed sequence.
    pub flushed: u64,
    /// Observations still waiting in the insertion buffer.
    pub buffered: usize,
    /// Entries the compressed sequence currently retains.
    pub entries: usize,
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}: {} observations in {} entries ({} buffered)",
            self.mode, self.flushed, self.entries, self.buffered
        )
    }
}

impl Estimator {
    /// Create an estimator in biased mode with the default epsilon of 0.001.
    pub fn new() -> Estimator {
        Estimator {
            summary: Summary::new(Mode::default()),
            sum: None,
            cma: None,
            last_in: None,
        }
    }

    /// Create an estimator with an explicit mode.
    ///
    /// Fails fast with [`Error::InvalidConfig`] on an epsilon outside
    /// (0, 1), an empty target set, or duplicate target quantiles -- before
    /// any observation is accepted.
    ///
    /// # Examples
    /// ```
    /// use stream_quantiles::{Estimator, Mode, Quantile};
    ///
    /// let targets = vec![
    ///     Quantile::new(0.5, 0.01).unwrap(),
    ///     Quantile::new(0.95, 0.0001).unwrap(),
    /// ];
    /// let estimator = Estimator::with_mode(Mode::Targeted(targets)).unwrap();
    /// assert_eq!(estimator.count(), 0);
    /// ```
    pub fn with_mode(mode: Mode) -> Result<Estimator, Error> {
        mode.validate()?;
        Ok(Estimator {
            summary: Summary::new(mode),
            sum: None,
            cma: None,
            last_in: None,
        })
    }

    /// Accept one observation. O(1) amortized; NaN is ignored.
    pub fn insert(&mut self, v: f64) {
        if v.is_nan() {
            return;
        }
        self.summary.insert(v);
        self.sum = Some(match self.sum {
            Some(s) => s + v,
            None => v,
        });
        self.last_in = Some(v);
        let n = self.summary.count() as f64;
        self.cma = Some(match self.cma {
            Some(c) => c + (v - c) / n,
            None => v,
        });
    }

    /// Fold any buffered observations into the summary now.
    ///
    /// Queries do this on their own; an explicit flush is only useful to
    /// pay the merge cost at a moment of the caller's choosing. Flushing
    /// twice in a row changes nothing.
    pub fn flush(&mut self) -> Result<(), Error> {
        self.summary.flush();
        self.summary.verify()
    }

    /// Query for the value at quantile `phi`.
    ///
    /// Returns the value and the epsilon its guarantee carries: the global
    /// epsilon in biased mode, the matching target's in targeted mode. A
    /// targeted query for an unconfigured quantile still answers, but
    /// reports the wider, unguaranteed bound that applies at that rank.
    ///
    /// Fails with [`Error::InvalidQuantile`] when `phi` is outside (0, 1)
    /// and [`Error::EmptyStream`] when nothing has been inserted.
    pub fn query(&mut self, phi: f64) -> Result<(f64, f64), Error> {
        self.summary.query(phi)
    }

    /// Total observations accepted, buffered or not.
    pub fn count(&self) -> u64 {
        self.summary.count()
    }

    /// The mode this estimator was built with.
    pub fn mode(&self) -> &Mode {
        self.summary.mode()
    }

    /// The most recently inserted observation.
    pub fn last(&self) -> Option<f64> {
        self.last_in
    }

    /// Running sum of all inserted observations.
    pub fn sum(&self) -> Option<f64> {
        self.sum
    }

    /// Cumulative moving average of all inserted observations.
    pub fn cma(&self) -> Option<f64> {
        self.cma
    }

    /// Take a diagnostic snapshot: mode, counts, and sequence size.
    ///
    /// # Examples
    /// ```
    /// use stream_quantiles::Estimator;
    ///
    /// let mut estimator = Estimator::new();
    /// estimator.insert(1.0);
    /// let snapshot = estimator.describe();
    /// assert_eq!(snapshot.buffered, 1);
    /// assert_eq!(snapshot.flushed, 0);
    /// ```
    pub fn describe(&self) -> Snapshot {
        Snapshot {
            mode: self.summary.mode().clone(),
            flushed: self.summary.flushed(),
            buffered: self.summary.buffered(),
            entries: self.summary.entry_count(),
        }
    }

    /// Absorb another estimator's observations into this one.
    ///
    /// Both estimators must have been built with the same mode; anything
    /// else fails with [`Error::InvalidConfig`], since the two summaries
    /// would carry incompatible guarantees.
    pub fn merge(&mut self, other: Estimator) -> Result<(), Error> {
        if self.summary.mode() != other.summary.mode() {
            return Err(Error::InvalidConfig("merge requires identical modes"));
        }
        let self_n = self.count() as f64;
        let other_n = other.count() as f64;
        self.sum = match (self.sum, other.sum) {
            (None, None) => None,
            (None, Some(y)) => Some(y),
            (Some(x), None) => Some(x),
            (Some(x), Some(y)) => Some(x + y),
        };
        self.cma = match (self.cma, other.cma) {
            (None, None) => None,
            (None, Some(y)) => Some(y),
            (Some(x), None) => Some(x),
            (Some(x), Some(y)) => Some((self_n * x + other_n * y) / (self_n + other_n)),
        };
        if other.last_in.is_some() {
            self.last_in = other.last_in;
        }
        self.summary.absorb(other.summary);
        self.flush()
    }
}

impl Default for Estimator {
    fn default() -> Estimator {
        Estimator::new()
    }
}
