use std::fmt;

use crate::error::Error;
use crate::quantile::Quantile;

/// Error bound applied when no mode is chosen explicitly.
pub const DEFAULT_BIASED_EPSILON: f64 = 0.001;

/// How the summary spends its error budget.
///
/// The whole difference between the two modes is the invariant function
/// `f(r, n)` bounding how much uncertainty an entry at rank `r` may carry.
/// Everything else -- buffering, flushing, compression, the query walk --
/// is shared, so the mode is a single strategy picked at construction.
///
/// # Examples
/// ```
/// use stream_quantiles::{Mode, Quantile};
///
/// let biased = Mode::Biased(0.001);
/// let targeted = Mode::Targeted(vec![
///     Quantile::new(0.5, 0.01).unwrap(),
///     Quantile::new(0.95, 0.0001).unwrap(),
/// ]);
/// assert_ne!(biased, targeted);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde_support", derive(serde::Serialize, serde::Deserialize))]
pub enum Mode {
    /// One global epsilon bounding the rank error of any quantile queried
    /// after the fact, measured relative to the nearer end of the ordering.
    Biased(f64),
    /// A fixed set of targets, each holding its own tighter bound. Ranks far
    /// from every target are compressed aggressively since nobody asked for
    /// precision there.
    Targeted(Vec<Quantile>),
}

impl Default for Mode {
    fn default() -> Mode {
        Mode::Biased(DEFAULT_BIASED_EPSILON)
    }
}

impl Mode {
    pub(crate) fn validate(&self) -> Result<(), Error> {
        match *self {
            Mode::Biased(epsilon) => {
                if epsilon > 0.0 && epsilon < 1.0 {
                    Ok(())
                } else {
                    Err(Error::InvalidConfig("biased epsilon must lie in (0, 1)"))
                }
            }
            Mode::Targeted(ref targets) => {
                if targets.is_empty() {
                    return Err(Error::InvalidConfig(
                        "targeted mode requires at least one quantile",
                    ));
                }
                for (i, q) in targets.iter().enumerate() {
                    if targets[i + 1..].iter().any(|o| o.phi() == q.phi()) {
                        return Err(Error::InvalidConfig("duplicate target quantile"));
                    }
                }
                Ok(())
            }
        }
    }

    /// The invariant `f(r, n)`: the most uncertainty (`g + delta`) an entry
    /// at rank `r` may carry in a summary of `n` observations. Floored, and
    /// clamped so an entry covering a single observation is always legal.
    pub(crate) fn band(&self, rank: f64, n: f64) -> u64 {
        let f = match *self {
            Mode::Biased(epsilon) => 2.0 * epsilon * rank.min(n - rank),
            Mode::Targeted(ref targets) => targets
                .iter()
                .map(|q| {
                    if rank < q.phi() * n {
                        2.0 * q.error() * (n - rank) / (1.0 - q.phi())
                    } else {
                        2.0 * q.error() * rank / q.phi()
                    }
                })
                .fold(f64::INFINITY, f64::min),
        };
        let i = f.floor() as u64;
        if i == 0 {
            1
        } else {
            i
        }
    }

    /// The epsilon whose guarantee covers a query for `phi`: the global one
    /// in biased mode, a matching target's in targeted mode. `None` means no
    /// configured bound applies.
    pub(crate) fn covering_epsilon(&self, phi: f64) -> Option<f64> {
        match *self {
            Mode::Biased(epsilon) => Some(epsilon),
            Mode::Targeted(ref targets) => targets
                .iter()
                .find(|q| (q.phi() - phi).abs() < 1.0e-9)
                .map(Quantile::error),
        }
    }

    /// Observations buffered before an implicit flush. Larger batches
    /// amortize the merge at the cost of queries having more to drain.
    pub(crate) fn buffer_capacity(&self) -> usize {
        let epsilon = match *self {
            Mode::Biased(epsilon) => epsilon,
            Mode::Targeted(ref targets) => {
                targets.iter().map(Quantile::error).fold(1.0, f64::min)
            }
        };
        let threshold = 1.0 / (2.0 * epsilon);
        if threshold < 1.0 {
            1
        } else {
            threshold as usize
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Mode::Biased(epsilon) => write!(f, "biased(epsilon={})", epsilon),
            Mode::Targeted(ref targets) => {
                write!(f, "targeted(")?;
                for (i, q) in targets.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}/{}", q.phi(), q.error())?;
                }
                write!(f, ")")
            }
        }
    }
}
