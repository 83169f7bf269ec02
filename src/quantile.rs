use crate::error::Error;

/// A target quantile paired with the rank error it tolerates.
///
/// In targeted mode each configured `Quantile` gets its own guarantee: a
/// query for `phi` returns a value whose rank is within `error * n` of
/// `phi * n`. The pair is validated once, here, and is immutable afterwards.
///
/// # Examples
/// ```
/// use stream_quantiles::Quantile;
///
/// let q = Quantile::new(0.95, 0.0001).unwrap();
/// assert_eq!(q.phi(), 0.95);
/// assert_eq!(q.error(), 0.0001);
///
/// // An error bound that reaches a boundary is meaningless.
/// assert!(Quantile::new(0.9, 0.2).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde_support", derive(serde::Serialize, serde::Deserialize))]
pub struct Quantile {
    phi: f64,
    error: f64,
}

impl Quantile {
    /// Pair a quantile with its acceptable error.
    ///
    /// Fails with [`Error::InvalidQuantile`] unless `0 < phi < 1` and
    /// `0 < error < min(phi, 1 - phi)`.
    pub fn new(phi: f64, error: f64) -> Result<Quantile, Error> {
        if !(phi > 0.0 && phi < 1.0) {
            return Err(Error::InvalidQuantile(phi));
        }
        if !(error > 0.0) || error >= phi.min(1.0 - phi) {
            return Err(Error::InvalidQuantile(phi));
        }
        Ok(Quantile { phi, error })
    }

    /// The target quantile, in (0, 1).
    pub fn phi(&self) -> f64 {
        self.phi
    }

    /// The acceptable rank error as a fraction of the stream length.
    pub fn error(&self) -> f64 {
        self.error
    }
}
