use std::cmp;

/// A weighted observation in the compressed sequence.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde_support", derive(serde::Serialize, serde::Deserialize))]
pub struct Entry {
    /// The observed value this entry stands for.
    pub v: f64,
    /// Observations ranked between the previous entry and this one,
    /// inclusive of this one.
    pub g: u64,
    /// The most `g` can be off by, fixed when the entry was created.
    pub delta: u64,
}

// Deriving PartialEq would be wrong here: two entries describe the same
// point in the ordering whenever their values agree, whatever their
// bookkeeping says.
impl PartialEq for Entry {
    fn eq(&self, other: &Entry) -> bool {
        self.v == other.v
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Entry) -> Option<cmp::Ordering> {
        self.v.partial_cmp(&other.v)
    }
}
