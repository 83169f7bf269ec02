//! The compressed summary behind an estimator.
//!
//! This is an implementation of the summary structure from Cormode, Korn,
//! Muthukrishnan and Srivastava's "Effective Computation of Biased Quantiles
//! over Data Streams". Observations are buffered raw, then folded in batches
//! into an ordered sequence of weighted entries. Each entry knows how many
//! observations it stands for (`g`) and how wrong that count may be
//! (`delta`); the mode's invariant function caps `g + delta` by rank, which
//! is the whole correctness story: a query can never be further from its
//! target rank than the invariant allows at that rank.
//!
//! The outlined implementation uses a linked list but we prefer a contiguous
//! `Vec` for reasons of cache locality; compression is a single reverse scan
//! so the loss of O(1) splicing costs nothing.

mod entry;

pub(crate) use self::entry::Entry;

use crate::error::Error;
use crate::mode::Mode;

/// The ordered entry sequence plus its insertion buffer.
///
/// Owned exclusively by an estimator. Not safe for concurrent use: flushing
/// rewrites adjacent entries in place, so callers sharing one across threads
/// must supply their own lock.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde_support", derive(serde::Serialize, serde::Deserialize))]
pub(crate) struct Summary {
    mode: Mode,

    // Raw values accepted since the last flush. Exists purely to amortize
    // the merge: a batch of b values costs one O(b log b) sort and one
    // linear pass over the sequence.
    buffer: Vec<f64>,
    buffer_cap: usize,

    // The S(n) of the paper, strictly non-decreasing by value.
    entries: Vec<Entry>,

    // Observations folded into `entries`; buffered values are not counted
    // until they flush.
    n: u64,
}

impl Summary {
    pub(crate) fn new(mode: Mode) -> Summary {
        let buffer_cap = mode.buffer_capacity();
        Summary {
            mode,
            buffer: Vec::with_capacity(buffer_cap),
            buffer_cap,
            entries: Vec::new(),
            n: 0,
        }
    }

    pub(crate) fn mode(&self) -> &Mode {
        &self.mode
    }

    /// Observations accepted over the summary's lifetime, flushed or not.
    pub(crate) fn count(&self) -> u64 {
        self.n + self.buffer.len() as u64
    }

    /// Observations folded into the entry sequence so far.
    pub(crate) fn flushed(&self) -> u64 {
        self.n
    }

    pub(crate) fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Accept one observation. O(1) until the buffer fills, then the cost of
    /// one flush.
    pub(crate) fn insert(&mut self, v: f64) {
        self.buffer.push(v);
        if self.buffer.len() >= self.buffer_cap {
            self.flush();
        }
    }

    /// Drain the buffer into the entry sequence and compress. A no-op when
    /// nothing is buffered.
    pub(crate) fn flush(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        self.buffer.sort_unstable_by(f64::total_cmp);

        let new_n = self.n + self.buffer.len() as u64;
        let n = new_n as f64;
        let old = std::mem::take(&mut self.entries);
        let mut merged: Vec<Entry> = Vec::with_capacity(old.len() + self.buffer.len());

        let mut old_idx = 0;
        let mut rank: u64 = 0;
        for &v in &self.buffer {
            let mut fresh = Entry { v, g: 1, delta: 0 };
            while old_idx < old.len() && old[old_idx] <= fresh {
                rank += old[old_idx].g;
                merged.push(old[old_idx]);
                old_idx += 1;
            }
            rank += 1;
            // A value entering as the running minimum or maximum is exact.
            // Anything landing between existing entries may have been
            // preceded by up to band - 1 unseen observations at its rank.
            if !(merged.is_empty() || old_idx == old.len()) {
                fresh.delta = self.mode.band(rank as f64, n) - 1;
            }
            merged.push(fresh);
        }
        merged.extend_from_slice(&old[old_idx..]);

        self.buffer.clear();
        self.entries = merged;
        self.n = new_n;
        self.compress();
    }

    // One reverse scan. Each entry is folded into its right neighbor when
    // the neighbor's band has room for the combined weight; the check uses
    // the surviving entry's rank, so the invariant holds exactly after every
    // fold. The first and last entries are never removed.
    fn compress(&mut self) {
        if self.entries.len() < 3 {
            return;
        }
        let n = self.n as f64;

        let mut ranks: Vec<u64> = Vec::with_capacity(self.entries.len());
        let mut r: u64 = 0;
        for e in &self.entries {
            r += e.g;
            ranks.push(r);
        }

        let last = self.entries.len() - 1;
        let mut compressed: Vec<Entry> = Vec::with_capacity(self.entries.len());
        let mut survivor = self.entries[last];
        let mut survivor_rank = ranks[last];
        for i in (1..last).rev() {
            let cur = self.entries[i];
            if cur.g + survivor.g + survivor.delta
                <= self.mode.band(survivor_rank as f64, n)
            {
                survivor.g += cur.g;
            } else {
                compressed.push(survivor);
                survivor = cur;
                survivor_rank = ranks[i];
            }
        }
        compressed.push(survivor);
        compressed.push(self.entries[0]);
        compressed.reverse();
        self.entries = compressed;
    }

    /// Answer a rank query against the flushed sequence.
    ///
    /// The buffer is drained first so the answer reflects every inserted
    /// value. Returns the value plus the epsilon its guarantee carries; a
    /// targeted-mode query for an unconfigured quantile reports the wider,
    /// unguaranteed bound the invariant implies at that rank.
    pub(crate) fn query(&mut self, phi: f64) -> Result<(f64, f64), Error> {
        if !(phi > 0.0 && phi < 1.0) {
            return Err(Error::InvalidQuantile(phi));
        }
        if !self.buffer.is_empty() {
            self.flush();
            self.verify()?;
        }
        if self.n == 0 {
            return Err(Error::EmptyStream);
        }

        let n = self.n as f64;
        let target = phi * n;
        let half_band = self.mode.band(target, n) as f64 / 2.0;
        let effective = match self.mode.covering_epsilon(phi) {
            Some(epsilon) => epsilon,
            None => half_band / n,
        };

        let mut rank: u64 = 0;
        for i in 1..self.entries.len() {
            rank += self.entries[i - 1].g;
            let cur = &self.entries[i];
            if (rank + cur.g + cur.delta) as f64 > target + half_band {
                return Ok((self.entries[i - 1].v, effective));
            }
        }
        match self.entries.last() {
            Some(e) => Ok((e.v, effective)),
            None => Err(Error::EmptyStream),
        }
    }

    /// Re-check the band invariant over the whole sequence. A violation is
    /// an implementation bug surfacing, never a usage error.
    pub(crate) fn verify(&self) -> Result<(), Error> {
        let n = self.n as f64;
        let mut rank: u64 = 0;
        for e in &self.entries {
            rank += e.g;
            let allowed = self.mode.band(rank as f64, n);
            if e.g + e.delta > allowed {
                return Err(Error::InvariantViolation {
                    rank,
                    allowed,
                    actual: e.g + e.delta,
                });
            }
        }
        Ok(())
    }

    /// Replay another summary's observations into this one, weight by
    /// weight, through the normal insertion path. Keeps `sum(g) == n` and
    /// the band invariant intact; costs the same as having inserted the
    /// other stream here in the first place.
    pub(crate) fn absorb(&mut self, other: Summary) {
        for e in &other.entries {
            for _ in 0..e.g {
                self.insert(e.v);
            }
        }
        for v in other.buffer {
            self.insert(v);
        }
    }
}
