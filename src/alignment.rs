//! [`Alignment`]: a many-to-many relation between segment identities.

use std::collections::{HashMap, HashSet};

use crate::error::{MarkupError, MarkupResult};
use crate::segment::SegmentId;

/// A multimap `src -> {tgt}` over [`SegmentId`]s, with a reverse index kept in
/// sync so `is_tgt_aligned` stays O(1) amortized instead of scanning every
/// source bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Alignment {
    forward: HashMap<SegmentId, HashSet<SegmentId>>,
    reverse: HashMap<SegmentId, HashSet<SegmentId>>,
}

impl Alignment {
    pub fn new() -> Self {
        Alignment::default()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Adds `(src, tgt)`. Re-adding an already-present pair is a no-op.
    pub fn add(&mut self, src: SegmentId, tgt: SegmentId) {
        self.forward.entry(src).or_default().insert(tgt);
        self.reverse.entry(tgt).or_default().insert(src);
    }

    /// Removes `(src, tgt)`. Fails with [`MarkupError::AbsentAlignment`] if
    /// the pair was never present.
    pub fn remove(&mut self, src: SegmentId, tgt: SegmentId) -> MarkupResult<()> {
        let removed = self
            .forward
            .get_mut(&src)
            .map(|tgts| tgts.remove(&tgt))
            .unwrap_or(false);
        if !removed {
            return Err(MarkupError::AbsentAlignment);
        }
        if self.forward.get(&src).map(HashSet::is_empty).unwrap_or(false) {
            self.forward.remove(&src);
        }
        if let Some(srcs) = self.reverse.get_mut(&tgt) {
            srcs.remove(&src);
            if srcs.is_empty() {
                self.reverse.remove(&tgt);
            }
        }
        Ok(())
    }

    pub fn is_src_aligned(&self, src: SegmentId) -> bool {
        self.forward.get(&src).map(|s| !s.is_empty()).unwrap_or(false)
    }

    pub fn is_tgt_aligned(&self, tgt: SegmentId) -> bool {
        self.reverse.get(&tgt).map(|s| !s.is_empty()).unwrap_or(false)
    }

    /// Every target currently aligned to `src`, in no particular order.
    pub fn get(&self, src: SegmentId) -> Vec<SegmentId> {
        self.forward
            .get(&src)
            .map(|s| s.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn get_reverse(&self, tgt: SegmentId) -> Vec<SegmentId> {
        self.reverse
            .get(&tgt)
            .map(|s| s.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn pairs(&self) -> Vec<(SegmentId, SegmentId)> {
        let mut out = Vec::new();
        for (&src, tgts) in &self.forward {
            for &tgt in tgts {
                out.push((src, tgt));
            }
        }
        out
    }

    /// Transposes every pair, turning a `src -> tgt` relation into `tgt -> src`.
    pub fn swap(&self) -> Self {
        let mut swapped = Alignment::new();
        for (src, tgt) in self.pairs() {
            swapped.add(tgt, src);
        }
        swapped
    }

    /// Relational composition through a shared middle: for every `(a, b)` in
    /// `self` and `(b, c)` in `other`, emits `(a, c)`.
    pub fn compose(&self, other: &Alignment) -> Self {
        let mut composed = Alignment::new();
        for (a, b) in self.pairs() {
            for c in other.get(b) {
                composed.add(a, c);
            }
        }
        composed
    }

    /// Union of two alignments; the empty alignment is the identity.
    pub fn union(&self, other: &Alignment) -> Self {
        let mut out = self.clone();
        for (src, tgt) in other.pairs() {
            out.add(src, tgt);
        }
        out
    }
}
