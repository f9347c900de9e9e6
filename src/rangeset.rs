//! Ordered sets of partition-index ranges with a certainty marker.
//!
//! Every operation here returns lists that are sorted, non-overlapping and
//! maximally coalesced (adjacent ranges with the same certainty are merged),
//! so composition under the walker stays associative.

/// Certainty marker on an index range.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Certainty {
    /// Every row in the covered partitions satisfies the predicate; no
    /// per-row recheck is needed.
    Complete,
    /// The covered partitions may contain non-matching rows; the predicate
    /// must be rechecked per row at execution.
    Lossy,
}

/// A contiguous inclusive span of partition indexes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct IndexRange {
    pub start: usize,
    pub end: usize,
    pub certainty: Certainty,
}

impl IndexRange {
    pub fn new(start: usize, end: usize, certainty: Certainty) -> Self {
        debug_assert!(start <= end);
        Self {
            start,
            end,
            certainty,
        }
    }

    /// Number of partition indexes covered.
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    pub fn is_lossy(&self) -> bool {
        self.certainty == Certainty::Lossy
    }
}

/// The whole-table range `[0, count-1]` with the given certainty.
///
/// An empty scheme yields an empty rangeset, not an error.
pub fn full_range(count: usize, certainty: Certainty) -> Vec<IndexRange> {
    if count == 0 {
        return Vec::new();
    }
    vec![IndexRange::new(0, count - 1, certainty)]
}

/// Total count of indexes covered by a rangeset.
pub fn length(ranges: &[IndexRange]) -> usize {
    ranges.iter().map(IndexRange::len).sum()
}

/// Point lookup: the certainty with which `index` is covered, if at all.
pub fn find(ranges: &[IndexRange], index: usize) -> Option<Certainty> {
    let i = ranges.partition_point(|r| r.end < index);
    match ranges.get(i) {
        Some(r) if r.start <= index => Some(r.certainty),
        _ => None,
    }
}

/// Append `range` to `out`, coalescing with the tail when the two touch and
/// carry the same certainty.
fn push_coalesced(out: &mut Vec<IndexRange>, range: IndexRange) {
    if let Some(last) = out.last_mut()
        && last.certainty == range.certainty
        && last.end + 1 >= range.start
    {
        last.end = last.end.max(range.end);
        return;
    }
    out.push(range);
}

/// How a segment of the index space is covered during a sweep.
#[derive(Clone, Copy)]
enum Coverage {
    None,
    One(Certainty),
    Both(Certainty, Certainty),
}

/// Sweep two sorted rangesets in lockstep, classifying each maximal segment
/// of the index space by coverage and handing it to `emit`.
fn sweep<F>(a: &[IndexRange], b: &[IndexRange], mut emit: F) -> Vec<IndexRange>
where
    F: FnMut(Coverage) -> Option<Certainty>,
{
    let mut out = Vec::new();
    let (mut ia, mut ib) = (0usize, 0usize);
    let mut pos = match (a.first(), b.first()) {
        (Some(ra), Some(rb)) => ra.start.min(rb.start),
        (Some(ra), None) => ra.start,
        (None, Some(rb)) => rb.start,
        (None, None) => return out,
    };

    loop {
        while ia < a.len() && a[ia].end < pos {
            ia += 1;
        }
        while ib < b.len() && b[ib].end < pos {
            ib += 1;
        }
        let ra = a.get(ia);
        let rb = b.get(ib);
        if ra.is_none() && rb.is_none() {
            break;
        }

        let ra_covers = ra.is_some_and(|r| r.start <= pos);
        let rb_covers = rb.is_some_and(|r| r.start <= pos);

        if !ra_covers && !rb_covers {
            // Jump the hole to the nearest upcoming start.
            pos = match (ra, rb) {
                (Some(ra), Some(rb)) => ra.start.min(rb.start),
                (Some(ra), None) => ra.start,
                (None, Some(rb)) => rb.start,
                (None, None) => break,
            };
            continue;
        }

        // End of the current homogeneous segment: the nearest covering range
        // end, or the step just before the next range begins.
        let mut seg_end = usize::MAX;
        if let Some(r) = ra {
            seg_end = seg_end.min(if ra_covers { r.end } else { r.start - 1 });
        }
        if let Some(r) = rb {
            seg_end = seg_end.min(if rb_covers { r.end } else { r.start - 1 });
        }

        let ca = ra.filter(|_| ra_covers).map(|r| r.certainty);
        let cb = rb.filter(|_| rb_covers).map(|r| r.certainty);
        let coverage = match (ca, cb) {
            (Some(ca), Some(cb)) => Coverage::Both(ca, cb),
            (Some(ca), None) => Coverage::One(ca),
            (None, Some(cb)) => Coverage::One(cb),
            (None, None) => Coverage::None,
        };

        if let Some(certainty) = emit(coverage) {
            push_coalesced(&mut out, IndexRange::new(pos, seg_end, certainty));
        }
        pos = seg_end + 1;
    }
    out
}

/// Merge two sorted rangesets into their union.
///
/// A segment covered by both inputs is `Complete` only when both inputs are
/// `Complete` over it; a segment covered by one input keeps that input's
/// certainty. `union(A, A) == A`.
pub fn union(a: &[IndexRange], b: &[IndexRange]) -> Vec<IndexRange> {
    sweep(a, b, |coverage| match coverage {
        Coverage::Both(Certainty::Complete, Certainty::Complete) => Some(Certainty::Complete),
        Coverage::Both(_, _) => Some(Certainty::Lossy),
        Coverage::One(certainty) => Some(certainty),
        Coverage::None => None,
    })
}

/// Intersect two sorted rangesets.
///
/// Only segments covered by both inputs survive; a surviving segment is
/// `Complete` only when both inputs are `Complete` over it.
/// `intersection(A, A) == A`.
pub fn intersection(a: &[IndexRange], b: &[IndexRange]) -> Vec<IndexRange> {
    sweep(a, b, |coverage| match coverage {
        Coverage::Both(Certainty::Complete, Certainty::Complete) => Some(Certainty::Complete),
        Coverage::Both(_, _) => Some(Certainty::Lossy),
        _ => None,
    })
}
