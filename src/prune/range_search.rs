//! Binary search over sorted range-partition bounds.
//!
//! Resolves a single `key OP value` comparison into a rangeset. Boundary
//! exactness decides the certainty of the edge partition: an exact match on
//! a partition's lower bound under `>=`, or on its (exclusive) upper bound
//! under `<`, covers that partition completely; every other hit leaves the
//! edge partition lossy.

use std::cmp::Ordering;

use datafusion_common::ScalarValue;

use crate::{
    expr::CmpOp,
    ord::Comparator,
    rangeset::{Certainty, IndexRange},
    scheme::RangeEntry,
};

/// Outcome of resolving one scalar comparison against the range layout.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct RangeSelection {
    pub(crate) rangeset: Vec<IndexRange>,
    /// The value fell into a hole no partition owns. Distinct from "always
    /// false": insert routing must refuse such a value rather than drop it.
    pub(crate) found_gap: bool,
}

impl RangeSelection {
    fn empty(found_gap: bool) -> Self {
        Self {
            rangeset: Vec::new(),
            found_gap,
        }
    }

    fn of(rangeset: Vec<IndexRange>) -> Self {
        Self {
            rangeset,
            found_gap: false,
        }
    }
}

/// Select the partitions that can hold rows matching `key OP value`.
///
/// `value` must already be cast onto the key type. Returns `None` when the
/// comparator cannot order the value against the stored bounds; the caller
/// degrades to the full lossy range.
pub(crate) fn select_range_partitions(
    value: &ScalarValue,
    comparator: &Comparator,
    entries: &[RangeEntry],
    op: CmpOp,
) -> Option<RangeSelection> {
    debug_assert!(op != CmpOp::NotEq, "no ordering strategy for !=");

    if entries.is_empty() {
        return Some(RangeSelection::empty(false));
    }
    let last = entries.len() - 1;

    // Fast-path the absolute extremes before searching.
    let cmp_min = comparator.cmp_value_to_bound(value, &entries[0].min)?;
    let cmp_max = comparator.cmp_value_to_bound(value, &entries[last].max)?;

    if (cmp_min <= Ordering::Equal && op == CmpOp::Lt)
        || (cmp_min == Ordering::Less && matches!(op, CmpOp::LtEq | CmpOp::Eq))
    {
        return Some(RangeSelection::empty(op == CmpOp::Eq));
    }
    if cmp_max >= Ordering::Equal && matches!(op, CmpOp::GtEq | CmpOp::Gt | CmpOp::Eq) {
        return Some(RangeSelection::empty(op == CmpOp::Eq));
    }
    if (cmp_min == Ordering::Less && op == CmpOp::Gt)
        || (cmp_min <= Ordering::Equal && op == CmpOp::GtEq)
    {
        return Some(RangeSelection::of(vec![IndexRange::new(
            0,
            last,
            Certainty::Complete,
        )]));
    }
    if cmp_max >= Ordering::Equal && matches!(op, CmpOp::LtEq | CmpOp::Lt) {
        return Some(RangeSelection::of(vec![IndexRange::new(
            0,
            last,
            Certainty::Complete,
        )]));
    }

    // Binary search for the partition whose [min, max) interval holds the
    // value under this strategy.
    let mut start = 0i64;
    let mut end = last as i64;
    let (i, lossy) = loop {
        let i = start + (end - start) / 2;
        let entry = &entries[i as usize];

        let cmp_min = comparator.cmp_value_to_bound(value, &entry.min)?;
        let cmp_max = comparator.cmp_value_to_bound(value, &entry.max)?;

        let is_less = cmp_min == Ordering::Less || (cmp_min == Ordering::Equal && op == CmpOp::Lt);
        let is_greater =
            cmp_max == Ordering::Greater || (cmp_max >= Ordering::Equal && op != CmpOp::Lt);

        if !is_less && !is_greater {
            let lossy = !((op == CmpOp::GtEq && cmp_min == Ordering::Equal)
                || (op == CmpOp::Lt && cmp_max == Ordering::Equal));
            break (i as usize, lossy);
        }

        // Indices have met: the value sits in a hole between partitions.
        if start >= end {
            return Some(RangeSelection::empty(true));
        }

        if is_less {
            end = i - 1;
        } else {
            start = i + 1;
        }
    };

    let rangeset = match op {
        CmpOp::Lt | CmpOp::LtEq => {
            if lossy {
                let mut ranges = Vec::with_capacity(2);
                if i > 0 {
                    ranges.push(IndexRange::new(0, i - 1, Certainty::Complete));
                }
                ranges.push(IndexRange::new(i, i, Certainty::Lossy));
                ranges
            } else {
                vec![IndexRange::new(0, i, Certainty::Complete)]
            }
        }
        CmpOp::Eq => vec![IndexRange::new(i, i, Certainty::Lossy)],
        CmpOp::GtEq | CmpOp::Gt => {
            if lossy {
                let mut ranges = Vec::with_capacity(2);
                ranges.push(IndexRange::new(i, i, Certainty::Lossy));
                if i < last {
                    ranges.push(IndexRange::new(i + 1, last, Certainty::Complete));
                }
                ranges
            } else {
                vec![IndexRange::new(i, last, Certainty::Complete)]
            }
        }
        CmpOp::NotEq => Vec::new(),
    };
    Some(RangeSelection::of(rangeset))
}

#[cfg(test)]
mod tests {
    use arrow_schema::DataType;

    use super::*;
    use crate::scheme::{Collation, PartitionLayout, PartitionScheme, RangeEntry};

    fn int64(v: i64) -> ScalarValue {
        ScalarValue::Int64(Some(v))
    }

    /// Four partitions over [0,10), [10,20), [20,30), [30,40).
    fn scheme() -> PartitionScheme {
        PartitionScheme::range(
            "k",
            DataType::Int64,
            Collation::Binary,
            vec![
                RangeEntry::new(int64(0), int64(10)),
                RangeEntry::new(int64(10), int64(20)),
                RangeEntry::new(int64(20), int64(30)),
                RangeEntry::new(int64(30), int64(40)),
            ],
        )
        .unwrap()
    }

    fn select(value: i64, op: CmpOp) -> RangeSelection {
        let scheme = scheme();
        let PartitionLayout::Range { entries } = scheme.layout() else {
            panic!("range layout expected");
        };
        select_range_partitions(&int64(value), &scheme.comparator(), entries, op).unwrap()
    }

    fn complete(start: usize, end: usize) -> IndexRange {
        IndexRange::new(start, end, Certainty::Complete)
    }

    fn lossy(start: usize, end: usize) -> IndexRange {
        IndexRange::new(start, end, Certainty::Lossy)
    }

    #[test]
    fn eq_inside_a_partition_is_a_lossy_singleton() {
        let sel = select(15, CmpOp::Eq);
        assert_eq!(sel.rangeset, vec![lossy(1, 1)]);
        assert!(!sel.found_gap);
    }

    #[test]
    fn eq_outside_global_bounds_reports_gap() {
        let sel = select(50, CmpOp::Eq);
        assert!(sel.rangeset.is_empty());
        assert!(sel.found_gap);

        let sel = select(-1, CmpOp::Eq);
        assert!(sel.rangeset.is_empty());
        assert!(sel.found_gap);
    }

    #[test]
    fn eq_in_a_hole_reports_gap() {
        let scheme = PartitionScheme::range(
            "k",
            DataType::Int64,
            Collation::Binary,
            vec![
                RangeEntry::new(int64(0), int64(10)),
                RangeEntry::new(int64(20), int64(30)),
            ],
        )
        .unwrap();
        let PartitionLayout::Range { entries } = scheme.layout() else {
            panic!("range layout expected");
        };
        let sel =
            select_range_partitions(&int64(15), &scheme.comparator(), entries, CmpOp::Eq).unwrap();
        assert!(sel.rangeset.is_empty());
        assert!(sel.found_gap);
    }

    #[test]
    fn gt_eq_mid_partition_splits_lossy_and_complete() {
        let sel = select(25, CmpOp::GtEq);
        assert_eq!(sel.rangeset, vec![lossy(2, 2), complete(3, 3)]);
    }

    #[test]
    fn gt_eq_on_lower_bound_is_fully_complete() {
        let sel = select(20, CmpOp::GtEq);
        assert_eq!(sel.rangeset, vec![complete(2, 3)]);
    }

    #[test]
    fn lt_on_exclusive_upper_bound_is_fully_complete() {
        let sel = select(20, CmpOp::Lt);
        assert_eq!(sel.rangeset, vec![complete(0, 1)]);
    }

    #[test]
    fn lt_mid_partition_splits_complete_and_lossy() {
        let sel = select(5, CmpOp::Lt);
        assert_eq!(sel.rangeset, vec![lossy(0, 0)]);

        let sel = select(25, CmpOp::Lt);
        assert_eq!(sel.rangeset, vec![complete(0, 1), lossy(2, 2)]);
    }

    #[test]
    fn lt_eq_on_upper_bound_rolls_into_next_partition() {
        let sel = select(20, CmpOp::LtEq);
        assert_eq!(sel.rangeset, vec![complete(0, 1), lossy(2, 2)]);
    }

    #[test]
    fn gt_on_lower_bound_keeps_edge_lossy() {
        let sel = select(30, CmpOp::Gt);
        assert_eq!(sel.rangeset, vec![lossy(3, 3)]);
    }

    #[test]
    fn extreme_fast_paths() {
        assert!(select(-5, CmpOp::Lt).rangeset.is_empty());
        assert!(select(45, CmpOp::Gt).rangeset.is_empty());
        assert_eq!(select(45, CmpOp::Lt).rangeset, vec![complete(0, 3)]);
        assert_eq!(select(-5, CmpOp::GtEq).rangeset, vec![complete(0, 3)]);
        assert_eq!(select(0, CmpOp::GtEq).rangeset, vec![complete(0, 3)]);
        assert_eq!(select(40, CmpOp::LtEq).rangeset, vec![complete(0, 3)]);
    }

    #[test]
    fn empty_layout_selects_nothing() {
        let scheme =
            PartitionScheme::range("k", DataType::Int64, Collation::Binary, vec![]).unwrap();
        let PartitionLayout::Range { entries } = scheme.layout() else {
            panic!("range layout expected");
        };
        let sel =
            select_range_partitions(&int64(1), &scheme.comparator(), entries, CmpOp::Eq).unwrap();
        assert!(sel.rangeset.is_empty());
        assert!(!sel.found_gap);
    }
}
