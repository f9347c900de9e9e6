//! Pruning results and per-partition filter materialization.

use roaring::RoaringBitmap;

use crate::{
    expr::Expr,
    rangeset::{self, Certainty, IndexRange},
    selection::rangeset_to_roaring,
};

/// Per-expression-node outcome of the walk: the candidate rangeset, the
/// child outcomes (for boolean nodes) and a selectivity estimate.
///
/// Nodes borrow the expression tree they were walked over; they live only as
/// long as one pruning call's result.
#[derive(Clone, Debug)]
pub(crate) struct PruneNode<'a> {
    pub(crate) expr: &'a Expr,
    pub(crate) rangeset: Vec<IndexRange>,
    pub(crate) children: Vec<PruneNode<'a>>,
    pub(crate) selectivity: f64,
    pub(crate) found_gap: bool,
}

impl<'a> PruneNode<'a> {
    /// The conservative answer: every partition, all lossy, no filtering
    /// benefit assumed.
    pub(crate) fn full_lossy(expr: &'a Expr, scheme: &crate::scheme::PartitionScheme) -> Self {
        Self {
            expr,
            rangeset: rangeset::full_range(scheme.partition_count(), Certainty::Lossy),
            children: Vec::new(),
            selectivity: 1.0,
            found_gap: false,
        }
    }

    /// Rebuild the filter relevant to one partition (see [`PartitionFilter`]).
    fn filter_for(&self, index: usize) -> PartitionFilter {
        match rangeset::find(&self.rangeset, index) {
            None => PartitionFilter::Excluded,
            Some(Certainty::Complete) => PartitionFilter::AlwaysTrue,
            Some(Certainty::Lossy) => self.rebuild_filter(index),
        }
    }

    fn rebuild_filter(&self, index: usize) -> PartitionFilter {
        let is_and = match self.expr {
            Expr::And(_) => true,
            Expr::Or(_) => false,
            // Leaf nodes recheck the original comparison as-is.
            _ => return PartitionFilter::Recheck(self.expr.clone()),
        };

        let mut args = Vec::new();
        for child in &self.children {
            match child.filter_for(index) {
                PartitionFilter::Recheck(expr) => args.push(expr),
                // A satisfied conjunct adds nothing to the recheck.
                PartitionFilter::AlwaysTrue if is_and => {}
                // A proven disjunct proves the whole disjunction.
                PartitionFilter::AlwaysTrue => return PartitionFilter::AlwaysTrue,
                PartitionFilter::Excluded if is_and => return PartitionFilter::Excluded,
                // An empty disjunct drops out of the recheck.
                PartitionFilter::Excluded => {}
            }
        }

        match args.len() {
            0 => PartitionFilter::Recheck(self.expr.clone()),
            // Remove the redundant AND/OR around a single survivor.
            1 => match args.pop() {
                Some(expr) => PartitionFilter::Recheck(expr),
                None => PartitionFilter::Recheck(self.expr.clone()),
            },
            _ => PartitionFilter::Recheck(if is_and {
                Expr::And(args)
            } else {
                Expr::Or(args)
            }),
        }
    }
}

/// What one partition's scan must do about the original predicate.
#[derive(Clone, Debug, PartialEq)]
pub enum PartitionFilter {
    /// The partition cannot contain matching rows; skip it entirely.
    Excluded,
    /// Every row in the partition matches; scan without rechecking.
    AlwaysTrue,
    /// Scan and recheck this (possibly simplified) predicate per row.
    Recheck(Expr),
}

/// Result of one top-level pruning call.
#[derive(Clone, Debug)]
pub struct PruneResult<'a> {
    root: Option<PruneNode<'a>>,
    rangeset: Vec<IndexRange>,
    selectivity: f64,
    found_gap: bool,
    roaring: Option<RoaringBitmap>,
}

impl<'a> PruneResult<'a> {
    pub(crate) fn new(root: PruneNode<'a>, emit_roaring: bool) -> Self {
        let rangeset = root.rangeset.clone();
        let roaring = emit_roaring
            .then(|| rangeset_to_roaring(&rangeset))
            .flatten();
        Self {
            selectivity: root.selectivity,
            found_gap: root.found_gap,
            root: Some(root),
            rangeset,
            roaring,
        }
    }

    /// A no-predicate result: every partition, provably matching.
    pub(crate) fn unfiltered(count: usize, emit_roaring: bool) -> Self {
        let rangeset = rangeset::full_range(count, Certainty::Complete);
        let roaring = emit_roaring
            .then(|| rangeset_to_roaring(&rangeset))
            .flatten();
        Self {
            root: None,
            rangeset,
            selectivity: 1.0,
            found_gap: false,
            roaring,
        }
    }

    /// The candidate rangeset, sorted and maximally merged.
    pub fn rangeset(&self) -> &[IndexRange] {
        &self.rangeset
    }

    /// Candidate partition indexes, ascending.
    pub fn partitions(&self) -> Vec<usize> {
        self.rangeset
            .iter()
            .flat_map(|r| r.start..=r.end)
            .collect()
    }

    /// Estimated fraction of rows matching the predicate.
    pub fn selectivity(&self) -> f64 {
        self.selectivity
    }

    /// Whether a value fell into a hole no partition owns. Callers routing
    /// an insert must refuse the row rather than treat this as "no match".
    pub fn found_gap(&self) -> bool {
        self.found_gap
    }

    /// The certainty with which `index` is a candidate, if at all.
    pub fn certainty_of(&self, index: usize) -> Option<Certainty> {
        rangeset::find(&self.rangeset, index)
    }

    /// The filter the scan of partition `index` must apply, with branches
    /// irrelevant to that partition removed.
    pub fn filter_for(&self, index: usize) -> PartitionFilter {
        match &self.root {
            Some(root) => root.filter_for(index),
            None => match rangeset::find(&self.rangeset, index) {
                Some(_) => PartitionFilter::AlwaysTrue,
                None => PartitionFilter::Excluded,
            },
        }
    }

    /// Roaring bitmap of the candidate set, when requested and representable.
    pub fn roaring(&self) -> Option<&RoaringBitmap> {
        self.roaring.as_ref()
    }
}
