//! Closed-form selectivity estimates for cost-based plan choice.

use crate::{
    expr::CmpOp,
    scheme::{PartitionLayout, PartitionScheme},
};

/// Default estimate for range inequalities without statistics.
pub(crate) const DEFAULT_INEQ_SEL: f64 = 1.0 / 3.0;

/// Per-comparison selectivity estimate.
///
/// Equality spreads rows evenly over the partitions; range inequalities take
/// the stock inequality default; anything else is assumed to filter nothing.
pub(crate) fn estimate_op(scheme: &PartitionScheme, op: CmpOp) -> f64 {
    let count = scheme.partition_count();
    if op == CmpOp::Eq {
        if count == 0 {
            return 0.0;
        }
        return 1.0 / count as f64;
    }
    if matches!(scheme.layout(), PartitionLayout::Range { .. })
        && matches!(op, CmpOp::Lt | CmpOp::LtEq | CmpOp::Gt | CmpOp::GtEq)
    {
        return DEFAULT_INEQ_SEL;
    }
    1.0
}
