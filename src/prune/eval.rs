//! Recursive expression walker.
//!
//! # Architecture
//!
//! ```text
//! walk_expr (dispatcher)
//!     ├─> handle_const    (bare key value, insert routing)
//!     ├─> handle_cmp      (=, <, <=, >=, >; != degrades)
//!     ├─> handle_in_list  (IN over an array literal)
//!     └─> handle_bool     (AND intersects, OR unions)
//! ```
//!
//! Unprunable shapes never fail: they degrade to the full lossy range, which
//! is always a safe superset. The only hard errors are insert-routing values
//! that cannot be cast or hashed onto the key.

use datafusion_common::ScalarValue;

use super::{
    context::WalkContext,
    hash,
    range_search::{self, RangeSelection},
    result::PruneNode,
    selectivity,
};
use crate::{
    error::PalingError,
    expr::{CmpOp, Expr, ListOperand, Operand},
    rangeset::{self, Certainty, IndexRange},
    scheme::{PartitionLayout, PartitionScheme},
};

/// Why a scalar comparison could not be resolved into partitions.
///
/// In a query walk every one of these degrades to the full lossy range; in
/// an insert-routing walk they surface as [`PalingError`]s.
enum ResolveFailure {
    Cast,
    NoHash,
    NoComparator,
    UnsupportedOp,
}

pub(crate) fn walk_expr<'a>(
    expr: &'a Expr,
    ctx: &WalkContext<'_>,
) -> Result<PruneNode<'a>, PalingError> {
    match expr {
        Expr::Const(value) => handle_const(expr, value, ctx),
        Expr::Cmp {
            column,
            op,
            operand,
        } => handle_cmp(expr, column, *op, operand, ctx),
        Expr::InList { column, list } => handle_in_list(expr, column, list, ctx),
        Expr::And(parts) => handle_bool(expr, parts, true, ctx),
        Expr::Or(parts) => handle_bool(expr, parts, false, ctx),
        Expr::Not(_) | Expr::Unsupported(_) => Ok(PruneNode::full_lossy(expr, ctx.scheme)),
    }
}

/// Resolve `key OP value` against the scheme layout.
fn resolve_scalar(
    value: &ScalarValue,
    op: CmpOp,
    scheme: &PartitionScheme,
) -> Result<RangeSelection, ResolveFailure> {
    let comparator = scheme.comparator();
    match scheme.layout() {
        PartitionLayout::Hash { partitions } => {
            if op != CmpOp::Eq {
                return Err(ResolveFailure::UnsupportedOp);
            }
            if *partitions == 0 {
                return Ok(RangeSelection::default());
            }
            let cast = comparator.cast(value).ok_or(ResolveFailure::Cast)?;
            let digest =
                hash::digest(&cast, scheme.collation()).ok_or(ResolveFailure::NoHash)?;
            let idx = hash::bucket(digest, *partitions);
            // Hash collisions and cast ambiguity make a bucket match
            // unprovable per-row, so the singleton is always lossy.
            Ok(RangeSelection {
                rangeset: vec![IndexRange::new(idx, idx, Certainty::Lossy)],
                found_gap: false,
            })
        }
        PartitionLayout::Range { entries } => {
            if op == CmpOp::NotEq {
                return Err(ResolveFailure::UnsupportedOp);
            }
            let cast = comparator.cast(value).ok_or(ResolveFailure::Cast)?;
            range_search::select_range_partitions(&cast, &comparator, entries, op)
                .ok_or(ResolveFailure::NoComparator)
        }
    }
}

/// Resolution of a bare constant: the rangeset it routes to plus the
/// selectivity and gap flag the node should carry.
struct ConstResolution {
    rangeset: Vec<IndexRange>,
    selectivity: f64,
    found_gap: bool,
}

fn resolve_const(
    value: &ScalarValue,
    ctx: &WalkContext<'_>,
) -> Result<ConstResolution, ResolveFailure> {
    // A NULL key value satisfies no partition predicate, and outside an
    // insert context there is nothing to route.
    if !ctx.for_insert || value.is_null() {
        return Ok(ConstResolution {
            rangeset: Vec::new(),
            selectivity: 0.0,
            found_gap: false,
        });
    }
    let selection = resolve_scalar(value, CmpOp::Eq, ctx.scheme)?;
    Ok(ConstResolution {
        rangeset: selection.rangeset,
        selectivity: selectivity::estimate_op(ctx.scheme, CmpOp::Eq),
        found_gap: selection.found_gap,
    })
}

fn routing_error(
    failure: ResolveFailure,
    value: &ScalarValue,
    scheme: &PartitionScheme,
) -> PalingError {
    match failure {
        ResolveFailure::Cast => PalingError::TypeCast {
            value_type: value.data_type(),
            target_type: scheme.key_type().clone(),
        },
        ResolveFailure::NoHash => PalingError::Unhashable {
            key_type: scheme.key_type().clone(),
        },
        ResolveFailure::NoComparator | ResolveFailure::UnsupportedOp => {
            PalingError::NoComparator {
                key_type: scheme.key_type().clone(),
            }
        }
    }
}

fn handle_const<'a>(
    expr: &'a Expr,
    value: &ScalarValue,
    ctx: &WalkContext<'_>,
) -> Result<PruneNode<'a>, PalingError> {
    match resolve_const(value, ctx) {
        Ok(resolution) => Ok(PruneNode {
            expr,
            rangeset: resolution.rangeset,
            children: Vec::new(),
            selectivity: resolution.selectivity,
            found_gap: resolution.found_gap,
        }),
        Err(failure) => Err(routing_error(failure, value, ctx.scheme)),
    }
}

fn handle_cmp<'a>(
    expr: &'a Expr,
    column: &str,
    op: CmpOp,
    operand: &Operand,
    ctx: &WalkContext<'_>,
) -> Result<PruneNode<'a>, PalingError> {
    let scheme = ctx.scheme;
    if column != scheme.key_column() {
        return Ok(PruneNode::full_lossy(expr, scheme));
    }

    match operand {
        Operand::Value(value) => {
            if value.is_null() {
                // `key OP NULL` matches no rows, but still costs like an
                // unfiltered scan of whatever survives.
                return Ok(PruneNode {
                    expr,
                    rangeset: Vec::new(),
                    children: Vec::new(),
                    selectivity: 1.0,
                    found_gap: false,
                });
            }
            match resolve_scalar(value, op, scheme) {
                Ok(selection) => Ok(PruneNode {
                    expr,
                    rangeset: selection.rangeset,
                    children: Vec::new(),
                    selectivity: selectivity::estimate_op(scheme, op),
                    found_gap: selection.found_gap,
                }),
                Err(_) => Ok(PruneNode::full_lossy(expr, scheme)),
            }
        }
        // No pruning possible, but the cost model still wants a number.
        Operand::Param => {
            let mut node = PruneNode::full_lossy(expr, scheme);
            node.selectivity = selectivity::estimate_op(scheme, op);
            Ok(node)
        }
    }
}

fn handle_in_list<'a>(
    expr: &'a Expr,
    column: &str,
    list: &ListOperand,
    ctx: &WalkContext<'_>,
) -> Result<PruneNode<'a>, PalingError> {
    let scheme = ctx.scheme;
    if column != scheme.key_column() {
        return Ok(PruneNode::full_lossy(expr, scheme));
    }
    let ListOperand::Values(values) = list else {
        return Ok(PruneNode::full_lossy(expr, scheme));
    };

    // Elements resolve as bare constants, so allow eager evaluation even in
    // a plain planning walk.
    let nested = WalkContext {
        for_insert: true,
        ..*ctx
    };

    let mut rangeset: Vec<IndexRange> = Vec::new();
    let mut sel = 0.0f64;
    let mut found_gap = false;
    for value in values {
        match resolve_const(value, &nested) {
            Ok(resolution) => {
                rangeset = rangeset::union(&rangeset, &resolution.rangeset);
                sel = sel.max(resolution.selectivity);
                found_gap |= resolution.found_gap;
            }
            Err(_) => return Ok(PruneNode::full_lossy(expr, scheme)),
        }
    }

    Ok(PruneNode {
        expr,
        rangeset,
        children: Vec::new(),
        selectivity: sel,
        found_gap,
    })
}

fn handle_bool<'a>(
    expr: &'a Expr,
    parts: &'a [Expr],
    is_and: bool,
    ctx: &WalkContext<'_>,
) -> Result<PruneNode<'a>, PalingError> {
    let count = ctx.scheme.partition_count();
    let mut node = PruneNode {
        expr,
        rangeset: if is_and {
            rangeset::full_range(count, Certainty::Complete)
        } else {
            Vec::new()
        },
        children: Vec::with_capacity(parts.len()),
        selectivity: 1.0,
        found_gap: false,
    };

    for part in parts {
        let child = walk_expr(part, ctx)?;
        if is_and {
            node.rangeset = rangeset::intersection(&node.rangeset, &child.rangeset);
            node.selectivity *= child.selectivity;
        } else {
            node.rangeset = rangeset::union(&node.rangeset, &child.rangeset);
        }
        node.found_gap |= child.found_gap;
        node.children.push(child);
    }

    if !is_and {
        // Independence assumption, weighted by how much of the index space
        // each branch actually covers.
        let total = rangeset::length(&node.rangeset);
        let mut sel = 1.0;
        for child in &node.children {
            let len = rangeset::length(&child.rangeset);
            let frac = if total > 0 {
                len as f64 / total as f64
            } else {
                0.0
            };
            sel *= 1.0 - child.selectivity * frac;
        }
        node.selectivity = 1.0 - sel;
    }

    Ok(node)
}
