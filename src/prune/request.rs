use super::{
    context::WalkContext,
    eval::walk_expr,
    options::{PruneOptions, PruneOptionsBuilder},
    result::PruneResult,
};
use crate::{error::PalingError, expr::Expr, scheme::PartitionScheme};

/// Builder for one-shot pruning calls.
///
/// Borrows the scheme and the expression tree for the duration of the call;
/// the scheme must not be mutated concurrently (callers hold a read-stable
/// snapshot), which its immutable construction already guarantees.
///
/// # Examples
///
/// ```
/// use arrow_schema::DataType;
/// use datafusion_common::ScalarValue;
/// use paling::{Collation, Expr, PartitionScheme, PruneRequest, RangeEntry};
///
/// # fn main() -> Result<(), paling::PalingError> {
/// let scheme = PartitionScheme::range(
///     "k",
///     DataType::Int64,
///     Collation::Binary,
///     vec![
///         RangeEntry::new(ScalarValue::Int64(Some(0)), ScalarValue::Int64(Some(10))),
///         RangeEntry::new(ScalarValue::Int64(Some(10)), ScalarValue::Int64(Some(20))),
///     ],
/// )?;
/// let expr = Expr::eq("k", ScalarValue::Int64(Some(15)));
///
/// let result = PruneRequest::new(&scheme).with_predicate(&expr).prune()?;
/// assert_eq!(result.partitions(), vec![1]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct PruneRequest<'a> {
    scheme: &'a PartitionScheme,
    expr: Option<&'a Expr>,
    options: PruneOptionsBuilder,
}

impl<'a> PruneRequest<'a> {
    /// Creates a new pruning request for the given scheme.
    pub fn new(scheme: &'a PartitionScheme) -> Self {
        Self {
            scheme,
            expr: None,
            options: PruneOptions::builder(),
        }
    }

    /// Sets the filter predicate to evaluate. Without one, every partition
    /// is a provably-matching candidate.
    pub fn with_predicate(mut self, expr: &'a Expr) -> Self {
        self.expr = Some(expr);
        self
    }

    /// Enables eager constant evaluation for insert routing.
    ///
    /// Defaults to `false`.
    pub fn for_insert(mut self, enable: bool) -> Self {
        self.options = self.options.for_insert(enable);
        self
    }

    /// Enables roaring bitmap output on the result.
    ///
    /// Defaults to `false`.
    pub fn emit_roaring(mut self, enable: bool) -> Self {
        self.options = self.options.emit_roaring(enable);
        self
    }

    /// Replaces the accumulated options wholesale.
    pub fn with_options(mut self, options: &PruneOptions) -> Self {
        self.options = PruneOptions::builder()
            .for_insert(options.for_insert())
            .emit_roaring(options.emit_roaring());
        self
    }

    /// Executes the pruning walk.
    ///
    /// Unprunable predicate shapes degrade to the full lossy candidate set;
    /// `Err` means corrupted metadata or an unroutable insert value.
    pub fn prune(self) -> Result<PruneResult<'a>, PalingError> {
        let options = self.options.build();
        let Some(expr) = self.expr else {
            return Ok(PruneResult::unfiltered(
                self.scheme.partition_count(),
                options.emit_roaring(),
            ));
        };
        let ctx = WalkContext {
            scheme: self.scheme,
            for_insert: options.for_insert(),
        };
        let root = walk_expr(expr, &ctx)?;
        Ok(PruneResult::new(root, options.emit_roaring()))
    }
}
