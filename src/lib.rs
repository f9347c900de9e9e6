//! Predicate-driven partition pruning.
//!
//! Given a resolved partitioning scheme (hash buckets or sorted range
//! intervals) and a filter expression, `paling` computes which partitions
//! could hold matching rows, tags each candidate as provably matching or
//! needing a per-row recheck, and estimates the predicate's selectivity for
//! cost-based planning. It never scans data: everything is derived from the
//! scheme's metadata, so an unprunable predicate degrades to "all
//! partitions, recheck everywhere" rather than failing.
//!
//! ```
//! use arrow_schema::DataType;
//! use datafusion_common::ScalarValue;
//! use paling::{Certainty, Collation, Expr, PartitionScheme, PruneRequest, RangeEntry};
//!
//! # fn main() -> Result<(), paling::PalingError> {
//! let scheme = PartitionScheme::range(
//!     "ts",
//!     DataType::Int64,
//!     Collation::Binary,
//!     vec![
//!         RangeEntry::new(ScalarValue::Int64(Some(0)), ScalarValue::Int64(Some(100))),
//!         RangeEntry::new(ScalarValue::Int64(Some(100)), ScalarValue::Int64(Some(200))),
//!         RangeEntry::new(ScalarValue::Int64(Some(200)), ScalarValue::Int64(Some(300))),
//!     ],
//! )?;
//!
//! let expr = Expr::gt_eq("ts", ScalarValue::Int64(Some(100)));
//! let result = PruneRequest::new(&scheme).with_predicate(&expr).prune()?;
//!
//! assert_eq!(result.partitions(), vec![1, 2]);
//! assert_eq!(result.certainty_of(1), Some(Certainty::Complete));
//! assert_eq!(result.certainty_of(0), None);
//! # Ok(())
//! # }
//! ```

mod error;
pub mod expr;
pub mod ord;
mod prune;
pub mod rangeset;
pub mod scheme;
mod selection;

pub use error::PalingError;
pub use expr::{CmpOp, Expr, ListOperand, Operand};
pub use ord::Comparator;
pub use prune::{PartitionFilter, PruneOptions, PruneOptionsBuilder, PruneRequest, PruneResult};
pub use rangeset::{Certainty, IndexRange, full_range, intersection, union};
pub use scheme::{Bound, Collation, PartitionLayout, PartitionScheme, RangeEntry};
pub use selection::{rangeset_to_roaring, roaring_to_rangeset};
