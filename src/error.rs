use arrow_schema::DataType;
use thiserror::Error;

/// Errors that can occur while building a partition scheme or routing a value.
///
/// "Cannot prune" situations are deliberately absent: an unsupported predicate
/// shape or a missing comparator degrades to the conservative full-table
/// answer instead of failing. Only corrupted partitioning metadata and
/// insert-routing failures surface here.
#[derive(Debug, Error, Clone)]
pub enum PalingError {
    /// A range entry's lower bound sorts above its upper bound
    #[error("range entry {index} has min above max")]
    UnorderedBounds {
        /// Index of the malformed entry
        index: usize,
    },

    /// Two consecutive range entries overlap
    #[error("range entries {index} and {} overlap", .index + 1)]
    OverlappingBounds {
        /// Index of the first of the two overlapping entries
        index: usize,
    },

    /// No usable three-way comparison exists for the partition key type
    #[error("partition key type {key_type:?} has no usable comparator")]
    NoComparator {
        /// The partition key type
        key_type: DataType,
    },

    /// A value could not be cast onto the partition key type
    #[error("cannot cast {value_type:?} to partition key type {target_type:?}")]
    TypeCast {
        /// Type of the value being routed
        value_type: DataType,
        /// The partition key type
        target_type: DataType,
    },

    /// The partition key type has no stable hash encoding
    #[error("partition key type {key_type:?} has no stable hash encoding")]
    Unhashable {
        /// The partition key type
        key_type: DataType,
    },
}
