//! Partitioning metadata: key descriptor plus a hash or range layout.
//!
//! A scheme is validated once at construction and immutable afterwards, so a
//! pruning call can hold it by shared reference with no further checks.

use std::cmp::Ordering;

use arrow_schema::DataType;
use datafusion_common::ScalarValue;

use crate::{error::PalingError, ord::Comparator};

/// Collation applied to string comparison and hashing.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Collation {
    /// Byte-wise comparison.
    #[default]
    Binary,
    /// Unicode-lowercased comparison.
    CaseInsensitive,
}

/// An endpoint of a partition's key interval, possibly infinite.
#[derive(Clone, Debug, PartialEq)]
pub enum Bound {
    NegInfinite,
    Finite(ScalarValue),
    PosInfinite,
}

impl From<ScalarValue> for Bound {
    fn from(value: ScalarValue) -> Self {
        Bound::Finite(value)
    }
}

/// The key interval owned by one range partition: `min` inclusive, `max`
/// exclusive.
#[derive(Clone, Debug, PartialEq)]
pub struct RangeEntry {
    pub min: Bound,
    pub max: Bound,
}

impl RangeEntry {
    pub fn new(min: impl Into<Bound>, max: impl Into<Bound>) -> Self {
        Self {
            min: min.into(),
            max: max.into(),
        }
    }
}

/// Physical layout of the partitions.
#[derive(Clone, Debug, PartialEq)]
pub enum PartitionLayout {
    /// `partitions` buckets addressed by a stable 32-bit digest modulo.
    Hash { partitions: usize },
    /// Ordered, non-overlapping key intervals, one per partition index.
    Range { entries: Vec<RangeEntry> },
}

/// A resolved partitioning scheme for one table.
#[derive(Clone, Debug)]
pub struct PartitionScheme {
    key_column: String,
    key_type: DataType,
    collation: Collation,
    layout: PartitionLayout,
}

impl PartitionScheme {
    /// Build a hash scheme with the given bucket count.
    pub fn hash(key_column: impl Into<String>, key_type: DataType, partitions: usize) -> Self {
        Self {
            key_column: key_column.into(),
            key_type,
            collation: Collation::Binary,
            layout: PartitionLayout::Hash { partitions },
        }
    }

    /// Build a range scheme from entries sorted ascending by `min`.
    ///
    /// Finite bounds are cast onto the key type up front so later comparisons
    /// never cross types. Gaps between entries are permitted; overlaps and
    /// out-of-order bounds are metadata corruption and rejected.
    pub fn range(
        key_column: impl Into<String>,
        key_type: DataType,
        collation: Collation,
        entries: Vec<RangeEntry>,
    ) -> Result<Self, PalingError> {
        let scheme = Self {
            key_column: key_column.into(),
            key_type,
            collation,
            layout: PartitionLayout::Range { entries },
        };
        scheme.validated()
    }

    fn validated(mut self) -> Result<Self, PalingError> {
        let comparator = self.comparator();
        let PartitionLayout::Range { entries } = &mut self.layout else {
            return Ok(self);
        };

        for entry in entries.iter_mut() {
            for bound in [&mut entry.min, &mut entry.max] {
                if let Bound::Finite(value) = bound
                    && value.data_type() != *comparator.key_type()
                {
                    let cast = value.cast_to(comparator.key_type()).map_err(|_| {
                        PalingError::TypeCast {
                            value_type: value.data_type(),
                            target_type: comparator.key_type().clone(),
                        }
                    })?;
                    *bound = Bound::Finite(cast);
                }
            }
        }

        for (index, entry) in entries.iter().enumerate() {
            let cmp = comparator.cmp_bounds(&entry.min, &entry.max).ok_or_else(|| {
                PalingError::NoComparator {
                    key_type: comparator.key_type().clone(),
                }
            })?;
            if cmp == Ordering::Greater {
                return Err(PalingError::UnorderedBounds { index });
            }
        }

        for (index, pair) in entries.windows(2).enumerate() {
            let cmp = comparator
                .cmp_bounds(&pair[0].max, &pair[1].min)
                .ok_or_else(|| PalingError::NoComparator {
                    key_type: comparator.key_type().clone(),
                })?;
            if cmp == Ordering::Greater {
                return Err(PalingError::OverlappingBounds { index });
            }
        }

        Ok(self)
    }

    pub fn key_column(&self) -> &str {
        &self.key_column
    }

    pub fn key_type(&self) -> &DataType {
        &self.key_type
    }

    pub fn collation(&self) -> Collation {
        self.collation
    }

    pub fn layout(&self) -> &PartitionLayout {
        &self.layout
    }

    /// Number of partitions addressed by this scheme.
    pub fn partition_count(&self) -> usize {
        match &self.layout {
            PartitionLayout::Hash { partitions } => *partitions,
            PartitionLayout::Range { entries } => entries.len(),
        }
    }

    /// The type- and collation-aware comparator for this scheme's key.
    pub fn comparator(&self) -> Comparator {
        Comparator::new(self.key_type.clone(), self.collation)
    }
}
