//! Type- and collation-aware three-way comparison over key values and bounds.

use std::cmp::Ordering;

use arrow_schema::DataType;
use datafusion_common::ScalarValue;

use crate::scheme::{Bound, Collation};

/// Three-way comparator for one partition key.
///
/// Comparison returns `None` when the pair cannot be ordered (null values,
/// or a literal that does not cast onto the key type); callers treat that as
/// "cannot prune" and fall back to the conservative full range.
#[derive(Clone, Debug)]
pub struct Comparator {
    key_type: DataType,
    collation: Collation,
}

impl Comparator {
    pub fn new(key_type: DataType, collation: Collation) -> Self {
        Self { key_type, collation }
    }

    pub fn key_type(&self) -> &DataType {
        &self.key_type
    }

    /// Cast a literal onto the key type.
    pub fn cast(&self, value: &ScalarValue) -> Option<ScalarValue> {
        if value.data_type() == self.key_type {
            return Some(value.clone());
        }
        value.cast_to(&self.key_type).ok()
    }

    /// Compare two finite key values under this key's collation.
    pub fn compare(&self, a: &ScalarValue, b: &ScalarValue) -> Option<Ordering> {
        if a.is_null() || b.is_null() {
            return None;
        }
        if self.collation == Collation::CaseInsensitive
            && let (Some(a), Some(b)) = (as_str(a), as_str(b))
        {
            return Some(a.to_lowercase().cmp(&b.to_lowercase()));
        }
        a.partial_cmp(b)
    }

    /// Compare two bounds, infinities extremal.
    pub fn cmp_bounds(&self, a: &Bound, b: &Bound) -> Option<Ordering> {
        match (a, b) {
            (Bound::NegInfinite, Bound::NegInfinite) => Some(Ordering::Equal),
            (Bound::PosInfinite, Bound::PosInfinite) => Some(Ordering::Equal),
            (Bound::NegInfinite, _) | (_, Bound::PosInfinite) => Some(Ordering::Less),
            (Bound::PosInfinite, _) | (_, Bound::NegInfinite) => Some(Ordering::Greater),
            (Bound::Finite(a), Bound::Finite(b)) => self.compare(a, b),
        }
    }

    /// Compare a finite key value against a bound.
    pub fn cmp_value_to_bound(&self, value: &ScalarValue, bound: &Bound) -> Option<Ordering> {
        match bound {
            Bound::NegInfinite => Some(Ordering::Greater),
            Bound::PosInfinite => Some(Ordering::Less),
            Bound::Finite(b) => self.compare(value, b),
        }
    }
}

fn as_str(value: &ScalarValue) -> Option<&str> {
    match value {
        ScalarValue::Utf8(Some(s))
        | ScalarValue::LargeUtf8(Some(s))
        | ScalarValue::Utf8View(Some(s)) => Some(s.as_str()),
        _ => None,
    }
}
