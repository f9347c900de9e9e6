//! Rangeset ⇄ roaring bitmap conversion.
//!
//! The bitmap flattens certainty away: it answers only "is this partition a
//! candidate", which is what planners caching or shipping candidate sets
//! need. Keep the rangeset when the lossy/complete distinction matters.

use roaring::RoaringBitmap;

use crate::rangeset::{Certainty, IndexRange};

/// Convert a rangeset to a RoaringBitmap of candidate partition indexes.
///
/// Returns `None` if any index exceeds `u32::MAX` (a RoaringBitmap
/// limitation; no realistic scheme has that many partitions).
///
/// # Examples
///
/// ```
/// use paling::{Certainty, IndexRange, rangeset_to_roaring};
///
/// let ranges = vec![
///     IndexRange::new(0, 1, Certainty::Complete),
///     IndexRange::new(4, 5, Certainty::Lossy),
/// ];
/// let bitmap = rangeset_to_roaring(&ranges).unwrap();
/// assert_eq!(bitmap.iter().collect::<Vec<_>>(), vec![0, 1, 4, 5]);
/// ```
pub fn rangeset_to_roaring(ranges: &[IndexRange]) -> Option<RoaringBitmap> {
    let mut bitmap = RoaringBitmap::new();
    for range in ranges {
        if range.end > u32::MAX as usize {
            return None;
        }
        bitmap.insert_range(range.start as u32..=range.end as u32);
    }
    Some(bitmap)
}

/// Reconstruct a rangeset from a bitmap, tagging every run with the given
/// certainty.
///
/// The certainty distinction cannot be recovered from a bitmap, so callers
/// pass the conservative tag for their use; runs of consecutive indexes
/// coalesce into single ranges.
///
/// # Examples
///
/// ```
/// use paling::{Certainty, IndexRange, roaring_to_rangeset};
/// use roaring::RoaringBitmap;
///
/// let mut bitmap = RoaringBitmap::new();
/// bitmap.insert_range(2..5);
/// bitmap.insert(9);
///
/// let ranges = roaring_to_rangeset(&bitmap, Certainty::Lossy);
/// assert_eq!(ranges, vec![
///     IndexRange::new(2, 4, Certainty::Lossy),
///     IndexRange::new(9, 9, Certainty::Lossy),
/// ]);
/// ```
pub fn roaring_to_rangeset(bitmap: &RoaringBitmap, certainty: Certainty) -> Vec<IndexRange> {
    let mut ranges: Vec<IndexRange> = Vec::new();
    for index in bitmap {
        let index = index as usize;
        match ranges.last_mut() {
            Some(last) if last.end + 1 == index => last.end = index,
            _ => ranges.push(IndexRange::new(index, index, certainty)),
        }
    }
    ranges
}
