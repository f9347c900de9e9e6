//! Stable hash-to-bucket mapping for hash-partitioned tables.
//!
//! Routing must survive process restarts, so the digest is a crc32 of a
//! canonical little-endian byte encoding rather than anything derived from
//! `std::hash`. The version tag is folded into the digest: bumping it remaps
//! every row, which is exactly the visibility we want if the encoding ever
//! changes.

use datafusion_common::ScalarValue;

use crate::scheme::Collation;

/// Version tag mixed into every digest.
pub(crate) const HASH_VERSION: u32 = 1;

/// Stable 32-bit digest of a key value, or `None` for types without a
/// canonical encoding.
pub(crate) fn digest(value: &ScalarValue, collation: Collation) -> Option<u32> {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(&HASH_VERSION.to_le_bytes());
    update_with_value(&mut hasher, value, collation)?;
    Some(hasher.finalize())
}

/// Map a digest onto a bucket index. `partitions` must be non-zero.
pub(crate) fn bucket(digest: u32, partitions: usize) -> usize {
    (digest as u64 % partitions as u64) as usize
}

fn update_with_value(
    hasher: &mut crc32fast::Hasher,
    value: &ScalarValue,
    collation: Collation,
) -> Option<()> {
    match value {
        ScalarValue::Boolean(Some(v)) => hasher.update(&[*v as u8]),
        ScalarValue::Int8(Some(v)) => hasher.update(&(*v as i64).to_le_bytes()),
        ScalarValue::Int16(Some(v)) => hasher.update(&(*v as i64).to_le_bytes()),
        ScalarValue::Int32(Some(v)) => hasher.update(&(*v as i64).to_le_bytes()),
        ScalarValue::Int64(Some(v)) => hasher.update(&v.to_le_bytes()),
        ScalarValue::UInt8(Some(v)) => hasher.update(&(*v as u64).to_le_bytes()),
        ScalarValue::UInt16(Some(v)) => hasher.update(&(*v as u64).to_le_bytes()),
        ScalarValue::UInt32(Some(v)) => hasher.update(&(*v as u64).to_le_bytes()),
        ScalarValue::UInt64(Some(v)) => hasher.update(&v.to_le_bytes()),
        ScalarValue::Float32(Some(v)) => hasher.update(&(*v as f64).to_bits().to_le_bytes()),
        ScalarValue::Float64(Some(v)) => hasher.update(&v.to_bits().to_le_bytes()),
        ScalarValue::Utf8(Some(s))
        | ScalarValue::LargeUtf8(Some(s))
        | ScalarValue::Utf8View(Some(s)) => match collation {
            Collation::Binary => hasher.update(s.as_bytes()),
            Collation::CaseInsensitive => hasher.update(s.to_lowercase().as_bytes()),
        },
        ScalarValue::Binary(Some(b))
        | ScalarValue::LargeBinary(Some(b))
        | ScalarValue::BinaryView(Some(b)) => hasher.update(b),
        ScalarValue::Date32(Some(v)) => hasher.update(&(*v as i64).to_le_bytes()),
        ScalarValue::Date64(Some(v)) => hasher.update(&v.to_le_bytes()),
        ScalarValue::Time32Second(Some(v)) | ScalarValue::Time32Millisecond(Some(v)) => {
            hasher.update(&(*v as i64).to_le_bytes())
        }
        ScalarValue::Time64Microsecond(Some(v)) | ScalarValue::Time64Nanosecond(Some(v)) => {
            hasher.update(&v.to_le_bytes())
        }
        ScalarValue::TimestampSecond(Some(v), _)
        | ScalarValue::TimestampMillisecond(Some(v), _)
        | ScalarValue::TimestampMicrosecond(Some(v), _)
        | ScalarValue::TimestampNanosecond(Some(v), _) => hasher.update(&v.to_le_bytes()),
        _ => return None,
    }
    Some(())
}
