//! End-to-end pruning over range and hash schemes.

use arrow_schema::DataType;
use datafusion_common::ScalarValue;
use paling::{
    Certainty, CmpOp, Collation, Expr, IndexRange, PartitionScheme, PruneOptions, PruneRequest,
    RangeEntry, intersection,
};

fn int64(v: i64) -> ScalarValue {
    ScalarValue::Int64(Some(v))
}

/// Four partitions over [0,10), [10,20), [20,30), [30,40).
fn range_scheme() -> PartitionScheme {
    PartitionScheme::range(
        "k",
        DataType::Int64,
        Collation::Binary,
        vec![
            RangeEntry::new(int64(0), int64(10)),
            RangeEntry::new(int64(10), int64(20)),
            RangeEntry::new(int64(20), int64(30)),
            RangeEntry::new(int64(30), int64(40)),
        ],
    )
    .unwrap()
}

fn complete(start: usize, end: usize) -> IndexRange {
    IndexRange::new(start, end, Certainty::Complete)
}

fn lossy(start: usize, end: usize) -> IndexRange {
    IndexRange::new(start, end, Certainty::Lossy)
}

#[test]
fn equality_selects_one_lossy_partition() {
    let scheme = range_scheme();
    let expr = Expr::eq("k", int64(15));
    let result = PruneRequest::new(&scheme).with_predicate(&expr).prune().unwrap();

    assert_eq!(result.rangeset(), &[lossy(1, 1)]);
    assert_eq!(result.partitions(), vec![1]);
    assert_eq!(result.certainty_of(1), Some(Certainty::Lossy));
    assert_eq!(result.certainty_of(0), None);
    assert_eq!(result.selectivity(), 0.25);
    assert!(!result.found_gap());
}

#[test]
fn gt_eq_mid_partition_keeps_edge_lossy() {
    let scheme = range_scheme();
    let expr = Expr::gt_eq("k", int64(25));
    let result = PruneRequest::new(&scheme).with_predicate(&expr).prune().unwrap();

    assert_eq!(result.rangeset(), &[lossy(2, 2), complete(3, 3)]);
    assert_eq!(result.partitions(), vec![2, 3]);
}

#[test]
fn gt_eq_on_boundary_is_fully_complete() {
    let scheme = range_scheme();
    let expr = Expr::gt_eq("k", int64(20));
    let result = PruneRequest::new(&scheme).with_predicate(&expr).prune().unwrap();

    assert_eq!(result.rangeset(), &[complete(2, 3)]);
}

#[test]
fn disjunction_of_edges() {
    let scheme = range_scheme();
    let expr = Expr::or(vec![
        Expr::lt("k", int64(5)),
        Expr::gt_eq("k", int64(35)),
    ]);
    let result = PruneRequest::new(&scheme).with_predicate(&expr).prune().unwrap();

    assert_eq!(result.rangeset(), &[lossy(0, 0), lossy(3, 3)]);
    assert_eq!(result.partitions(), vec![0, 3]);
}

#[test]
fn equality_beyond_bounds_reports_gap() {
    let scheme = range_scheme();
    let expr = Expr::eq("k", int64(50));
    let result = PruneRequest::new(&scheme).with_predicate(&expr).prune().unwrap();

    assert!(result.rangeset().is_empty());
    assert!(result.partitions().is_empty());
    assert!(result.found_gap());
}

#[test]
fn conjunction_intersects_children() {
    let scheme = range_scheme();
    let p = Expr::gt_eq("k", int64(15));
    let q = Expr::lt("k", int64(25));
    let and = Expr::and(vec![p.clone(), q.clone()]);

    let result = PruneRequest::new(&scheme).with_predicate(&and).prune().unwrap();
    assert_eq!(result.rangeset(), &[lossy(1, 2)]);

    // AND/OR duality: the boolean node is exactly the algebra of its parts.
    let rp = PruneRequest::new(&scheme).with_predicate(&p).prune().unwrap();
    let rq = PruneRequest::new(&scheme).with_predicate(&q).prune().unwrap();
    assert_eq!(
        result.rangeset(),
        intersection(rp.rangeset(), rq.rangeset()).as_slice()
    );
}

#[test]
fn in_list_is_a_union_of_equalities() {
    let scheme = range_scheme();
    let expr = Expr::in_list("k", vec![int64(5), int64(15), int64(35)]);
    let result = PruneRequest::new(&scheme).with_predicate(&expr).prune().unwrap();

    assert_eq!(result.rangeset(), &[lossy(0, 1), lossy(3, 3)]);
    assert_eq!(result.selectivity(), 0.25);
}

#[test]
fn unsupported_shapes_keep_every_partition_lossy() {
    let scheme = range_scheme();
    for expr in [
        Expr::unsupported("k + 1 = 3"),
        Expr::not(Expr::eq("k", int64(1))),
        Expr::not_eq("k", int64(1)),
        Expr::eq("unrelated", int64(1)),
        Expr::cmp_param("k", CmpOp::Gt),
        Expr::in_list_param("k"),
    ] {
        let result = PruneRequest::new(&scheme).with_predicate(&expr).prune().unwrap();
        assert_eq!(result.rangeset(), &[lossy(0, 3)], "{expr}");
    }
}

#[test]
fn no_predicate_keeps_every_partition_complete() {
    let scheme = range_scheme();
    let result = PruneRequest::new(&scheme).prune().unwrap();
    assert_eq!(result.rangeset(), &[complete(0, 3)]);
    assert_eq!(result.selectivity(), 1.0);
}

#[test]
fn hash_equality_and_inequality() {
    let scheme = PartitionScheme::hash("k", DataType::Utf8, 8);
    let eq = Expr::eq("k", ScalarValue::Utf8(Some("x".to_string())));
    let result = PruneRequest::new(&scheme).with_predicate(&eq).prune().unwrap();

    assert_eq!(result.partitions().len(), 1);
    let bucket = result.partitions()[0];
    assert!(bucket < 8);
    assert_eq!(result.certainty_of(bucket), Some(Certainty::Lossy));
    assert_eq!(result.selectivity(), 0.125);

    // Same value, same bucket, every time.
    let again = PruneRequest::new(&scheme).with_predicate(&eq).prune().unwrap();
    assert_eq!(again.partitions(), result.partitions());

    let gt = Expr::gt("k", ScalarValue::Utf8(Some("x".to_string())));
    let result = PruneRequest::new(&scheme).with_predicate(&gt).prune().unwrap();
    assert_eq!(result.rangeset(), &[lossy(0, 7)]);
    assert_eq!(result.selectivity(), 1.0);
}

#[test]
fn hash_in_list_unions_buckets() {
    let scheme = PartitionScheme::hash("k", DataType::Int64, 8);
    let expr = Expr::in_list("k", vec![int64(1), int64(2), int64(3)]);
    let result = PruneRequest::new(&scheme).with_predicate(&expr).prune().unwrap();

    assert!(!result.partitions().is_empty());
    assert!(result.partitions().len() <= 3);
    for range in result.rangeset() {
        assert!(range.is_lossy());
    }
}

#[test]
fn literal_casts_onto_the_key_type() {
    let scheme = range_scheme();
    let expr = Expr::eq("k", ScalarValue::Int32(Some(15)));
    let result = PruneRequest::new(&scheme).with_predicate(&expr).prune().unwrap();
    assert_eq!(result.partitions(), vec![1]);
}

#[test]
fn uncastable_literal_degrades() {
    let scheme = range_scheme();
    let expr = Expr::eq("k", ScalarValue::Utf8(Some("not a number".to_string())));
    let result = PruneRequest::new(&scheme).with_predicate(&expr).prune().unwrap();
    assert_eq!(result.rangeset(), &[lossy(0, 3)]);
}

#[test]
fn roaring_output_covers_candidates() {
    let scheme = range_scheme();
    let expr = Expr::or(vec![Expr::eq("k", int64(5)), Expr::eq("k", int64(35))]);
    let result = PruneRequest::new(&scheme)
        .with_predicate(&expr)
        .emit_roaring(true)
        .prune()
        .unwrap();

    let bitmap = result.roaring().unwrap();
    assert_eq!(bitmap.iter().collect::<Vec<_>>(), vec![0, 3]);

    // Off by default.
    let result = PruneRequest::new(&scheme).with_predicate(&expr).prune().unwrap();
    assert!(result.roaring().is_none());
}

#[test]
fn lt_eq_on_a_boundary_rolls_into_the_next_partition() {
    let scheme = range_scheme();
    let expr = Expr::lt_eq("k", int64(20));
    let result = PruneRequest::new(&scheme).with_predicate(&expr).prune().unwrap();

    // 20 itself lives in [20, 30), so that partition joins lossily.
    assert_eq!(result.rangeset(), &[complete(0, 1), lossy(2, 2)]);
}

#[test]
fn prebuilt_options_apply_wholesale() {
    let scheme = range_scheme();
    let options = PruneOptions::builder().emit_roaring(true).build();
    let expr = Expr::eq("k", int64(5));
    let result = PruneRequest::new(&scheme)
        .with_predicate(&expr)
        .with_options(&options)
        .prune()
        .unwrap();

    assert!(result.roaring().is_some());
}

#[test]
fn case_insensitive_range_collation() {
    let scheme = PartitionScheme::range(
        "name",
        DataType::Utf8,
        Collation::CaseInsensitive,
        vec![
            RangeEntry::new(
                ScalarValue::Utf8(Some("a".to_string())),
                ScalarValue::Utf8(Some("m".to_string())),
            ),
            RangeEntry::new(
                ScalarValue::Utf8(Some("m".to_string())),
                ScalarValue::Utf8(Some("z".to_string())),
            ),
        ],
    )
    .unwrap();

    // "Q" folds below "z" and above "m" despite its byte value.
    let expr = Expr::eq("name", ScalarValue::Utf8(Some("Q".to_string())));
    let result = PruneRequest::new(&scheme).with_predicate(&expr).prune().unwrap();
    assert_eq!(result.partitions(), vec![1]);
}
