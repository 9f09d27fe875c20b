use crate::value::Value;
use std::cmp::Ordering;

/// Total canonical comparator used by grouping, sorting, and predicates.
///
/// Ordering rules:
/// 1. Canonical variant rank
/// 2. Variant-specific comparison for same-ranked values
///
/// Mixed-variant comparisons are rank-only and must remain deterministic.
#[must_use]
pub fn canonical_cmp(left: &Value, right: &Value) -> Ordering {
    let rank = left.kind().rank().cmp(&right.kind().rank());
    if rank != Ordering::Equal {
        return rank;
    }

    canonical_cmp_same_rank(left, right)
}

fn canonical_cmp_same_rank(left: &Value, right: &Value) -> Ordering {
    match (left, right) {
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::Category(a), Value::Category(b)) | (Value::Text(a), Value::Text(b)) => a.cmp(b),
        (Value::Float(a), Value::Float(b)) => a.cmp(b),
        (Value::Int(a), Value::Int(b)) => a.cmp(b),
        _ => Ordering::Equal,
    }
}

/// Numeric-aware comparator for predicate evaluation.
///
/// `Int` and `Float` compare by numeric value so that `Amount > 40` works
/// for either numeric column type. Everything else falls back to the
/// canonical order. Returns `None` when either side is missing.
#[must_use]
pub(crate) fn predicate_cmp(left: &Value, right: &Value) -> Option<Ordering> {
    if left.is_null() || right.is_null() {
        return None;
    }

    match (left.as_f64(), right.as_f64()) {
        (Some(a), Some(b)) => a.partial_cmp(&b),
        _ => Some(canonical_cmp(left, right)),
    }
}
