use crate::engine::errors::StoreError;
use crate::engine::query::aggregate::ops::{DistinctOrders, GroupedRevenue, RevenueSum};
use crate::shared::money::Money;

fn cents(c: i64) -> Option<Money> {
    Some(Money::from_cents(c))
}

#[test]
fn revenue_sum_accumulates_and_merges() {
    let mut left = RevenueSum::new();
    left.update(cents(1_000));
    left.update(cents(250));

    let mut right = RevenueSum::new();
    right.update(cents(5));

    left.merge(right);
    assert_eq!(left.finalize().unwrap(), Money::from_cents(1_255));
}

#[test]
fn revenue_sum_reports_overflow() {
    let mut sum = RevenueSum::new();
    sum.update(cents(i64::MAX));
    sum.update(cents(1));
    assert!(matches!(sum.finalize(), Err(StoreError::RevenueOverflow)));

    let mut line = RevenueSum::new();
    line.update(cents(10));
    line.update(None);
    assert!(matches!(line.finalize(), Err(StoreError::RevenueOverflow)));
}

#[test]
fn revenue_sum_tolerates_intermediate_excursions() {
    let mut sum = RevenueSum::new();
    sum.update(cents(i64::MAX));
    sum.update(cents(10));
    sum.update(cents(-20));
    assert_eq!(sum.finalize().unwrap(), Money::from_cents(i64::MAX - 10));
}

#[test]
fn distinct_orders_counts_each_order_once() {
    let mut left = DistinctOrders::new();
    for id in [1, 1, 2, 3] {
        left.update(id);
    }
    let mut right = DistinctOrders::new();
    for id in [3, 4] {
        right.update(id);
    }
    left.merge(right);
    assert_eq!(left.finalize(), 4);
}

#[test]
fn grouped_revenue_merges_matching_keys() {
    let mut left = GroupedRevenue::new();
    left.update("a", cents(100));
    left.update("b", cents(50));

    let mut right = GroupedRevenue::new();
    right.update("a", cents(10));
    right.update("c", cents(1));

    left.merge(right);
    assert_eq!(left.len(), 3);

    let mut groups = left.finalize().unwrap();
    groups.sort();
    assert_eq!(
        groups,
        vec![
            ("a", Money::from_cents(110)),
            ("b", Money::from_cents(50)),
            ("c", Money::from_cents(1)),
        ]
    );
}

#[test]
fn empty_group_finalizes_to_nothing() {
    let groups = GroupedRevenue::<u32>::new();
    assert!(groups.is_empty());
    assert!(groups.finalize().unwrap().is_empty());
}

#[test]
fn grouped_revenue_reports_overflow_in_any_group() {
    let mut left = GroupedRevenue::new();
    left.update("a", cents(i64::MAX));
    left.update("b", cents(1));
    let mut right = GroupedRevenue::new();
    right.update("a", cents(i64::MAX));
    left.merge(right);
    assert!(matches!(left.finalize(), Err(StoreError::RevenueOverflow)));

    let mut line = GroupedRevenue::new();
    line.update("a", None);
    assert!(matches!(line.finalize(), Err(StoreError::RevenueOverflow)));
}
