use std::cmp::Ordering;

use crate::engine::types::SalesRecord;
use crate::shared::money::Money;

/// Orders groups by revenue descending, ties by label ascending.
pub fn rank_by_revenue(groups: &mut [(String, Money)]) {
    groups.sort_by(|(label_a, rev_a), (label_b, rev_b)| {
        rev_b.cmp(rev_a).then_with(|| label_a.cmp(label_b))
    });
}

/// Total order over records: `(order_date, order_id)` first, then every
/// remaining field in declaration order.
pub struct RecordComparator;

impl RecordComparator {
    pub fn compare(a: &SalesRecord, b: &SalesRecord) -> Ordering {
        a.order_date
            .cmp(&b.order_date)
            .then_with(|| a.order_id.cmp(&b.order_id))
            .then_with(|| a.customer_id.cmp(&b.customer_id))
            .then_with(|| a.customer_name.cmp(&b.customer_name))
            .then_with(|| a.product_id.cmp(&b.product_id))
            .then_with(|| a.product_name.cmp(&b.product_name))
            .then_with(|| a.category.cmp(&b.category))
            .then_with(|| a.quantity.cmp(&b.quantity))
            .then_with(|| a.price.cmp(&b.price))
    }
}

pub fn sort_records(records: &mut [SalesRecord]) {
    records.sort_by(RecordComparator::compare);
}
