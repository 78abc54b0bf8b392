use ahash::RandomState as AHashRandomState;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use crate::engine::errors::{StoreError, StoreResult};
use crate::shared::money::Money;

/// Narrows a wide total back to cents.
fn to_money(total: i128) -> StoreResult<Money> {
    i64::try_from(total)
        .map(Money::from_cents)
        .map_err(|_| StoreError::RevenueOverflow)
}

/// Running revenue total.
///
/// Sums in 128 bits so the result does not depend on chunking, and fails at
/// `finalize` when the total leaves the `i64` cents range. `None` line
/// revenues are lines whose own product already overflowed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RevenueSum {
    total: i128,
    overflowed: bool,
}

impl RevenueSum {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, revenue: Option<Money>) {
        match revenue {
            Some(revenue) => self.total += i128::from(revenue.cents()),
            None => self.overflowed = true,
        }
    }

    pub fn merge(&mut self, other: RevenueSum) {
        self.total += other.total;
        self.overflowed |= other.overflowed;
    }

    pub fn finalize(&self) -> StoreResult<Money> {
        if self.overflowed {
            return Err(StoreError::RevenueOverflow);
        }
        to_money(self.total)
    }
}

/// Count of distinct order ids; line items of one order count once.
#[derive(Debug, Clone, Default)]
pub struct DistinctOrders {
    seen: HashSet<i64, AHashRandomState>,
}

impl DistinctOrders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, order_id: i64) {
        self.seen.insert(order_id);
    }

    pub fn merge(&mut self, other: DistinctOrders) {
        self.seen.extend(other.seen);
    }

    pub fn finalize(&self) -> u64 {
        self.seen.len() as u64
    }
}

/// Revenue summed per group key, in no particular order.
///
/// Overflow follows [`RevenueSum`]: any group outside the cents range fails
/// the whole finalize.
#[derive(Debug, Clone)]
pub struct GroupedRevenue<K: Eq + Hash> {
    groups: HashMap<K, i128, AHashRandomState>,
    overflowed: bool,
}

impl<K: Eq + Hash> Default for GroupedRevenue<K> {
    fn default() -> Self {
        Self {
            groups: HashMap::with_hasher(AHashRandomState::new()),
            overflowed: false,
        }
    }
}

impl<K: Eq + Hash> GroupedRevenue<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, key: K, revenue: Option<Money>) {
        match revenue {
            Some(revenue) => *self.groups.entry(key).or_default() += i128::from(revenue.cents()),
            None => self.overflowed = true,
        }
    }

    pub fn merge(&mut self, other: GroupedRevenue<K>) {
        self.overflowed |= other.overflowed;
        for (key, total) in other.groups {
            *self.groups.entry(key).or_default() += total;
        }
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn finalize(self) -> StoreResult<Vec<(K, Money)>> {
        if self.overflowed {
            return Err(StoreError::RevenueOverflow);
        }
        self.groups
            .into_iter()
            .map(|(key, total)| Ok((key, to_money(total)?)))
            .collect()
    }
}
