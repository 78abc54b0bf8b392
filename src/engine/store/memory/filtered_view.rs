use chrono::NaiveDate;
use rayon::prelude::*;

use crate::engine::errors::StoreResult;
use crate::engine::query::aggregate::ops::{DistinctOrders, GroupedRevenue, RevenueSum};
use crate::engine::store::memory::columnar::{ColumnarTable, Dictionary};
use crate::engine::store::{Totals, ViewSource};
use crate::engine::types::SalesRecord;
use crate::shared::money::Money;

/// Row count above which reductions fan out over rayon.
const PARALLEL_CHUNK: usize = 16 * 1024;

/// Row indices of a [`ColumnarTable`] selected by a query filter.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    table: &'a ColumnarTable,
    rows: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    pub fn new(table: &'a ColumnarTable, rows: Vec<usize>) -> Self {
        Self { table, rows }
    }

    pub fn empty(table: &'a ColumnarTable) -> Self {
        Self::new(table, Vec::new())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    /// Folds the selected rows, chunked across threads for large views.
    ///
    /// Every accumulator merges associatively over wide integer cents, so
    /// the result, overflow included, does not depend on how rows were chunked.
    fn reduce<A, I, U, M>(&self, init: I, update: U, merge: M) -> A
    where
        A: Send,
        I: Fn() -> A + Sync + Send,
        U: Fn(&mut A, usize) + Sync + Send,
        M: Fn(A, A) -> A + Sync + Send,
    {
        if self.rows.len() <= PARALLEL_CHUNK {
            let mut acc = init();
            for &row in &self.rows {
                update(&mut acc, row);
            }
            return acc;
        }
        self.rows
            .par_chunks(PARALLEL_CHUNK)
            .map(|chunk| {
                let mut acc = init();
                for &row in chunk {
                    update(&mut acc, row);
                }
                acc
            })
            .reduce(&init, &merge)
    }

    fn grouped_by_code(
        &self,
        codes: &[u32],
        dictionary: &Dictionary,
    ) -> StoreResult<Vec<(String, Money)>> {
        let groups = self.reduce(
            GroupedRevenue::<u32>::new,
            |acc: &mut GroupedRevenue<u32>, row| acc.update(codes[row], self.table.revenue(row)),
            |mut a, b| {
                a.merge(b);
                a
            },
        );
        Ok(groups
            .finalize()?
            .into_iter()
            .map(|(code, revenue)| (dictionary.value(code).to_string(), revenue))
            .collect())
    }
}

impl ViewSource for FilteredView<'_> {
    fn totals(&self) -> StoreResult<Totals> {
        let orders = self.table.order_ids();
        let (revenue, distinct) = self.reduce(
            || (RevenueSum::new(), DistinctOrders::new()),
            |acc: &mut (RevenueSum, DistinctOrders), row| {
                acc.0.update(self.table.revenue(row));
                acc.1.update(orders[row]);
            },
            |(mut sum_a, mut ids_a), (sum_b, ids_b)| {
                sum_a.merge(sum_b);
                ids_a.merge(ids_b);
                (sum_a, ids_a)
            },
        );
        Ok(Totals {
            revenue: revenue.finalize()?,
            orders: distinct.finalize(),
        })
    }

    fn revenue_by_date(&self) -> StoreResult<Vec<(NaiveDate, Money)>> {
        let dates = self.table.order_dates();
        let groups = self.reduce(
            GroupedRevenue::<NaiveDate>::new,
            |acc: &mut GroupedRevenue<NaiveDate>, row| {
                acc.update(dates[row], self.table.revenue(row))
            },
            |mut a, b| {
                a.merge(b);
                a
            },
        );
        groups.finalize()
    }

    fn revenue_by_category(&self) -> StoreResult<Vec<(String, Money)>> {
        self.grouped_by_code(self.table.category_codes(), self.table.categories())
    }

    fn revenue_by_product(&self) -> StoreResult<Vec<(String, Money)>> {
        self.grouped_by_code(self.table.product_codes(), self.table.products())
    }

    fn records(&self) -> StoreResult<Vec<SalesRecord>> {
        Ok(self.rows.iter().map(|&row| self.table.record(row)).collect())
    }
}
