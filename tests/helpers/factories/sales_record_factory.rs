use crate::engine::types::SalesRecord;
use crate::shared::money::Money;
use crate::shared::time::DateParser;
use chrono::NaiveDate;

pub struct SalesRecordFactory {
    record: SalesRecord,
}

impl SalesRecordFactory {
    pub fn new() -> Self {
        Self {
            record: SalesRecord {
                order_id: 1,
                order_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
                customer_id: 101,
                customer_name: "Alice".into(),
                product_id: 201,
                product_name: "Laptop".into(),
                category: "Electronics".into(),
                quantity: 1,
                price: Money::from_units(100),
            },
        }
    }

    pub fn order(mut self, order_id: i64) -> Self {
        self.record.order_id = order_id;
        self
    }

    pub fn date(mut self, date: &str) -> Self {
        self.record.order_date = DateParser::parse_order_date(date)
            .unwrap_or_else(|| panic!("bad fixture date {date}"));
        self
    }

    pub fn customer(mut self, customer_id: i64, name: &str) -> Self {
        self.record.customer_id = customer_id;
        self.record.customer_name = name.to_string();
        self
    }

    pub fn product(mut self, product_id: i64, name: &str) -> Self {
        self.record.product_id = product_id;
        self.record.product_name = name.to_string();
        self
    }

    pub fn category(mut self, category: &str) -> Self {
        self.record.category = category.to_string();
        self
    }

    pub fn quantity(mut self, quantity: i64) -> Self {
        self.record.quantity = quantity;
        self
    }

    pub fn price_cents(mut self, cents: i64) -> Self {
        self.record.price = Money::from_cents(cents);
        self
    }

    pub fn price(mut self, units: f64) -> Self {
        self.record.price =
            Money::from_price(units).unwrap_or_else(|| panic!("{units} is not a whole-cent price"));
        self
    }

    pub fn create(self) -> SalesRecord {
        self.record
    }

    /// `count` line items with consecutive order ids starting at the configured one.
    pub fn create_list(self, count: usize) -> Vec<SalesRecord> {
        (0..count as i64)
            .map(|i| SalesRecord {
                order_id: self.record.order_id + i,
                ..self.record.clone()
            })
            .collect()
    }
}
