pub use super::factories::SalesRecordFactory;

pub struct Factory;

impl Factory {
    pub fn sales_record() -> SalesRecordFactory {
        SalesRecordFactory::new()
    }
}
