pub mod sales_record_factory;

pub use sales_record_factory::SalesRecordFactory;
