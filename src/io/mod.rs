//! CSV import of records and export of analytic products.

pub mod export;
pub mod import;
