//! Physical Operators Module

mod create_job;
mod insert;
mod physical_operator;
mod table_scan;
mod values;

pub use create_job::CreateJobOperator;
pub use insert::InsertOperator;
pub use physical_operator::PhysicalOperator;
pub use table_scan::TableScanOperator;
pub use values::ValuesOperator;
