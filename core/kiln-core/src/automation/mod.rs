//! Automation & Extensibility Framework
//!
//! - UDF contract enforcement (setup tags, forward signature checks)
//! - UDF registry
//! - 반복 작업 스케줄러 (정의/영속화)

pub mod callable;
pub mod registry;
pub mod scheduler;
pub mod udf;

pub use callable::{Callable, ElementType, Tensor, TensorData, Value};
pub use registry::UdfRegistry;
pub use scheduler::{
    CreateJobStatement, JobCatalogEntry, JobCreation, JobScheduler, RepeatPeriod,
};
pub use udf::{Dim, ForwardTags, ForwardWrapper, SetupTags, SetupWrapper, Signature};
