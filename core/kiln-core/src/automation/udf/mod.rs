//! UDF System
//!
//! Contract enforcement around user-defined functions: setup tagging and
//! forward-call signature checks.

pub mod forward;
pub mod setup;
pub mod signature;

pub use forward::{ForwardTags, ForwardWrapper};
pub use setup::{SetupTags, SetupWrapper};
pub use signature::{Dim, ShapePattern, Signature};
