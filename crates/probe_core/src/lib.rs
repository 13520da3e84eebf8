//! Backend-independent domain logic for the batch-probe harness.
//!
//! This crate hosts:
//! - the shape/coefficient argument record shared between the CLI and drivers
//! - buffer layout and batch address arithmetic for strided-batched operands
//! - deterministic input generation and output-pattern fills
//! - argument validation cascades
//! - the unit/norm comparator used to certify device results

pub mod args;
pub mod compare;
pub mod datagen;
pub mod layout;
pub mod real;
pub mod status;
pub mod validate;

pub use args::{Binding, OperationArguments};
pub use compare::{CheckMode, ComparisonResult, Mismatch};
pub use layout::{BufferLayout, FillMode};
pub use real::Real;
pub use status::{KernelStatus, ProbeError};
