//! Transport-agnostic application core.

pub mod conversion;
pub mod email;
mod error;
pub mod format;
pub mod ports;
pub mod signup;
pub mod usage_gate;

pub use conversion::{Artifact, ConversionError, ConversionService};
pub use email::{EmailRecord, NewEmailRecord};
pub use error::{Error, ErrorCode};
pub use format::OutputFormat;
pub use signup::SignupService;
pub use usage_gate::{Decision, UsageGate};
