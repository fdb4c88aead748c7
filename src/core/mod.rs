/// Core Module for Flashbind
///
/// Shared vocabulary for the binding engine: the error type, dynamic values
/// and the member descriptors every bindable type exposes.

pub mod error;
pub mod record;
pub mod value;

// Re-export commonly used types for convenience
pub use error::{FlashError, Result};
pub use record::{Describe, Descriptor, Member, Record};
pub use value::{FromValue, Value, ValueType};
