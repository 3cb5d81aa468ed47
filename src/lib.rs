//! fieldguard - declarative per-field validation for mutable records
//!
//! Records declare rules per field; the engine resolves a validator for
//! each rule, aggregates failures per field and gates commits on validity.

pub mod config;
pub mod observability;
pub mod record;
pub mod validation;

pub use config::EngineConfig;
pub use record::{Document, ErrorCollection, FieldDescriptor, Record, RecordStatus};
pub use validation::{SaveError, ValidationEngine, ValidationError};
