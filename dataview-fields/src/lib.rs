//! Field schema and record model
//!
//! `dataview-fields` is the leaf crate of the data view engine. It describes
//! what a record's attributes are and what a view may do with them; it knows
//! nothing about view state, queries or layouts.
//!
//! # Architecture
//!
//! - **Schema-only**: owns field configuration, not field values
//! - **Caller-supplied**: configs arrive fresh on each evaluation, nothing is cached
//! - **Typed coercion**: record values are untyped JSON; the field type decides
//!   how they compare, sort and display

pub mod error;
mod format;
pub mod operator;
pub mod record;
pub mod schema;
pub mod types;
mod validation;
pub mod value;

pub use error::{FieldsError, Result};
pub use operator::{Capability, FilterOperator};
pub use record::Record;
pub use schema::FieldSchema;
pub use types::{
    FieldConfig, FieldFormat, FieldSecurity, FieldType, SelectOption, ValidationRules,
};
pub use value::SortKey;
