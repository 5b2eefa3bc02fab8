//! Schema definitions, validation and soft-delete augmentation

pub mod definition;
pub mod plugin;
pub mod validation;

pub use definition::{FieldDef, Schema};
pub use plugin::{augment, AugmentedSchema};
pub use validation::ValidationError;
