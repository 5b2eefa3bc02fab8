//! Resolved soft-delete options
//!
//! Raw configuration is parsed permissively; this module turns it into the
//! immutable values a schema keeps after augmentation.

use crate::operations::BaseOperation;
use crate::visibility::{DELETED_AT_FIELD, DELETED_FIELD};
use config::SoftDeleteConfig;

/// Which marker fields get a secondary index
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexFields {
    pub deleted: bool,
    pub deleted_at: bool,
}

impl IndexFields {
    pub fn all() -> Self {
        Self {
            deleted: true,
            deleted_at: true,
        }
    }
}

/// Options resolved once per schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoftDeleteOptions {
    pub index_fields: IndexFields,
    pub override_methods: Vec<BaseOperation>,
    pub use_ne_operator: bool,
    pub validate_before_delete: bool,
}

impl Default for SoftDeleteOptions {
    fn default() -> Self {
        Self {
            index_fields: IndexFields::default(),
            override_methods: Vec::new(),
            use_ne_operator: true,
            validate_before_delete: true,
        }
    }
}

impl SoftDeleteOptions {
    /// Resolve raw configuration; unrecognized names and shapes are ignored
    pub fn resolve(config: &SoftDeleteConfig) -> Self {
        let index_fields = IndexFields {
            deleted: config.index_fields.contains(DELETED_FIELD),
            deleted_at: config.index_fields.contains(DELETED_AT_FIELD),
        };

        let override_methods: Vec<BaseOperation> = config
            .override_methods
            .resolve(&BaseOperation::names())
            .into_iter()
            .filter_map(BaseOperation::from_name)
            .collect();

        if let config::Selection::List(names) = &config.override_methods {
            for name in names {
                if BaseOperation::from_name(name).is_none() {
                    crate::debug_log!("ignoring unknown override method '{}'", name);
                }
            }
        }

        Self {
            index_fields,
            override_methods,
            use_ne_operator: config.use_ne_operator(),
            validate_before_delete: config.validate_before_delete(),
        }
    }

    /// Every supported operation overridden, indexes on both markers
    pub fn all() -> Self {
        Self {
            index_fields: IndexFields::all(),
            override_methods: BaseOperation::ALL.to_vec(),
            ..Self::default()
        }
    }

    pub fn with_override_methods(
        mut self,
        operations: impl IntoIterator<Item = BaseOperation>,
    ) -> Self {
        self.override_methods = operations.into_iter().collect();
        self
    }

    pub fn with_index_fields(mut self, index_fields: IndexFields) -> Self {
        self.index_fields = index_fields;
        self
    }

    pub fn with_use_ne_operator(mut self, value: bool) -> Self {
        self.use_ne_operator = value;
        self
    }

    pub fn with_validate_before_delete(mut self, value: bool) -> Self {
        self.validate_before_delete = value;
        self
    }
}

impl From<&SoftDeleteConfig> for SoftDeleteOptions {
    fn from(config: &SoftDeleteConfig) -> Self {
        Self::resolve(config)
    }
}
