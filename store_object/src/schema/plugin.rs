//! Schema augmentation
//!
//! Adds the deletion marker fields to a schema and collects the hooks and
//! operation registry that a soft-delete model runs with.

use crate::operations::OperationRegistry;
use crate::options::SoftDeleteOptions;
use crate::schema::definition::{FieldDef, Schema};
use crate::visibility::{apply_aggregate_visibility, DELETED_AT_FIELD, DELETED_FIELD};
use hook_system::{HookManager, HookManagerBuilder};
use serde_json::Value;
use type_mapping::FieldType;

/// A schema with soft-delete support applied
#[derive(Debug, Clone)]
pub struct AugmentedSchema {
    pub schema: Schema,
    pub registry: OperationRegistry,
    pub hooks: HookManager,
}

/// Add `deleted` and `deleted_at` to `schema` and build the model's hooks
pub fn augment(mut schema: Schema, options: &SoftDeleteOptions) -> AugmentedSchema {
    schema.add(
        FieldDef::new(DELETED_FIELD, FieldType::Id)
            .default_value(Value::Null)
            .indexed(options.index_fields.deleted),
    );
    schema.add(
        FieldDef::new(DELETED_AT_FIELD, FieldType::Date)
            .default_value(Value::Null)
            .indexed(options.index_fields.deleted_at),
    );

    let registry = OperationRegistry::new(options.override_methods.iter().copied());

    // the hook receives the document being saved, never captured state
    let mut hooks = HookManagerBuilder::new().before_save(|_, document| {
        for marker in [DELETED_FIELD, DELETED_AT_FIELD] {
            document.entry(marker.to_string()).or_insert(Value::Null);
        }
        Ok(())
    });

    if registry.installs_aggregate_hook() {
        hooks = hooks.before_aggregate(|context, pipeline| {
            let action = apply_aggregate_visibility(pipeline);
            tracing::trace!(
                collection = %context.collection,
                ?action,
                "aggregate visibility applied"
            );
            Ok(())
        });
    }

    crate::debug_log!(
        "augmented schema: {} overridden operations, indexes {:?}",
        registry.overridden().len(),
        options.index_fields
    );

    AugmentedSchema {
        schema,
        registry,
        hooks: hooks.build(),
    }
}
