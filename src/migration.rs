//! Index migration
//!
//! Creates the store indexes a schema asks for. Creating an index that
//! already exists is a no-op for the store, so syncing is repeatable.

use crate::core::SoftHaus;
use crate::errors::SoftHausError;
use store_object::{DocumentStore, Schema, StoreError};

/// Create an index for every field of `schema` flagged `index`.
///
/// Returns the indexed field names in schema order.
pub async fn sync_indexes<S>(
    store: &S,
    collection: &str,
    schema: &Schema,
) -> Result<Vec<String>, StoreError>
where
    S: DocumentStore + ?Sized,
{
    let mut created = Vec::new();
    for field in schema.indexed_fields() {
        crate::debug_log!("ensuring index on '{}.{}'", collection, field);
        store.create_index(collection, field).await?;
        created.push(field.to_string());
    }
    Ok(created)
}

impl<S: DocumentStore + ?Sized> SoftHaus<S> {
    /// Re-sync the indexes of a registered model
    pub async fn migrate(&self, collection: &str) -> Result<Vec<String>, SoftHausError> {
        let model = self.model(collection)?;
        Ok(sync_indexes(model.store().as_ref(), collection, model.schema()).await?)
    }
}
