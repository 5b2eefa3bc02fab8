//! Soft-delete mutator
//!
//! Deleting never removes a document: it writes the `deleted` and
//! `deleted_at` markers. There is no way back to the alive state.

use crate::args::{Arg, Completion, MutationOutcome, NormalizedArgs};
use crate::errors::SoftDeleteError;
use crate::model::core::SoftDeleteModel;
use crate::model::mutations::updated;
use crate::operations::{BaseOperation, Variant};
use crate::traits::{DocumentStore, SoftDeletable, SoftDocument, UpdateOptions, UpdateResult};
use crate::visibility::{DELETED_AT_FIELD, DELETED_FIELD};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use std::future::Future;
use type_mapping::{
    deserialize_document, document_id, new_object_id, serialize_to_document, timestamp_value,
    Document, ID_FIELD,
};

/// Message of the error raised when `delete_by_id` gets no usable id
pub const MANDATORY_ID_MESSAGE: &str = "First argument is mandatory and must not be a function.";

#[async_trait]
impl<S: DocumentStore + ?Sized> SoftDeletable for SoftDeleteModel<S> {
    async fn delete_document(&self, document: &mut Document) -> Result<Document, SoftDeleteError> {
        self.mark_and_save(document).await
    }

    async fn delete(&self, conditions: Document) -> Result<UpdateResult, SoftDeleteError> {
        self.delete_with(conditions, None).await
    }

    async fn delete_by_id(&self, id: Value) -> Result<UpdateResult, SoftDeleteError> {
        if id.is_null() {
            return Err(SoftDeleteError::MandatoryArgument(MANDATORY_ID_MESSAGE.to_string()));
        }
        self.delete_with(id_conditions(id), None).await
    }
}

impl<S: DocumentStore + ?Sized> SoftDeleteModel<S> {
    /// Instance delete with an optional completion callback.
    ///
    /// The callback receives the saved document as
    /// `MutationOutcome::Document`, or the error, before it is returned.
    pub async fn delete_document_with(
        &self,
        document: &mut Document,
        callback: Option<Completion>,
    ) -> Result<Document, SoftDeleteError> {
        let result = self.mark_and_save(document).await;
        let Some(callback) = callback else {
            return result;
        };

        let outcome = result.map(|saved| MutationOutcome::Document(Some(saved)));
        callback(&outcome);
        match outcome? {
            MutationOutcome::Document(Some(saved)) => Ok(saved),
            other => Err(SoftDeleteError::UnsupportedOperation(format!(
                "instance delete returned {:?}",
                other
            ))),
        }
    }

    async fn mark_and_save(&self, document: &mut Document) -> Result<Document, SoftDeleteError> {
        let id = match document_id(document).cloned() {
            Some(id) => id,
            None => {
                let id = new_object_id();
                document.insert(ID_FIELD.to_string(), id.clone());
                id
            }
        };

        document.insert(DELETED_FIELD.to_string(), id);
        if self.schema.path(DELETED_AT_FIELD).is_some() {
            document.insert(DELETED_AT_FIELD.to_string(), timestamp_value(Utc::now()));
        }

        let saved = self
            .save_with(document.clone(), self.options.validate_before_delete)
            .await?;
        *document = saved.clone();
        Ok(saved)
    }

    /// Collection-level delete with an optional completion callback.
    ///
    /// Every match gets `deleted = conditions._id`. The `update` with-deleted
    /// variant is used when it exists, so already-deleted matches are marked
    /// again; otherwise the call goes through `update_many`.
    pub async fn delete_with(
        &self,
        conditions: Document,
        callback: Option<Completion>,
    ) -> Result<UpdateResult, SoftDeleteError> {
        let mut payload = Document::new();
        payload.insert(
            DELETED_FIELD.to_string(),
            conditions.get(ID_FIELD).cloned().unwrap_or(Value::Null),
        );
        if self.schema.path(DELETED_AT_FIELD).is_some() {
            payload.insert(DELETED_AT_FIELD.to_string(), timestamp_value(Utc::now()));
        }

        let (operation, variant) = if self
            .registry
            .handler(BaseOperation::Update, Variant::WithDeleted)
            .is_some()
        {
            (BaseOperation::Update, Variant::WithDeleted)
        } else {
            (BaseOperation::UpdateMany, Variant::Default)
        };

        crate::debug_log!(
            "soft delete on '{}' via {}",
            self.collection(),
            variant.method_name(operation)
        );

        let args = NormalizedArgs {
            filter: Some(conditions),
            payload: Some(payload),
            options: Some(UpdateOptions::multi()),
            callback,
        };
        let outcome = self.dispatch_mutation(operation, variant, args).await?;
        updated(operation, outcome)
    }

    /// Positional `delete_by_id(id, deleted_by?, callback?)`.
    ///
    /// Fails before anything runs when no argument is given or the first one
    /// is a callback. A callback in second position is the completion; a
    /// non-callback `deleted_by` is accepted and not recorded.
    pub fn delete_by_id_args(
        &self,
        args: Vec<Arg>,
    ) -> Result<
        impl Future<Output = Result<UpdateResult, SoftDeleteError>> + Send + '_,
        SoftDeleteError,
    > {
        let mut args = args.into_iter();
        let id = match args.next() {
            None | Some(Arg::Callback(_)) => {
                return Err(SoftDeleteError::MandatoryArgument(
                    MANDATORY_ID_MESSAGE.to_string(),
                ))
            }
            Some(Arg::Document(document)) => Value::Object(document),
            Some(Arg::Value(value)) => value,
        };

        let callback = match (args.next(), args.next()) {
            (Some(Arg::Callback(callback)), _) | (_, Some(Arg::Callback(callback))) => {
                Some(callback)
            }
            _ => None,
        };

        let conditions = id_conditions(id);
        Ok(async move { self.delete_with(conditions, callback).await })
    }

    /// Delete a typed entity and write the stored markers back into it
    pub async fn delete_entity<T: SoftDocument>(
        &self,
        entity: &mut T,
    ) -> Result<(), SoftDeleteError> {
        let mut document = serialize_to_document(entity)?;
        self.delete_document(&mut document).await?;
        *entity = deserialize_document(&document)?;
        Ok(())
    }
}

fn id_conditions(id: Value) -> Document {
    let mut conditions = Document::new();
    conditions.insert(ID_FIELD.to_string(), id);
    conditions
}
