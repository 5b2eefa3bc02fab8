//! Mutation operations
//!
//! Filtered variants merge `deleted_at: {$eq: null}` into the resolved filter
//! before delegating; `WithDeleted` variants pass the call through as written.

use crate::args::{normalize, Arg, MutationOutcome, NormalizedArgs, UpdateCall};
use crate::errors::SoftDeleteError;
use crate::model::core::SoftDeleteModel;
use crate::operations::{BaseOperation, Handler, Variant};
use crate::traits::{DocumentStore, UpdateResult};
use crate::visibility::restrict_filter;
use type_mapping::Document;

impl<S: DocumentStore + ?Sized> SoftDeleteModel<S> {
    /// Route a resolved call through the registry, run it and hand the
    /// outcome to the completion callback, if any
    pub(crate) async fn dispatch_mutation(
        &self,
        operation: BaseOperation,
        variant: Variant,
        mut args: NormalizedArgs,
    ) -> Result<MutationOutcome, SoftDeleteError> {
        let callback = args.callback.take();

        let result = match self.registry.handler(operation, variant) {
            None => Err(self.variant_unavailable(operation, variant)),
            Some(handler) => {
                if handler == Handler::FilteredMutation {
                    args.filter = Some(restrict_filter(args.filter.take()));
                }
                self.execute_mutation(operation, args).await
            }
        };

        if let Some(callback) = callback {
            callback(&result);
        }
        result
    }

    async fn execute_mutation(
        &self,
        operation: BaseOperation,
        args: NormalizedArgs,
    ) -> Result<MutationOutcome, SoftDeleteError> {
        let filter = args.filter_or_all();
        let update = args.payload_or_noop();
        let options = args.options_or_default();
        let store = self.store.as_ref();
        let collection = self.collection();

        crate::trace_log!("{} on '{}' with filter {:?}", operation, collection, filter);

        let outcome = match operation {
            BaseOperation::Update if options.multi => MutationOutcome::Updated(
                store.update_many(collection, &filter, &update, &options).await?,
            ),
            BaseOperation::Update | BaseOperation::UpdateOne => MutationOutcome::Updated(
                store.update_one(collection, &filter, &update, &options).await?,
            ),
            BaseOperation::UpdateMany => MutationOutcome::Updated(
                store.update_many(collection, &filter, &update, &options).await?,
            ),
            BaseOperation::FindOneAndUpdate => MutationOutcome::Document(
                store
                    .find_one_and_update(collection, &filter, &update, &options)
                    .await?,
            ),
            other => {
                return Err(SoftDeleteError::UnsupportedOperation(format!(
                    "{} is not a mutation",
                    other
                )))
            }
        };
        Ok(outcome)
    }

    /// Dynamic entry point: resolve positional arguments, then dispatch.
    ///
    /// Malformed arguments fail before the store or any callback is reached.
    pub async fn call_mutation(
        &self,
        operation: BaseOperation,
        variant: Variant,
        args: Vec<Arg>,
    ) -> Result<MutationOutcome, SoftDeleteError> {
        self.dispatch_mutation(operation, variant, normalize(args)?).await
    }

    async fn typed_update(
        &self,
        operation: BaseOperation,
        variant: Variant,
        call: UpdateCall,
    ) -> Result<UpdateResult, SoftDeleteError> {
        let outcome = self.dispatch_mutation(operation, variant, call.into()).await?;
        updated(operation, outcome)
    }

    async fn typed_find_one_and_update(
        &self,
        variant: Variant,
        call: UpdateCall,
    ) -> Result<Option<Document>, SoftDeleteError> {
        match self
            .dispatch_mutation(BaseOperation::FindOneAndUpdate, variant, call.into())
            .await?
        {
            MutationOutcome::Document(document) => Ok(document),
            MutationOutcome::Updated(_) => Err(SoftDeleteError::UnsupportedOperation(
                "findOneAndUpdate returned an update result".to_string(),
            )),
        }
    }

    /// Generic update: every match when `multi` is set, otherwise the first
    pub async fn update(&self, call: UpdateCall) -> Result<UpdateResult, SoftDeleteError> {
        self.typed_update(BaseOperation::Update, Variant::Default, call).await
    }

    pub async fn update_deleted(&self, call: UpdateCall) -> Result<UpdateResult, SoftDeleteError> {
        self.typed_update(BaseOperation::Update, Variant::Deleted, call).await
    }

    pub async fn update_with_deleted(
        &self,
        call: UpdateCall,
    ) -> Result<UpdateResult, SoftDeleteError> {
        self.typed_update(BaseOperation::Update, Variant::WithDeleted, call).await
    }

    pub async fn update_one(&self, call: UpdateCall) -> Result<UpdateResult, SoftDeleteError> {
        self.typed_update(BaseOperation::UpdateOne, Variant::Default, call).await
    }

    pub async fn update_one_deleted(
        &self,
        call: UpdateCall,
    ) -> Result<UpdateResult, SoftDeleteError> {
        self.typed_update(BaseOperation::UpdateOne, Variant::Deleted, call).await
    }

    pub async fn update_one_with_deleted(
        &self,
        call: UpdateCall,
    ) -> Result<UpdateResult, SoftDeleteError> {
        self.typed_update(BaseOperation::UpdateOne, Variant::WithDeleted, call).await
    }

    pub async fn update_many(&self, call: UpdateCall) -> Result<UpdateResult, SoftDeleteError> {
        self.typed_update(BaseOperation::UpdateMany, Variant::Default, call).await
    }

    pub async fn update_many_deleted(
        &self,
        call: UpdateCall,
    ) -> Result<UpdateResult, SoftDeleteError> {
        self.typed_update(BaseOperation::UpdateMany, Variant::Deleted, call).await
    }

    pub async fn update_many_with_deleted(
        &self,
        call: UpdateCall,
    ) -> Result<UpdateResult, SoftDeleteError> {
        self.typed_update(BaseOperation::UpdateMany, Variant::WithDeleted, call).await
    }

    pub async fn find_one_and_update(
        &self,
        call: UpdateCall,
    ) -> Result<Option<Document>, SoftDeleteError> {
        self.typed_find_one_and_update(Variant::Default, call).await
    }

    pub async fn find_one_and_update_deleted(
        &self,
        call: UpdateCall,
    ) -> Result<Option<Document>, SoftDeleteError> {
        self.typed_find_one_and_update(Variant::Deleted, call).await
    }

    pub async fn find_one_and_update_with_deleted(
        &self,
        call: UpdateCall,
    ) -> Result<Option<Document>, SoftDeleteError> {
        self.typed_find_one_and_update(Variant::WithDeleted, call).await
    }
}

pub(crate) fn updated(
    operation: BaseOperation,
    outcome: MutationOutcome,
) -> Result<UpdateResult, SoftDeleteError> {
    match outcome {
        MutationOutcome::Updated(result) => Ok(result),
        MutationOutcome::Document(_) => Err(SoftDeleteError::UnsupportedOperation(format!(
            "{} returned a document instead of an update result",
            operation
        ))),
    }
}
