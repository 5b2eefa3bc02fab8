//! Operation registry
//!
//! Maps each base operation and variant to the handler that runs it. The set
//! of operations is closed; configuration only decides which of them get
//! filtered variants.

use std::fmt;

/// Store operations eligible for soft-delete variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BaseOperation {
    Count,
    CountDocuments,
    Find,
    FindOne,
    FindOneAndUpdate,
    Update,
    UpdateOne,
    UpdateMany,
    Aggregate,
}

/// How a base operation treats the visibility predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationFamily {
    /// Query-builder predicate appended after the store call is set up
    Read,
    /// Predicate merged into the resolved filter document
    Mutation,
    /// Pipeline stage manipulation
    Aggregate,
}

/// The three generated call forms of a base operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    /// `<op>`: excludes deleted documents
    Default,
    /// `<op>Deleted`: behaves exactly like `Default`
    Deleted,
    /// `<op>WithDeleted`: bypasses visibility filtering
    WithDeleted,
}

/// What actually runs for an operation/variant pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handler {
    /// Read with the not-deleted predicate
    FilteredRead,
    /// Read exactly as the caller wrote it
    RawRead,
    /// Mutation with `deleted_at: {$eq: null}` merged into the filter
    FilteredMutation,
    /// Mutation exactly as the caller wrote it
    RawMutation,
    /// Aggregate with the not-deleted stage at the head of the pipeline
    PrependNotDeleted,
    /// Aggregate with the bypass sentinel at the head of the pipeline
    ShowAllDocuments,
    /// Store call untouched by variant dispatch
    Passthrough,
}

impl BaseOperation {
    pub const ALL: [BaseOperation; 9] = [
        BaseOperation::Count,
        BaseOperation::CountDocuments,
        BaseOperation::Find,
        BaseOperation::FindOne,
        BaseOperation::FindOneAndUpdate,
        BaseOperation::Update,
        BaseOperation::UpdateOne,
        BaseOperation::UpdateMany,
        BaseOperation::Aggregate,
    ];

    /// Configuration name of the operation
    pub fn name(&self) -> &'static str {
        match self {
            BaseOperation::Count => "count",
            BaseOperation::CountDocuments => "countDocuments",
            BaseOperation::Find => "find",
            BaseOperation::FindOne => "findOne",
            BaseOperation::FindOneAndUpdate => "findOneAndUpdate",
            BaseOperation::Update => "update",
            BaseOperation::UpdateOne => "updateOne",
            BaseOperation::UpdateMany => "updateMany",
            BaseOperation::Aggregate => "aggregate",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|op| op.name() == name)
    }

    /// Every configuration name, in declaration order
    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(BaseOperation::name).collect()
    }

    pub fn family(&self) -> OperationFamily {
        match self {
            BaseOperation::Count
            | BaseOperation::CountDocuments
            | BaseOperation::Find
            | BaseOperation::FindOne => OperationFamily::Read,
            BaseOperation::FindOneAndUpdate
            | BaseOperation::Update
            | BaseOperation::UpdateOne
            | BaseOperation::UpdateMany => OperationFamily::Mutation,
            BaseOperation::Aggregate => OperationFamily::Aggregate,
        }
    }
}

impl fmt::Display for BaseOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Variant {
    /// Name of the generated entry point, e.g. `findWithDeleted`
    pub fn method_name(&self, operation: BaseOperation) -> String {
        match self {
            Variant::Default => operation.name().to_string(),
            Variant::Deleted => format!("{}Deleted", operation.name()),
            Variant::WithDeleted => format!("{}WithDeleted", operation.name()),
        }
    }
}

/// Per-schema handler table, fixed at augmentation time
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationRegistry {
    overridden: Vec<BaseOperation>,
}

impl OperationRegistry {
    pub fn new(overridden: impl IntoIterator<Item = BaseOperation>) -> Self {
        let mut overridden: Vec<BaseOperation> = overridden.into_iter().collect();
        overridden.sort();
        overridden.dedup();
        Self { overridden }
    }

    pub fn is_overridden(&self, operation: BaseOperation) -> bool {
        self.overridden.contains(&operation)
    }

    pub fn overridden(&self) -> &[BaseOperation] {
        &self.overridden
    }

    /// Whether every aggregate call passes through the global pipeline hook
    pub fn installs_aggregate_hook(&self) -> bool {
        !self.overridden.is_empty()
    }

    /// Handler for `operation` called as `variant`, or `None` when that
    /// variant was never generated
    pub fn handler(&self, operation: BaseOperation, variant: Variant) -> Option<Handler> {
        if !self.is_overridden(operation) {
            return match variant {
                Variant::Default => Some(Handler::Passthrough),
                Variant::Deleted | Variant::WithDeleted => None,
            };
        }

        let handler = match (operation.family(), variant) {
            (OperationFamily::Read, Variant::Default | Variant::Deleted) => Handler::FilteredRead,
            (OperationFamily::Read, Variant::WithDeleted) => Handler::RawRead,
            (OperationFamily::Mutation, Variant::Default | Variant::Deleted) => {
                Handler::FilteredMutation
            }
            (OperationFamily::Mutation, Variant::WithDeleted) => Handler::RawMutation,
            // plain aggregate is covered by the global hook
            (OperationFamily::Aggregate, Variant::Default) => Handler::Passthrough,
            (OperationFamily::Aggregate, Variant::Deleted) => Handler::PrependNotDeleted,
            (OperationFamily::Aggregate, Variant::WithDeleted) => Handler::ShowAllDocuments,
        };
        Some(handler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for operation in BaseOperation::ALL {
            assert_eq!(BaseOperation::from_name(operation.name()), Some(operation));
        }
        assert_eq!(BaseOperation::from_name("remove"), None);
        assert_eq!(Variant::WithDeleted.method_name(BaseOperation::FindOne), "findOneWithDeleted");
    }

    #[test]
    fn test_unconfigured_operations() {
        let registry = OperationRegistry::default();
        assert!(!registry.installs_aggregate_hook());
        assert_eq!(
            registry.handler(BaseOperation::Find, Variant::Default),
            Some(Handler::Passthrough)
        );
        assert_eq!(registry.handler(BaseOperation::Find, Variant::Deleted), None);
        assert_eq!(registry.handler(BaseOperation::Update, Variant::WithDeleted), None);
    }

    #[test]
    fn test_deleted_variant_aliases_default() {
        let registry = OperationRegistry::new(BaseOperation::ALL);
        for operation in BaseOperation::ALL {
            assert_eq!(
                registry.handler(operation, Variant::Default).map(|h| h == Handler::Passthrough),
                Some(operation == BaseOperation::Aggregate)
            );
            if operation.family() != OperationFamily::Aggregate {
                assert_eq!(
                    registry.handler(operation, Variant::Deleted),
                    registry.handler(operation, Variant::Default)
                );
            }
        }
    }

    #[test]
    fn test_aggregate_handlers() {
        let registry = OperationRegistry::new([BaseOperation::Aggregate]);
        assert!(registry.installs_aggregate_hook());
        assert_eq!(
            registry.handler(BaseOperation::Aggregate, Variant::Deleted),
            Some(Handler::PrependNotDeleted)
        );
        assert_eq!(
            registry.handler(BaseOperation::Aggregate, Variant::WithDeleted),
            Some(Handler::ShowAllDocuments)
        );
    }

    #[test]
    fn test_registry_dedups() {
        let registry = OperationRegistry::new([
            BaseOperation::Find,
            BaseOperation::Count,
            BaseOperation::Find,
        ]);
        assert_eq!(registry.overridden(), &[BaseOperation::Count, BaseOperation::Find]);
    }
}
