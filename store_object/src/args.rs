//! Argument normalization for mutation entry points
//!
//! Dynamic callers pass up to four positional [`Arg`]s in the order
//! filter, payload, options, callback, any of which may be omitted or replaced
//! by a completion callback. Typed callers use [`UpdateCall`], whose variants
//! map one-to-one onto the resolved shapes.

use crate::errors::SoftDeleteError;
use crate::traits::{UpdateOptions, UpdateResult};
use serde_json::Value;
use std::fmt;
use type_mapping::{Document, ID_FIELD};

/// Result of a mutation, whichever store operation ran
#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutcome {
    Updated(UpdateResult),
    Document(Option<Document>),
}

impl MutationOutcome {
    pub fn update_result(&self) -> Option<&UpdateResult> {
        match self {
            MutationOutcome::Updated(result) => Some(result),
            MutationOutcome::Document(_) => None,
        }
    }

    pub fn document(&self) -> Option<&Document> {
        match self {
            MutationOutcome::Document(document) => document.as_ref(),
            MutationOutcome::Updated(_) => None,
        }
    }
}

/// Completion callback receiving the outcome of the store call
pub type Completion = Box<dyn FnOnce(&Result<MutationOutcome, SoftDeleteError>) + Send>;

/// One positional argument of a dynamic call
pub enum Arg {
    Document(Document),
    Value(Value),
    Callback(Completion),
}

impl Arg {
    pub fn callback<F>(callback: F) -> Self
    where
        F: FnOnce(&Result<MutationOutcome, SoftDeleteError>) + Send + 'static,
    {
        Arg::Callback(Box::new(callback))
    }

    pub fn is_callback(&self) -> bool {
        matches!(self, Arg::Callback(_))
    }

    /// The document held in a filter, payload or options slot
    fn into_document(self, slot: &str) -> Result<Document, SoftDeleteError> {
        match self {
            Arg::Document(document) => Ok(document),
            Arg::Value(Value::Object(document)) => Ok(document),
            Arg::Value(other) => Err(SoftDeleteError::InvalidArgument(format!(
                "{} must be a document, got {}",
                slot, other
            ))),
            Arg::Callback(_) => Err(SoftDeleteError::InvalidArgument(format!(
                "{} must be a document, got a callback",
                slot
            ))),
        }
    }

    fn into_callback(self) -> Result<Completion, SoftDeleteError> {
        match self {
            Arg::Callback(callback) => Ok(callback),
            other => Err(SoftDeleteError::InvalidArgument(format!(
                "callback slot holds {:?}",
                other
            ))),
        }
    }
}

fn document_slot(arg: Option<Arg>, slot: &str) -> Result<Option<Document>, SoftDeleteError> {
    arg.map(|arg| arg.into_document(slot)).transpose()
}

fn callback_slot(arg: Option<Arg>) -> Result<Option<Completion>, SoftDeleteError> {
    arg.map(Arg::into_callback).transpose()
}

impl fmt::Debug for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Document(document) => f.debug_tuple("Document").field(document).finish(),
            Arg::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Arg::Callback(_) => f.write_str("Callback"),
        }
    }
}

impl From<Document> for Arg {
    fn from(document: Document) -> Self {
        Arg::Document(document)
    }
}

impl From<Value> for Arg {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(document) => Arg::Document(document),
            other => Arg::Value(other),
        }
    }
}

impl From<UpdateOptions> for Arg {
    fn from(options: UpdateOptions) -> Self {
        match serde_json::to_value(options) {
            Ok(Value::Object(document)) => Arg::Document(document),
            Ok(other) => Arg::Value(other),
            Err(_) => Arg::Value(Value::Null),
        }
    }
}

/// A call resolved into its canonical slots.
///
/// `None` means the argument was not supplied: an unspecified filter matches
/// everything and an unspecified payload changes nothing.
#[derive(Default)]
pub struct NormalizedArgs {
    pub filter: Option<Document>,
    pub payload: Option<Document>,
    pub options: Option<UpdateOptions>,
    pub callback: Option<Completion>,
}

impl NormalizedArgs {
    pub fn filter_or_all(&self) -> Document {
        self.filter.clone().unwrap_or_default()
    }

    pub fn payload_or_noop(&self) -> Document {
        self.payload.clone().unwrap_or_default()
    }

    pub fn options_or_default(&self) -> UpdateOptions {
        self.options.unwrap_or_default()
    }

    /// The slots actually supplied, in canonical order
    pub fn supplied(&self) -> usize {
        [
            self.filter.is_some(),
            self.payload.is_some(),
            self.options.is_some(),
            self.callback.is_some(),
        ]
        .iter()
        .filter(|present| **present)
        .count()
    }
}

impl fmt::Debug for NormalizedArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NormalizedArgs")
            .field("filter", &self.filter)
            .field("payload", &self.payload)
            .field("options", &self.options)
            .field("callback", &self.callback.is_some())
            .finish()
    }
}

/// Resolve positional arguments, first matching rule wins:
///
/// 1. a callback in the options slot ends the call; filter and payload shift in
/// 2. a callback in the payload slot: the first argument is the payload, filter is `{}`
/// 3. a callback first: nothing else is resolved
/// 4. a single document: it is the payload
/// 5. otherwise arguments are taken by position
///
/// Arguments past the fourth are ignored. Anything but a document in a
/// filter, payload or options slot, or anything but a callback in the
/// callback slot, is an [`SoftDeleteError::InvalidArgument`]; nothing runs.
pub fn normalize(args: Vec<Arg>) -> Result<NormalizedArgs, SoftDeleteError> {
    let mut slots = args.into_iter().take(4);
    let first = slots.next();
    let second = slots.next();
    let third = slots.next();
    let fourth = slots.next();

    let is_callback = |slot: &Option<Arg>| slot.as_ref().is_some_and(Arg::is_callback);

    if is_callback(&third) {
        return Ok(NormalizedArgs {
            filter: document_slot(first, "filter")?,
            payload: document_slot(second, "payload")?,
            options: None,
            callback: callback_slot(third)?,
        });
    }

    if is_callback(&second) {
        return Ok(NormalizedArgs {
            filter: Some(Document::new()),
            payload: document_slot(first, "payload")?,
            options: None,
            callback: callback_slot(second)?,
        });
    }

    if is_callback(&first) {
        return Ok(NormalizedArgs {
            callback: callback_slot(first)?,
            ..NormalizedArgs::default()
        });
    }

    if second.is_none() && third.is_none() && fourth.is_none() {
        return Ok(NormalizedArgs {
            payload: document_slot(first, "payload")?,
            ..NormalizedArgs::default()
        });
    }

    Ok(NormalizedArgs {
        filter: document_slot(first, "filter")?,
        payload: document_slot(second, "payload")?,
        options: document_slot(third, "options")?
            .map(|document| UpdateOptions::from_document(&document)),
        callback: callback_slot(fourth)?,
    })
}

/// Typed call shapes for mutation entry points
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateCall {
    /// Payload only; the filter is unspecified
    Payload(Document),
    ByFilter {
        filter: Document,
        update: Document,
    },
    WithOptions {
        filter: Document,
        update: Document,
        options: UpdateOptions,
    },
    /// Target a single document by `_id`
    ById {
        id: Value,
        update: Document,
    },
}

impl UpdateCall {
    pub fn by_filter(filter: Document, update: Document) -> Self {
        UpdateCall::ByFilter { filter, update }
    }

    pub fn with_options(filter: Document, update: Document, options: UpdateOptions) -> Self {
        UpdateCall::WithOptions {
            filter,
            update,
            options,
        }
    }

    pub fn by_id(id: impl Into<Value>, update: Document) -> Self {
        UpdateCall::ById {
            id: id.into(),
            update,
        }
    }
}

impl From<UpdateCall> for NormalizedArgs {
    fn from(call: UpdateCall) -> Self {
        match call {
            UpdateCall::Payload(update) => NormalizedArgs {
                payload: Some(update),
                ..NormalizedArgs::default()
            },
            UpdateCall::ByFilter { filter, update } => NormalizedArgs {
                filter: Some(filter),
                payload: Some(update),
                ..NormalizedArgs::default()
            },
            UpdateCall::WithOptions {
                filter,
                update,
                options,
            } => NormalizedArgs {
                filter: Some(filter),
                payload: Some(update),
                options: Some(options),
                callback: None,
            },
            UpdateCall::ById { id, update } => {
                let mut filter = Document::new();
                filter.insert(ID_FIELD.to_string(), id);
                NormalizedArgs {
                    filter: Some(filter),
                    payload: Some(update),
                    ..NormalizedArgs::default()
                }
            }
        }
    }
}
