//! Typed soft-delete entities

use crate::schema::Schema;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// A typed entity stored in a soft-delete collection.
///
/// This trait should be derived with the `#[soft_model]` attribute macro,
/// which also adds the `deleted` and `deleted_at` marker fields:
/// ```ignore
/// use softhaus::prelude::*;
///
/// #[soft_model]
/// #[collection(name = "articles")]
/// pub struct Article {
///     #[primary_key]
///     pub id: String,
///
///     #[index]
///     pub title: String,
///
///     pub body: Option<String>,
/// }
/// ```
pub trait SoftDocument: Serialize + DeserializeOwned + Send + Sync {
    /// Collection the entity lives in
    fn collection_name() -> &'static str;

    /// Schema derived from the entity's fields
    fn schema() -> Schema;
}
