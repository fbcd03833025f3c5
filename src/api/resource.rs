use async_trait::async_trait;

use crate::request::RequestError;
use crate::table::{QueryParams, QueryResult, Record, RecordId};

/// CRUD operations on one resource.
///
/// A [`TableController`](crate::table::TableController) is generic over
/// this trait so views can bind any backend (or a test double) to a table.
#[async_trait]
pub trait ResourceApi: Send + Sync {
    /// Fetch one page matching `params`.
    async fn query(&self, params: QueryParams) -> Result<QueryResult, RequestError>;

    /// Create a record from a form.
    async fn add(&self, form: Record) -> Result<(), RequestError>;

    /// Update a record. `item` carries its own primary key.
    async fn edit(&self, item: Record) -> Result<(), RequestError>;

    async fn delete(&self, id: RecordId) -> Result<(), RequestError>;

    /// Delete several records at once.
    async fn batch(&self, ids: Vec<String>) -> Result<(), RequestError>;
}
