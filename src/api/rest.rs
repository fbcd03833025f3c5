use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::resource::ResourceApi;
use crate::request::{RequestClient, RequestError};
use crate::table::{QueryParams, QueryResult, Record, RecordId};

/// HTTP method used for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryMethod {
    /// `POST /{name}` with the query as body (the default route).
    #[default]
    Post,
    /// `GET /{name}` with the query as body.
    Get,
}

impl QueryMethod {
    fn method(&self) -> Method {
        match self {
            QueryMethod::Post => Method::POST,
            QueryMethod::Get => Method::GET,
        }
    }
}

/// [`ResourceApi`] over a REST admin resource.
///
/// Routes, relative to the client's base URL:
///
/// | operation | route                        |
/// |-----------|------------------------------|
/// | query     | `POST {name}` or `GET {name}`, `POST {name}/{view}` for views |
/// | add       | `PUT {name}`                 |
/// | edit      | `PATCH {name}/{id}`          |
/// | delete    | `DELETE {name}/{id}`         |
/// | batch     | `DELETE {name}` with id list |
/// | get       | `GET {name}/{id}`            |
#[derive(Debug, Clone)]
pub struct RestResource {
    client: RequestClient,
    name: String,
    primary_key: String,
    query_method: QueryMethod,
    view: Option<String>,
}

impl RestResource {
    pub fn new(client: RequestClient, name: impl Into<String>) -> Self {
        Self {
            client,
            name: name.into(),
            primary_key: "id".to_string(),
            query_method: QueryMethod::default(),
            view: None,
        }
    }

    /// Field of a record that holds its id. Defaults to `id`.
    pub fn with_primary_key(mut self, primary_key: impl Into<String>) -> Self {
        self.primary_key = primary_key.into();
        self
    }

    pub fn with_query_method(mut self, query_method: QueryMethod) -> Self {
        self.query_method = query_method;
        self
    }

    /// Query a named view of the resource instead of the resource itself.
    pub fn with_view(mut self, view: impl Into<String>) -> Self {
        self.view = Some(view.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn primary_key(&self) -> &str {
        &self.primary_key
    }

    fn collection_path(&self) -> &str {
        self.name.trim_matches('/')
    }

    /// Absolute URL of one record. The id is a single percent-encoded
    /// path segment.
    fn item_url(&self, id: &RecordId) -> Result<String, RequestError> {
        let mut url = self.client.url(self.collection_path())?;
        let raw = url.to_string();
        url.path_segments_mut()
            .map_err(|_| RequestError::InvalidUrl { url: raw })?
            .pop_if_empty()
            .push(&id.to_string());
        Ok(url.to_string())
    }

    /// Fetch a single record.
    pub async fn get(&self, id: &RecordId) -> Result<Record, RequestError> {
        self.client.get(&self.item_url(id)?).await
    }
}

#[async_trait]
impl ResourceApi for RestResource {
    async fn query(&self, params: QueryParams) -> Result<QueryResult, RequestError> {
        match &self.view {
            Some(view) => {
                let path = format!("{}/{}", self.collection_path(), view.trim_matches('/'));
                self.client.post(&path, Some(&params)).await
            }
            None => {
                self.client
                    .send(self.query_method.method(), self.collection_path(), Some(&params))
                    .await
            }
        }
    }

    async fn add(&self, form: Record) -> Result<(), RequestError> {
        let _: Value = self.client.put(self.collection_path(), Some(&form)).await?;
        Ok(())
    }

    async fn edit(&self, item: Record) -> Result<(), RequestError> {
        let id = item
            .get(&self.primary_key)
            .and_then(RecordId::from_value)
            .ok_or_else(|| RequestError::MissingKey {
                field: self.primary_key.clone(),
            })?;
        let _: Value = self.client.patch(&self.item_url(&id)?, Some(&item)).await?;
        Ok(())
    }

    async fn delete(&self, id: RecordId) -> Result<(), RequestError> {
        let _: Value = self
            .client
            .delete(&self.item_url(&id)?, None::<&Value>)
            .await?;
        Ok(())
    }

    async fn batch(&self, ids: Vec<String>) -> Result<(), RequestError> {
        let _: Value = self.client.delete(self.collection_path(), Some(&ids)).await?;
        Ok(())
    }
}
