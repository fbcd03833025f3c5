//! Admin metadata: which objects the server exposes and how their fields
//! can be searched, filtered, ordered and edited.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::api::rest::RestResource;
use crate::request::{RequestClient, RequestError};

/// Field layout of one admin object, as served by `GET object/{name}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectInfo {
    #[serde(default)]
    pub fields: Vec<String>,
    /// Value kind per field: `string`, `number`, `boolean`, `object`, `any`.
    #[serde(default)]
    pub types: Vec<String>,
    /// Server-side type per field.
    #[serde(default)]
    pub go_types: Vec<String>,
    #[serde(default)]
    pub searchs: Vec<String>,
    #[serde(default)]
    pub filters: Vec<String>,
    #[serde(default)]
    pub orders: Vec<String>,
    #[serde(default)]
    pub edits: Vec<String>,
    #[serde(default)]
    pub primary_key: Option<String>,
}

impl ObjectInfo {
    /// Field name to value kind.
    pub fn mapping(&self) -> HashMap<&str, &str> {
        self.fields
            .iter()
            .map(String::as_str)
            .zip(self.types.iter().map(String::as_str))
            .collect()
    }

    /// Field name to server-side type.
    pub fn go_mapping(&self) -> HashMap<&str, &str> {
        self.fields
            .iter()
            .map(String::as_str)
            .zip(self.go_types.iter().map(String::as_str))
            .collect()
    }

    pub fn can_search(&self, field: &str) -> bool {
        self.searchs.iter().any(|f| f == field)
    }

    pub fn can_filter(&self, field: &str) -> bool {
        self.filters.iter().any(|f| f == field)
    }

    pub fn can_order(&self, field: &str) -> bool {
        self.orders.iter().any(|f| f == field)
    }

    pub fn can_edit(&self, field: &str) -> bool {
        self.edits.iter().any(|f| f == field)
    }
}

/// Client for the admin metadata routes.
#[derive(Clone)]
pub struct AdminClient {
    client: RequestClient,
}

impl AdminClient {
    pub fn new(client: RequestClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &RequestClient {
        &self.client
    }

    /// Names of every registered object.
    pub async fn object_names(&self) -> Result<Vec<String>, RequestError> {
        self.client.get("object_names").await
    }

    pub async fn object_info(&self, name: &str) -> Result<ObjectInfo, RequestError> {
        self.client.get(&format!("object/{}", name)).await
    }

    /// Resource binding for `name`, keyed on the primary key the server
    /// reports for it.
    pub async fn resource(&self, name: &str) -> Result<RestResource, RequestError> {
        let info = self.object_info(name).await?;
        let resource = RestResource::new(self.client.clone(), name);
        Ok(match info.primary_key {
            Some(key) if !key.is_empty() => resource.with_primary_key(key),
            _ => resource,
        })
    }
}
