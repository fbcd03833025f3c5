use serde::{Deserialize, Serialize};

use crate::api::QueryMethod;

/// Root configuration container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub table: TableConfig,
}

/// Where the admin API lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Scheme, host and port (e.g. "http://127.0.0.1:8080").
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Route group the admin objects are registered under (e.g. "/admin").
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Method used for list queries: "post" or "get".
    #[serde(default)]
    pub query_method: QueryMethod,
}

/// Table controller behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableConfig {
    /// Rows per page, also restored by a reset (default: 10).
    #[serde(default = "default_page_size")]
    pub page_size: u64,
    /// Delay before clearing the loading flag after a query settles (default: 100).
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Delay before re-querying after a successful add (default: 100).
    #[serde(default = "default_requery_delay_ms")]
    pub requery_delay_ms: u64,
    /// Pages to step back when a query lands on an empty page (default: 1).
    #[serde(default = "default_max_backoff_steps")]
    pub max_backoff_steps: u32,
    /// Ask before deleting records (default: true).
    #[serde(default = "default_confirm_deletes")]
    pub confirm_deletes: bool,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8080".to_string()
}

fn default_prefix() -> String {
    "/admin".to_string()
}

fn default_page_size() -> u64 {
    10
}

fn default_debounce_ms() -> u64 {
    100
}

fn default_requery_delay_ms() -> u64 {
    100
}

fn default_max_backoff_steps() -> u32 {
    1
}

fn default_confirm_deletes() -> bool {
    true
}

impl ServerConfig {
    /// Base URL every admin route is resolved against.
    pub fn api_base(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        let prefix = self.prefix.trim_matches('/');
        if prefix.is_empty() {
            base.to_string()
        } else {
            format!("{}/{}", base, prefix)
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            prefix: default_prefix(),
            query_method: QueryMethod::default(),
        }
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            debounce_ms: default_debounce_ms(),
            requery_delay_ms: default_requery_delay_ms(),
            max_backoff_steps: default_max_backoff_steps(),
            confirm_deletes: default_confirm_deletes(),
        }
    }
}
