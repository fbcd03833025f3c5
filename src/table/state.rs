use serde_json::Value;

use crate::mvi::UiState;
use crate::pagination;
use crate::table::query::{Filter, Order, QueryExtras, QueryParams, Record, RecordId};

/// Page size restored by a reset.
pub const DEFAULT_LIMIT: u64 = 10;

/// Everything a table view renders from.
#[derive(Debug, Clone, PartialEq)]
pub struct TableState {
    // query parameters
    pub offset: u64,
    pub limit: u64,
    pub keyword: String,
    pub filters: Vec<Filter>,
    pub orders: Vec<Order>,

    // query result
    pub total: u64,
    pub items: Vec<Value>,

    pub loading: bool,
    pub selected_ids: Vec<RecordId>,

    // add/edit modal
    pub modal_visible: bool,
    pub modal_loading: bool,
    pub form: Record,
}

impl Default for TableState {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: DEFAULT_LIMIT,
            keyword: String::new(),
            filters: Vec::new(),
            orders: Vec::new(),
            total: 0,
            items: Vec::new(),
            loading: false,
            selected_ids: Vec::new(),
            modal_visible: false,
            modal_loading: false,
            form: Record::new(),
        }
    }
}

impl UiState for TableState {}

impl TableState {
    pub fn with_limit(limit: u64) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    /// Request body for the current window, search and filters.
    pub fn query_params(&self, extras: &QueryExtras) -> QueryParams {
        QueryParams {
            offset: self.offset,
            limit: self.limit,
            keyword: self.keyword.clone(),
            filters: self.filters.clone(),
            orders: self.orders.clone(),
            extras: extras.clone(),
        }
    }

    pub fn current_page(&self) -> u64 {
        pagination::current_page(self.offset, self.limit, self.total)
    }

    pub fn total_pages(&self) -> u64 {
        pagination::total_pages(self.limit, self.total)
    }
}
