use crate::mvi::Intent;
use crate::table::query::{Filter, Order, QueryResult, Record, RecordId};

#[derive(Debug, Clone)]
pub enum TableIntent {
    /// A query is about to be sent. Clears the selection.
    QueryStarted,
    QuerySucceeded { result: QueryResult },
    /// The post-query debounce elapsed.
    LoadingSettled,
    /// Move one page back after an empty page.
    StepBack,
    /// Jump to an absolute offset.
    GoTo { offset: u64 },

    SetKeyword { keyword: String },
    SetLimit { limit: u64 },
    SetFilter { filter: Filter },
    RemoveFilter { field: String },
    SetOrder { order: Order },
    RemoveOrder { field: String },
    /// Back to the first page with no search, filters or orders.
    Reset { limit: u64 },

    Select { ids: Vec<RecordId> },

    /// Open the add/edit modal with `form` loaded.
    OpenModal { form: Record },
    CloseModal,
    SetForm { form: Record },
    ModalBusy { busy: bool },
}

impl Intent for TableIntent {}
