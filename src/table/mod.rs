//! Table management: query parameters, result page, modal form and the
//! controller that keeps them in sync with a resource.

mod controller;
mod intent;
mod query;
mod reducer;
mod state;

pub use controller::{ActionOutcome, DeletePolicy, FormValidator, TableController, TableOptions};
pub use intent::TableIntent;
pub use query::{
    upsert_filter, upsert_order, Filter, FilterOp, Order, OrderOp, QueryExtras, QueryParams,
    QueryResult, Record, RecordId,
};
pub use reducer::TableReducer;
pub use state::{TableState, DEFAULT_LIMIT};
