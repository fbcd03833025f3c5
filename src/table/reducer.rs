use crate::mvi::Reducer;
use crate::table::intent::TableIntent;
use crate::table::query::{upsert_filter, upsert_order};
use crate::table::state::TableState;

pub struct TableReducer;

impl Reducer for TableReducer {
    type State = TableState;
    type Intent = TableIntent;

    fn reduce(mut state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            TableIntent::QueryStarted => {
                state.selected_ids.clear();
                state.loading = true;
            }
            TableIntent::QuerySucceeded { result } => {
                state.total = result.total;
                state.items = result.items;
            }
            TableIntent::LoadingSettled => state.loading = false,
            TableIntent::StepBack => {
                state.offset = state.offset.saturating_sub(state.limit);
            }
            TableIntent::GoTo { offset } => state.offset = offset,

            TableIntent::SetKeyword { keyword } => state.keyword = keyword,
            TableIntent::SetLimit { limit } => state.limit = limit,
            TableIntent::SetFilter { filter } => upsert_filter(&mut state.filters, filter),
            TableIntent::RemoveFilter { field } => state.filters.retain(|f| f.field != field),
            TableIntent::SetOrder { order } => upsert_order(&mut state.orders, order),
            TableIntent::RemoveOrder { field } => state.orders.retain(|o| o.field != field),
            TableIntent::Reset { limit } => {
                state.offset = 0;
                state.limit = limit;
                state.keyword.clear();
                state.filters.clear();
                state.orders.clear();
            }

            TableIntent::Select { ids } => state.selected_ids = ids,

            TableIntent::OpenModal { form } => {
                state.modal_visible = true;
                state.form = form;
            }
            TableIntent::CloseModal => state.modal_visible = false,
            TableIntent::SetForm { form } => state.form = form,
            TableIntent::ModalBusy { busy } => state.modal_loading = busy,
        }
        state
    }
}
