//! Per-table controller: query parameters, result page and modal form,
//! plus the CRUD actions that keep them in sync with a [`ResourceApi`].

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::api::ResourceApi;
use crate::config::TableConfig;
use crate::mvi::Reducer;
use crate::notify::{ConfirmRequest, Notifier};
use crate::pagination::Pager;
use crate::table::intent::TableIntent;
use crate::table::query::{
    Filter, FilterOp, Order, OrderOp, QueryExtras, QueryResult, Record, RecordId,
};
use crate::table::reducer::TableReducer;
use crate::table::state::TableState;

/// Checks the modal form before add/edit. Returning `false` cancels the
/// action without any feedback.
pub type FormValidator = Arc<dyn Fn(&Record) -> bool + Send + Sync>;

const DELETE_TITLE: &str = "Delete Confirm";
const DELETE_ONE: &str = "Are you sure you want to delete this? This action cannot be undone.";
const DELETE_ALL: &str = "Are you sure you want to delete all? This action cannot be undone.";

/// Whether delete and batch delete ask the user first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeletePolicy {
    #[default]
    Confirm,
    Immediate,
}

/// How an action ended. Failures have already been reported through the
/// notifier by the time an action returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Done,
    /// Cancelled by validation, a declined confirmation, or a page move
    /// past the first/last page.
    Aborted,
    Failed,
    /// A newer query was issued before this one answered; its result was
    /// dropped.
    Superseded,
}

impl ActionOutcome {
    pub fn is_done(self) -> bool {
        matches!(self, ActionOutcome::Done)
    }
}

/// Construction options for a [`TableController`].
#[derive(Clone)]
pub struct TableOptions {
    /// Form loaded by [`TableController::show_add`].
    pub initial_form: Record,
    pub validate_form: Option<FormValidator>,
    pub extras: QueryExtras,
    pub delete_policy: DeletePolicy,
    /// Initial page size, restored by [`TableController::reset`].
    pub page_size: u64,
    /// Delay before `loading` is cleared after a query settles.
    pub debounce: Duration,
    /// Delay before the list is refreshed after an add.
    pub requery_delay: Duration,
    /// Pages a single query may step back when it lands on an empty page.
    pub max_backoff_steps: u32,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self::from(&TableConfig::default())
    }
}

impl From<&TableConfig> for TableOptions {
    fn from(config: &TableConfig) -> Self {
        Self {
            initial_form: Record::new(),
            validate_form: None,
            extras: QueryExtras::default(),
            delete_policy: if config.confirm_deletes {
                DeletePolicy::Confirm
            } else {
                DeletePolicy::Immediate
            },
            page_size: config.page_size,
            debounce: Duration::from_millis(config.debounce_ms),
            requery_delay: Duration::from_millis(config.requery_delay_ms),
            max_backoff_steps: config.max_backoff_steps,
        }
    }
}

impl TableOptions {
    pub fn with_initial_form(mut self, form: Record) -> Self {
        self.initial_form = form;
        self
    }

    pub fn with_validator<F>(mut self, validate: F) -> Self
    where
        F: Fn(&Record) -> bool + Send + Sync + 'static,
    {
        self.validate_form = Some(Arc::new(validate));
        self
    }

    pub fn with_extras(mut self, extras: QueryExtras) -> Self {
        self.extras = extras;
        self
    }

    pub fn with_delete_policy(mut self, policy: DeletePolicy) -> Self {
        self.delete_policy = policy;
        self
    }
}

struct Shared {
    state: TableState,
    /// Bumped for every query sent. Only the latest one may touch state.
    generation: u64,
}

impl Shared {
    fn apply(&mut self, intent: TableIntent) {
        let state = std::mem::take(&mut self.state);
        self.state = TableReducer::reduce(state, intent);
    }
}

struct Inner {
    api: Arc<dyn ResourceApi>,
    notifier: Arc<dyn Notifier>,
    options: TableOptions,
    shared: Mutex<Shared>,
}

enum Applied {
    Stale,
    SteppedBack,
    Settled,
}

/// State and actions of one admin table.
///
/// Cloning yields another handle to the same table. State is only changed
/// by the controller's own actions; readers get snapshots via
/// [`state`](Self::state). Request failures never escape an action: they
/// become error alerts and the action reports [`ActionOutcome::Failed`].
#[derive(Clone)]
pub struct TableController {
    inner: Arc<Inner>,
}

impl TableController {
    pub fn new(
        api: Arc<dyn ResourceApi>,
        notifier: Arc<dyn Notifier>,
        options: TableOptions,
    ) -> Self {
        let state = TableState::with_limit(options.page_size);
        Self {
            inner: Arc::new(Inner {
                api,
                notifier,
                options,
                shared: Mutex::new(Shared {
                    state,
                    generation: 0,
                }),
            }),
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> TableState {
        self.inner.shared.lock().state.clone()
    }

    pub fn current_page(&self) -> u64 {
        self.inner.shared.lock().state.current_page()
    }

    fn dispatch(&self, intent: TableIntent) {
        self.inner.shared.lock().apply(intent);
    }

    // -- query ---------------------------------------------------------------

    /// Fetch the page described by the current parameters.
    ///
    /// An empty page past the first one steps the offset back by one page
    /// and asks again, at most `max_backoff_steps` times per call.
    pub async fn query(&self) -> ActionOutcome {
        let mut steps = 0;
        loop {
            let (generation, params) = {
                let mut shared = self.inner.shared.lock();
                shared.generation += 1;
                shared.apply(TableIntent::QueryStarted);
                (
                    shared.generation,
                    shared.state.query_params(&self.inner.options.extras),
                )
            };
            tracing::debug!(
                generation,
                offset = params.offset,
                limit = params.limit,
                "querying table"
            );

            match self.inner.api.query(params).await {
                Ok(result) => {
                    let may_step_back = steps < self.inner.options.max_backoff_steps;
                    match self.apply_result(generation, result, may_step_back) {
                        Applied::Stale => return ActionOutcome::Superseded,
                        Applied::SteppedBack => {
                            steps += 1;
                            tracing::info!(generation, "empty page, stepping back one page");
                        }
                        Applied::Settled => {
                            self.settle_loading(generation);
                            return ActionOutcome::Done;
                        }
                    }
                }
                Err(err) => {
                    if !self.is_current(generation) {
                        tracing::debug!(generation, error = %err, "dropping stale query failure");
                        return ActionOutcome::Superseded;
                    }
                    self.inner.notifier.error(&err.to_string());
                    self.settle_loading(generation);
                    return ActionOutcome::Failed;
                }
            }
        }
    }

    fn apply_result(&self, generation: u64, result: QueryResult, may_step_back: bool) -> Applied {
        let mut shared = self.inner.shared.lock();
        if shared.generation != generation {
            tracing::debug!(generation, latest = shared.generation, "dropping stale query result");
            return Applied::Stale;
        }
        shared.apply(TableIntent::QuerySucceeded { result });

        if shared.state.items.is_empty() && shared.state.offset != 0 && may_step_back {
            shared.apply(TableIntent::StepBack);
            return Applied::SteppedBack;
        }
        Applied::Settled
    }

    fn is_current(&self, generation: u64) -> bool {
        self.inner.shared.lock().generation == generation
    }

    /// Clear `loading` once the debounce delay has passed, unless a newer
    /// query has started meanwhile.
    fn settle_loading(&self, generation: u64) {
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            tokio::time::sleep(inner.options.debounce).await;
            let mut shared = inner.shared.lock();
            if shared.generation == generation {
                shared.apply(TableIntent::LoadingSettled);
            }
        });
    }

    /// Back to the first page, then query.
    pub async fn search(&self) -> ActionOutcome {
        self.dispatch(TableIntent::GoTo { offset: 0 });
        self.query().await
    }

    pub async fn next_page(&self) -> ActionOutcome {
        if !self.turn_page(true) {
            return ActionOutcome::Aborted;
        }
        self.query().await
    }

    pub async fn prev_page(&self) -> ActionOutcome {
        if !self.turn_page(false) {
            return ActionOutcome::Aborted;
        }
        self.query().await
    }

    fn turn_page(&self, forward: bool) -> bool {
        let mut shared = self.inner.shared.lock();
        let state = &shared.state;
        let mut pager = Pager::new(state.offset, state.limit, state.total);
        let moved = if forward { pager.next() } else { pager.prev() };
        if moved {
            shared.apply(TableIntent::GoTo {
                offset: pager.offset,
            });
        }
        moved
    }

    pub async fn order(&self, field: impl Into<String>, op: OrderOp) -> ActionOutcome {
        self.dispatch(TableIntent::SetOrder {
            order: Order {
                field: field.into(),
                op,
            },
        });
        self.query().await
    }

    pub async fn remove_order(&self, field: impl Into<String>) -> ActionOutcome {
        self.dispatch(TableIntent::RemoveOrder {
            field: field.into(),
        });
        self.query().await
    }

    pub async fn filter(
        &self,
        field: impl Into<String>,
        op: FilterOp,
        value: serde_json::Value,
    ) -> ActionOutcome {
        self.dispatch(TableIntent::SetFilter {
            filter: Filter {
                field: field.into(),
                op,
                value,
            },
        });
        self.query().await
    }

    pub async fn remove_filter(&self, field: impl Into<String>) -> ActionOutcome {
        self.dispatch(TableIntent::RemoveFilter {
            field: field.into(),
        });
        self.query().await
    }

    /// Drop search, filters and orders, return to the first page at the
    /// default page size, then query once.
    pub async fn reset(&self) -> ActionOutcome {
        self.dispatch(TableIntent::Reset {
            limit: self.inner.options.page_size,
        });
        self.query().await
    }

    // -- plain state changes -------------------------------------------------

    /// Takes effect on the next query.
    pub fn set_keyword(&self, keyword: impl Into<String>) {
        self.dispatch(TableIntent::SetKeyword {
            keyword: keyword.into(),
        });
    }

    /// Takes effect on the next query. A zero limit is ignored.
    pub fn set_limit(&self, limit: u64) {
        if limit == 0 {
            return;
        }
        self.dispatch(TableIntent::SetLimit { limit });
    }

    /// Stage a filter for the next query, replacing any on the same field.
    pub fn set_filter(&self, filter: Filter) {
        self.dispatch(TableIntent::SetFilter { filter });
    }

    /// Stage an order for the next query, replacing any on the same field.
    pub fn set_order(&self, order: Order) {
        self.dispatch(TableIntent::SetOrder { order });
    }

    /// Move to a 1-based page for the next query. An offset past `u64::MAX`
    /// clamps to it.
    pub fn set_page(&self, page: u64) {
        let mut shared = self.inner.shared.lock();
        let offset = page.saturating_sub(1).saturating_mul(shared.state.limit);
        shared.apply(TableIntent::GoTo { offset });
    }

    pub fn select(&self, ids: Vec<RecordId>) {
        self.dispatch(TableIntent::Select { ids });
    }

    pub fn set_form(&self, form: Record) {
        self.dispatch(TableIntent::SetForm { form });
    }

    pub fn show_add(&self) {
        self.dispatch(TableIntent::OpenModal {
            form: self.inner.options.initial_form.clone(),
        });
    }

    pub fn show_edit(&self, row: &Record) {
        self.dispatch(TableIntent::OpenModal { form: row.clone() });
    }

    pub fn close_modal(&self) {
        self.dispatch(TableIntent::CloseModal);
    }

    // -- writes ----------------------------------------------------------------

    fn form_is_valid(&self) -> bool {
        let Some(validate) = &self.inner.options.validate_form else {
            return true;
        };
        let form = self.inner.shared.lock().state.form.clone();
        validate(&form)
    }

    /// Save `item` through the edit binding.
    pub async fn edit(&self, item: Record) -> ActionOutcome {
        if !self.form_is_valid() {
            return ActionOutcome::Aborted;
        }

        self.dispatch(TableIntent::ModalBusy { busy: true });
        match self.inner.api.edit(item).await {
            Ok(()) => {
                self.dispatch(TableIntent::CloseModal);
                self.dispatch(TableIntent::ModalBusy { busy: false });
                self.inner.notifier.success("Edit success!");
                self.query().await;
                ActionOutcome::Done
            }
            Err(err) => {
                self.inner.notifier.error(&err.to_string());
                self.dispatch(TableIntent::ModalBusy { busy: false });
                ActionOutcome::Failed
            }
        }
    }

    /// Create a record from the modal form. The list refreshes after
    /// `requery_delay`.
    pub async fn add(&self) -> ActionOutcome {
        if !self.form_is_valid() {
            return ActionOutcome::Aborted;
        }

        let form = {
            let mut shared = self.inner.shared.lock();
            shared.apply(TableIntent::ModalBusy { busy: true });
            shared.state.form.clone()
        };
        match self.inner.api.add(form).await {
            Ok(()) => {
                self.dispatch(TableIntent::CloseModal);
                self.dispatch(TableIntent::ModalBusy { busy: false });
                self.schedule_query(self.inner.options.requery_delay);
                self.inner.notifier.success("Add success!");
                ActionOutcome::Done
            }
            Err(err) => {
                self.inner.notifier.error(&err.to_string());
                self.dispatch(TableIntent::ModalBusy { busy: false });
                ActionOutcome::Failed
            }
        }
    }

    fn schedule_query(&self, delay: Duration) {
        let controller = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            controller.query().await;
        });
    }

    pub async fn delete(&self, id: RecordId) -> ActionOutcome {
        if !self.confirm_delete(DELETE_ONE).await {
            return ActionOutcome::Aborted;
        }

        tracing::info!(%id, "deleting record");
        match self.inner.api.delete(id).await {
            Ok(()) => {
                self.dispatch(TableIntent::CloseModal);
                self.inner.notifier.success("Delete success!");
                self.query().await;
                ActionOutcome::Done
            }
            Err(err) => {
                self.inner.notifier.error(&err.to_string());
                ActionOutcome::Failed
            }
        }
    }

    /// Delete every record in `ids`.
    pub async fn batch(&self, ids: Vec<RecordId>) -> ActionOutcome {
        if !self.confirm_delete(DELETE_ALL).await {
            return ActionOutcome::Aborted;
        }

        let ids: Vec<String> = ids.iter().map(ToString::to_string).collect();
        tracing::info!(count = ids.len(), "deleting records");
        match self.inner.api.batch(ids).await {
            Ok(()) => {
                self.query().await;
                ActionOutcome::Done
            }
            Err(err) => {
                self.inner.notifier.error(&err.to_string());
                ActionOutcome::Failed
            }
        }
    }

    /// [`batch`](Self::batch) over the current selection.
    pub async fn batch_selected(&self) -> ActionOutcome {
        let ids = self.inner.shared.lock().state.selected_ids.clone();
        self.batch(ids).await
    }

    async fn confirm_delete(&self, content: &str) -> bool {
        match self.inner.options.delete_policy {
            DeletePolicy::Immediate => true,
            DeletePolicy::Confirm => self
                .inner
                .notifier
                .confirm(ConfirmRequest::new(DELETE_TITLE, content))
                .await
                .is_positive(),
        }
    }
}
