//! Shared test utilities and mock infrastructure.

#![allow(dead_code, unused_imports)]

pub mod mock_backend;

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use admintable::api::ResourceApi;
use admintable::notify::{AlertCenter, AlertLevel, Confirmation, PendingConfirm, DEFAULT_ALERT_DELAY};
use admintable::request::RequestError;
use admintable::table::{QueryParams, QueryResult, Record, RecordId, TableController, TableOptions};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::json;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Scripted query answer: optional delay, then the result.
struct ScriptedQuery {
    delay: Duration,
    result: Result<QueryResult, String>,
}

/// In-memory [`ResourceApi`] that records every call.
#[derive(Default)]
pub struct FakeApi {
    script: Mutex<VecDeque<ScriptedQuery>>,
    write_error: Mutex<Option<String>>,
    write_delay: Mutex<Duration>,
    pub queries: Mutex<Vec<QueryParams>>,
    pub added: Mutex<Vec<Record>>,
    pub edited: Mutex<Vec<Record>>,
    pub deleted: Mutex<Vec<RecordId>>,
    pub batches: Mutex<Vec<Vec<String>>>,
}

impl FakeApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue the result of the next unscripted query.
    pub fn push_result(&self, result: QueryResult) {
        self.push_delayed(Duration::ZERO, result);
    }

    pub fn push_delayed(&self, delay: Duration, result: QueryResult) {
        self.script.lock().push_back(ScriptedQuery {
            delay,
            result: Ok(result),
        });
    }

    pub fn push_failure(&self, reason: &str) {
        self.script.lock().push_back(ScriptedQuery {
            delay: Duration::ZERO,
            result: Err(reason.to_string()),
        });
    }

    /// Make every add/edit/delete/batch fail with `reason`.
    pub fn fail_writes(&self, reason: &str) {
        *self.write_error.lock() = Some(reason.to_string());
    }

    /// Hold every add/edit/delete/batch for `delay` before answering.
    pub fn delay_writes(&self, delay: Duration) {
        *self.write_delay.lock() = delay;
    }

    pub fn query_count(&self) -> usize {
        self.queries.lock().len()
    }

    pub fn offsets(&self) -> Vec<u64> {
        self.queries.lock().iter().map(|q| q.offset).collect()
    }

    async fn write_result(&self) -> Result<(), RequestError> {
        let delay = *self.write_delay.lock();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        match self.write_error.lock().clone() {
            Some(reason) => Err(status_error(&reason)),
            None => Ok(()),
        }
    }
}

fn status_error(reason: &str) -> RequestError {
    RequestError::Status {
        status: 404,
        reason: reason.to_string(),
    }
}

#[async_trait]
impl ResourceApi for FakeApi {
    async fn query(&self, params: QueryParams) -> Result<QueryResult, RequestError> {
        self.queries.lock().push(params);
        let scripted = self.script.lock().pop_front();
        let Some(scripted) = scripted else {
            return Ok(QueryResult::default());
        };
        if !scripted.delay.is_zero() {
            tokio::time::sleep(scripted.delay).await;
        }
        scripted.result.map_err(|reason| status_error(&reason))
    }

    async fn add(&self, form: Record) -> Result<(), RequestError> {
        self.added.lock().push(form);
        self.write_result().await
    }

    async fn edit(&self, item: Record) -> Result<(), RequestError> {
        self.edited.lock().push(item);
        self.write_result().await
    }

    async fn delete(&self, id: RecordId) -> Result<(), RequestError> {
        self.deleted.lock().push(id);
        self.write_result().await
    }

    async fn batch(&self, ids: Vec<String>) -> Result<(), RequestError> {
        self.batches.lock().push(ids);
        self.write_result().await
    }
}

/// A page of `count` rows out of `total`.
pub fn page(total: u64, count: usize) -> QueryResult {
    QueryResult {
        total,
        items: (0..count).map(|i| json!({ "id": i, "name": format!("row{}", i) })).collect(),
        ..QueryResult::default()
    }
}

pub fn record(value: serde_json::Value) -> Record {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("expected a JSON object, got {}", other),
    }
}

/// Answer every confirmation prompt with `answer`. Resolves to the number
/// of prompts seen once the center is dropped.
pub fn answer_all(
    mut prompts: mpsc::Receiver<PendingConfirm>,
    answer: Confirmation,
) -> JoinHandle<usize> {
    tokio::spawn(async move {
        let mut seen = 0;
        while let Some(pending) = prompts.recv().await {
            seen += 1;
            pending.answer(answer);
        }
        seen
    })
}

/// Controller over a [`FakeApi`] with an [`AlertCenter`] whose prompts are
/// all answered with `answer`.
pub fn make_table(
    api: &Arc<FakeApi>,
    options: TableOptions,
    answer: Confirmation,
) -> (TableController, AlertCenter) {
    let (center, prompts) = AlertCenter::new(DEFAULT_ALERT_DELAY);
    answer_all(prompts, answer);
    let table = TableController::new(api.clone(), Arc::new(center.clone()), options);
    (table, center)
}

/// Messages raised at `level`, oldest first.
pub fn alerts(center: &AlertCenter, level: AlertLevel) -> Vec<String> {
    center
        .history()
        .into_iter()
        .filter(|alert| alert.level == level)
        .map(|alert| alert.message)
        .collect()
}
