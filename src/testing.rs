//! Scripted in-memory transport for unit tests.

use crate::error::{HiveError, Result};
use crate::rpc_utils::RpcTransport;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Replays queued responses in order and records every call.
/// Once the queue is empty every further call returns `[]`.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<Value>>>,
    calls: Mutex<Vec<(String, Value)>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, v: Value) -> Self {
        self.responses.lock().unwrap().push_back(Ok(v));
        self
    }

    pub fn fail(self, err: HiveError) -> Self {
        self.responses.lock().unwrap().push_back(Err(err));
        self
    }

    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RpcTransport for ScriptedTransport {
    async fn call(&self, method: &str, params: Value) -> Result<Value> {
        self.calls
            .lock()
            .unwrap()
            .push((method.to_string(), params));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(json!([])))
    }
}

pub fn raw_post(author: &str, permlink: &str, created: &str) -> Value {
    json!({
        "author": author,
        "permlink": permlink,
        "category": "introduceyourself",
        "title": format!("{author}/{permlink}"),
        "body": "body",
        "created": created,
        "children": 0,
        "active_votes": [],
        "json_metadata": "{}",
        "pending_payout_value": "0.000 HBD"
    })
}

/// `n` posts by `author` with permlinks `{prefix}{i}`, one minute apart,
/// newest first starting from `2024-06-01T12:00:00`.
pub fn raw_posts(author: &str, prefix: &str, n: usize) -> Vec<Value> {
    let base = chrono::NaiveDate::from_ymd_opt(2024, 6, 1)
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .unwrap();
    (0..n)
        .map(|i| {
            let created = base - chrono::Duration::minutes(i as i64);
            raw_post(
                author,
                &format!("{prefix}{i}"),
                &created.format("%Y-%m-%dT%H:%M:%S").to_string(),
            )
        })
        .collect()
}
