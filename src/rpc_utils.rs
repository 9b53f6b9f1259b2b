use crate::error::{HiveError, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;

#[cfg(not(target_arch = "wasm32"))]
use tokio::time::{sleep, Duration};

#[cfg(target_arch = "wasm32")]
use web_time::Duration;

#[cfg(target_arch = "wasm32")]
use gloo_timers::future::sleep;

static HTTP: OnceLock<reqwest::Client> = OnceLock::new();

pub(crate) fn http_client() -> &'static reqwest::Client {
    HTTP.get_or_init(|| {
        #[cfg(not(target_arch = "wasm32"))]
        let builder = reqwest::Client::builder()
            .pool_max_idle_per_host(8)
            .tcp_nodelay(true);

        #[cfg(target_arch = "wasm32")]
        let builder = reqwest::Client::builder();

        builder.build().unwrap_or_else(|e| {
            log::warn!("reqwest client builder failed ({e}), using defaults");
            reqwest::Client::new()
        })
    })
}

/// One JSON-RPC round trip. Implemented over HTTPS by [`HttpTransport`];
/// tests script it in memory.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait RpcTransport: Send + Sync {
    /// Call `method` with positional `params` and return the `result` member.
    async fn call(&self, method: &str, params: Value) -> Result<Value>;
}

/// JSON-RPC 2.0 over HTTPS POST against a single Hive API node.
pub struct HttpTransport {
    url: String,
    timeout_ms: u64,
    retries: u32,
    next_id: AtomicU64,
}

impl HttpTransport {
    pub fn new(url: impl Into<String>, timeout_ms: u64, retries: u32) -> Self {
        Self {
            url: url.into(),
            timeout_ms,
            retries,
            next_id: AtomicU64::new(1),
        }
    }

    pub fn from_config(cfg: &crate::config::Config) -> Self {
        Self::new(cfg.node_url.clone(), cfg.rpc_timeout_ms, cfg.rpc_retries)
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl RpcTransport for HttpTransport {
    async fn call(&self, method: &str, params: Value) -> Result<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = request_body(method, params, id);
        log::debug!("rpc #{id} {method} -> {}", self.url);
        rpc_post(&self.url, &body, self.timeout_ms, self.retries).await
    }
}

/// JSON-RPC request envelope
pub fn request_body(method: &str, params: Value, id: u64) -> Value {
    json!({"jsonrpc": "2.0", "method": method, "params": params, "id": id})
}

pub async fn rpc_post(url: &str, body: &Value, timeout_ms: u64, retries: u32) -> Result<Value> {
    // Small, bounded retry on transient HTTP failures
    let mut attempt = 0u32;
    loop {
        let sent = http_client()
            .post(url)
            .json(body)
            .timeout(Duration::from_millis(timeout_ms))
            .send()
            .await;

        let res = match sent {
            Ok(res) => res,
            Err(e) if attempt < retries => {
                attempt += 1;
                let back_ms = backoff_delay_ms(attempt);
                log::warn!("rpc send failed, retry={attempt} backoff={back_ms}ms: {e}");
                sleep(Duration::from_millis(back_ms)).await;
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        let status = res.status();
        if status.is_success() {
            let v: Value = res.json().await?;
            return extract_result(v);
        }

        // Retry only on transient statuses
        if HiveError::is_retryable_status(status.as_u16()) && attempt < retries {
            attempt += 1;
            let back_ms = backoff_delay_ms(attempt);
            log::warn!("rpc http {status}, retry={attempt} backoff={back_ms}ms");
            sleep(Duration::from_millis(back_ms)).await;
            continue;
        }
        return Err(HiveError::HttpStatus {
            status: status.as_u16(),
        });
    }
}

/// Pull `result` out of a response envelope; an `error` member wins.
pub fn extract_result(mut v: Value) -> Result<Value> {
    if let Some(err) = v.get("error") {
        let code = err.get("code").and_then(|c| c.as_i64()).unwrap_or_default();
        let message = err
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or("rpc error")
            .to_string();
        return Err(HiveError::Remote { code, message });
    }
    match v.get_mut("result") {
        Some(r) => Ok(r.take()),
        None => Err(HiveError::InvalidPayload("no result member".into())),
    }
}

#[cfg(feature = "native")]
fn backoff_delay_ms(attempt: u32) -> u64 {
    use rand::{thread_rng, Rng};
    let base = 150u64.saturating_mul(1u64 << (attempt.clamp(1, 6) - 1)); // 150,300,600,...
    let jitter: u64 = thread_rng().gen_range(0..=100);
    base + jitter
}

#[cfg(not(feature = "native"))]
fn backoff_delay_ms(attempt: u32) -> u64 {
    150u64.saturating_mul(1u64 << (attempt.clamp(1, 6) - 1))
}
