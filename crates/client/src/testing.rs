//! Scripted transport double used by the crate's tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use crate::fetch::{ApiRequest, FailureReason, Mirror, MirrorResponse, Transport};

/// How one scripted call behaves.
#[derive(Debug, Clone)]
pub(crate) struct Script {
    delay: Duration,
    outcome: Result<String, FailureReason>,
}

impl Script {
    pub(crate) fn ok(body: &str) -> Self {
        Self::ok_after(Duration::ZERO, body)
    }

    pub(crate) fn ok_after(delay: Duration, body: &str) -> Self {
        Self { delay, outcome: Ok(body.to_string()) }
    }

    pub(crate) fn json(body: serde_json::Value) -> Self {
        Self::ok(&body.to_string())
    }

    pub(crate) fn fail(reason: FailureReason) -> Self {
        Self::fail_after(Duration::ZERO, reason)
    }

    pub(crate) fn fail_after(delay: Duration, reason: FailureReason) -> Self {
        Self { delay, outcome: Err(reason) }
    }
}

/// Answers from per-mirror scripts first, then per-request scripts, then 404.
///
/// Records every call, every completion and every attempt dropped mid-flight.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    by_mirror: HashMap<String, Script>,
    by_request: HashMap<String, Script>,
    calls: Mutex<Vec<(String, String)>>,
    requests: Mutex<Vec<ApiRequest>>,
    completed: Mutex<Vec<String>>,
    cancelled: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn mirror(mut self, name: &str, script: Script) -> Self {
        self.by_mirror.insert(name.to_string(), script);
        self
    }

    pub(crate) fn route(mut self, request: &ApiRequest, script: Script) -> Self {
        self.by_request.insert(request.path_and_query(), script);
        self
    }

    pub(crate) fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }

    /// Every request as received, in call order.
    pub(crate) fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of calls made for `request`, across all mirrors.
    pub(crate) fn calls_to(&self, request: &ApiRequest) -> usize {
        let target = request.path_and_query();
        self.calls.lock().unwrap().iter().filter(|(_, path)| *path == target).count()
    }

    /// Number of calls whose path starts with `prefix`.
    pub(crate) fn calls_under(&self, prefix: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|(_, path)| path.starts_with(prefix)).count()
    }

    pub(crate) fn completed(&self) -> Vec<String> {
        self.completed.lock().unwrap().clone()
    }

    pub(crate) fn cancelled(&self) -> Vec<String> {
        self.cancelled.lock().unwrap().clone()
    }

    fn script_for(&self, mirror: &Mirror, path: &str) -> Script {
        self.by_mirror
            .get(&mirror.name)
            .or_else(|| self.by_request.get(path))
            .cloned()
            .unwrap_or_else(|| Script::fail(FailureReason::Status(404)))
    }
}

/// Records the mirror as cancelled if dropped while still armed.
struct CancelGuard<'a> {
    log: &'a Mutex<Vec<String>>,
    mirror: String,
    armed: bool,
}

impl Drop for CancelGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.log.lock().unwrap().push(self.mirror.clone());
        }
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn execute(&self, mirror: &Mirror, request: &ApiRequest) -> Result<MirrorResponse, FailureReason> {
        let path = request.path_and_query();
        self.calls.lock().unwrap().push((mirror.name.clone(), path.clone()));
        self.requests.lock().unwrap().push(request.clone());
        let script = self.script_for(mirror, &path);

        let mut guard = CancelGuard { log: &self.cancelled, mirror: mirror.name.clone(), armed: true };
        if !script.delay.is_zero() {
            tokio::time::sleep(script.delay).await;
        }
        guard.armed = false;

        self.completed.lock().unwrap().push(mirror.name.clone());
        script.outcome.map(MirrorResponse::ok)
    }
}
