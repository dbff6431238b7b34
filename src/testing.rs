//! Test doubles shared by unit tests

use crate::api::{ApiClient, MethodCall, PageBody};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

type Responder = dyn Fn(&MethodCall) -> Result<PageBody> + Send + Sync;

/// In-memory `ApiClient` answering every call through a closure
///
/// Records each call it receives, in order.
pub(crate) struct ScriptedClient {
    respond: Box<Responder>,
    calls: Mutex<Vec<MethodCall>>,
}

impl ScriptedClient {
    pub(crate) fn new<F>(respond: F) -> Arc<Self>
    where
        F: Fn(&MethodCall) -> Result<PageBody> + Send + Sync + 'static,
    {
        Arc::new(Self {
            respond: Box::new(respond),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn calls(&self) -> Vec<MethodCall> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Page numbers requested for `method`, in order
    pub(crate) fn pages_requested(&self, method: &str) -> Vec<String> {
        self.calls()
            .iter()
            .filter(|c| c.method() == method)
            .filter_map(|c| c.get("page").map(str::to_string))
            .collect()
    }
}

#[async_trait]
impl ApiClient for ScriptedClient {
    async fn execute_method(&self, call: &MethodCall) -> Result<PageBody> {
        self.calls.lock().unwrap().push(call.clone());
        (self.respond)(call)
    }
}

/// Page number of a call, defaulting to 1
pub(crate) fn page_of(call: &MethodCall) -> u32 {
    call.get("page").and_then(|p| p.parse().ok()).unwrap_or(1)
}
