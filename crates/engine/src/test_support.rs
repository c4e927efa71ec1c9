//! In-memory [`WorkflowApi`] used by the orchestration tests.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use n8nctl_api::{ApiError, ErrorDetail, WorkflowApi};
use n8nctl_types::Workflow;
use reqwest::StatusCode;
use serde_json::{Value, json};

#[derive(Default)]
pub(crate) struct Store {
    workflows: Vec<Value>,
    calls: Vec<String>,
    next_id: u32,
}

#[derive(Default)]
pub struct FakeApi {
    pub(crate) store: Mutex<Store>,
    pub fail_list: bool,
    pub fail_activation: bool,
    pub fail_fetch: HashSet<String>,
}

impl FakeApi {
    pub fn with_workflows(workflows: Vec<Value>) -> Self {
        let api = Self::default();
        {
            let mut store = api.store.lock().unwrap();
            store.next_id = 100;
            store.workflows = workflows;
        }
        api
    }

    pub fn calls(&self) -> Vec<String> {
        self.store.lock().unwrap().calls.clone()
    }

    pub fn stored(&self) -> Vec<Value> {
        self.store.lock().unwrap().workflows.clone()
    }

    fn server_error(message: &str) -> ApiError {
        ApiError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: ErrorDetail::Text(message.to_string()),
        }
    }
}

fn typed(value: &Value) -> Result<Workflow, ApiError> {
    Ok(serde_json::from_value(value.clone())?)
}

#[async_trait]
impl WorkflowApi for FakeApi {
    async fn list_workflows(&self) -> Result<Vec<Workflow>, ApiError> {
        let mut store = self.store.lock().unwrap();
        store.calls.push("list".into());
        if self.fail_list {
            return Err(Self::server_error("list unavailable"));
        }
        store.workflows.iter().map(typed).collect()
    }

    async fn fetch_workflow_definition(&self, id: &str) -> Result<Value, ApiError> {
        let mut store = self.store.lock().unwrap();
        store.calls.push(format!("fetch {id}"));
        if self.fail_fetch.contains(id) {
            return Err(Self::server_error("fetch failed"));
        }
        store
            .workflows
            .iter()
            .find(|workflow| workflow["id"] == id)
            .cloned()
            .ok_or_else(|| Self::server_error("no such workflow"))
    }

    async fn create_workflow(&self, definition: &Value) -> Result<Workflow, ApiError> {
        let mut store = self.store.lock().unwrap();
        store.next_id += 1;
        let id = store.next_id.to_string();
        store.calls.push(format!("create {id}"));
        let mut created = definition.clone();
        created["id"] = json!(id);
        created["active"] = json!(false);
        store.workflows.push(created.clone());
        typed(&created)
    }

    async fn replace_workflow(&self, id: &str, definition: &Value) -> Result<Workflow, ApiError> {
        let mut store = self.store.lock().unwrap();
        store.calls.push(format!("replace {id}"));
        let slot = store
            .workflows
            .iter_mut()
            .find(|workflow| workflow["id"] == id)
            .ok_or_else(|| Self::server_error("no such workflow"))?;
        let active = json!(slot["active"].as_bool().unwrap_or(false));
        let mut replaced = definition.clone();
        replaced["id"] = json!(id);
        replaced["active"] = active;
        *slot = replaced.clone();
        typed(&replaced)
    }

    async fn set_active(&self, id: &str, active: bool) -> Result<Workflow, ApiError> {
        let mut store = self.store.lock().unwrap();
        store.calls.push(format!("activate {id} {active}"));
        if self.fail_activation {
            return Err(Self::server_error("activation rejected"));
        }
        let slot = store
            .workflows
            .iter_mut()
            .find(|workflow| workflow["id"] == id)
            .ok_or_else(|| Self::server_error("no such workflow"))?;
        slot["active"] = json!(active);
        typed(slot)
    }
}
