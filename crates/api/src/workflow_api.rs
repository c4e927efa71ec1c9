use async_trait::async_trait;
use n8nctl_types::Workflow;
use serde_json::Value;

use crate::client::N8nClient;
use crate::error::ApiError;

/// The workflow operations deploy and backup orchestration depend on.
///
/// [`N8nClient`] is the production implementation; tests substitute an
/// in-memory store.
#[async_trait]
pub trait WorkflowApi: Send + Sync {
    /// Every workflow on the instance.
    async fn list_workflows(&self) -> Result<Vec<Workflow>, ApiError>;

    /// Full stored definition of workflow `id`, untyped so it can be written
    /// out verbatim.
    async fn fetch_workflow_definition(&self, id: &str) -> Result<Value, ApiError>;

    async fn create_workflow(&self, definition: &Value) -> Result<Workflow, ApiError>;

    async fn replace_workflow(&self, id: &str, definition: &Value) -> Result<Workflow, ApiError>;

    async fn set_active(&self, id: &str, active: bool) -> Result<Workflow, ApiError>;
}

#[async_trait]
impl WorkflowApi for N8nClient {
    async fn list_workflows(&self) -> Result<Vec<Workflow>, ApiError> {
        N8nClient::list_workflows(self, None, None).await
    }

    async fn fetch_workflow_definition(&self, id: &str) -> Result<Value, ApiError> {
        self.get_workflow_raw(id).await
    }

    async fn create_workflow(&self, definition: &Value) -> Result<Workflow, ApiError> {
        N8nClient::create_workflow(self, definition).await
    }

    async fn replace_workflow(&self, id: &str, definition: &Value) -> Result<Workflow, ApiError> {
        N8nClient::replace_workflow(self, id, definition).await
    }

    async fn set_active(&self, id: &str, active: bool) -> Result<Workflow, ApiError> {
        N8nClient::set_active(self, id, active).await
    }
}
