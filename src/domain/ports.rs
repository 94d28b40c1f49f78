use crate::domain::model::{EntityTestTask, TaskResult};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Target server coordinates for task execution.
pub trait TargetProvider: Send + Sync {
    fn base_url(&self) -> &str;
    fn credentials(&self) -> Option<(&str, &str)>;
    fn verify_ssl(&self) -> bool;
}

/// Executes a single test task. Transport failures are task outcomes, not
/// errors; Err is reserved for tasks that reference unknown entities or
/// methods.
#[async_trait]
pub trait TaskExecutor: Send + Sync {
    async fn execute(&self, task: &EntityTestTask) -> Result<TaskResult>;
}
