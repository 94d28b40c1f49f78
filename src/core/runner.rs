use crate::core::task_manager::LogSink;
use crate::domain::model::{EntityTestTask, TaskResult};
use crate::domain::ports::TaskExecutor;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

const PROGRESS_INTERVAL: usize = 500;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
}

/// Drives a task stream through an executor, recording every outcome.
pub struct TestRunner<E: TaskExecutor> {
    executor: E,
    monitor: SystemMonitor,
}

impl<E: TaskExecutor> TestRunner<E> {
    pub fn new(executor: E) -> Self {
        Self::new_with_monitoring(executor, false)
    }

    pub fn new_with_monitoring(executor: E, monitor_enabled: bool) -> Self {
        Self {
            executor,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run<I>(&self, tasks: I, sink: &mut LogSink) -> Result<RunSummary>
    where
        I: IntoIterator<Item = EntityTestTask>,
    {
        let mut summary = RunSummary::default();
        tracing::info!("Starting brute force run, logging to {}", sink.description());

        for task in tasks {
            let result = match self.executor.execute(&task).await {
                Ok(result) => result,
                // 損壞的任務不中斷整個 run
                Err(err) => {
                    tracing::warn!("Task could not be executed: {}", err);
                    TaskResult::failed(task, None, err.to_string())
                }
            };

            summary.total += 1;
            if result.is_passed() {
                summary.passed += 1;
            } else {
                summary.failed += 1;
            }
            sink.write_result(&result)?;

            if self.monitor.is_enabled() && summary.total % PROGRESS_INTERVAL == 0 {
                self.monitor.log_progress(summary.total);
            }
        }

        sink.finish()?;
        self.monitor.log_final_stats();
        tracing::info!(
            "Run complete: {} tasks, {} passed, {} failed",
            summary.total,
            summary.passed,
            summary.failed
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::RizzaError;
    use async_trait::async_trait;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    struct StubExecutor;

    #[async_trait]
    impl TaskExecutor for StubExecutor {
        async fn execute(&self, task: &EntityTestTask) -> Result<TaskResult> {
            match task.method.as_str() {
                "create" => Ok(TaskResult::passed(task.clone(), 201, String::new())),
                "broken" => Err(RizzaError::UnknownMethodError {
                    entity: task.entity.clone(),
                    method: task.method.clone(),
                }),
                _ => Ok(TaskResult::failed(task.clone(), Some(404), String::new())),
            }
        }
    }

    fn task(method: &str) -> EntityTestTask {
        EntityTestTask {
            entity: "Product".to_string(),
            method: method.to_string(),
            field_dict: BTreeMap::new(),
            arg_dict: BTreeMap::new(),
        }
    }

    #[tokio::test]
    async fn test_run_tallies_outcomes() {
        let dir = TempDir::new().unwrap();
        let log_path = dir.path().join("run.log");
        let mut sink = LogSink::open(log_path.to_str().unwrap()).unwrap();

        let runner = TestRunner::new(StubExecutor);
        let tasks = vec![task("create"), task("read"), task("create")];
        let summary = runner.run(tasks, &mut sink).await.unwrap();

        assert_eq!(
            summary,
            RunSummary {
                total: 3,
                passed: 2,
                failed: 1
            }
        );

        let content = std::fs::read_to_string(&log_path).unwrap();
        assert_eq!(content.lines().count(), 3);
    }

    #[tokio::test]
    async fn test_executor_errors_become_failed_results() {
        let dir = TempDir::new().unwrap();
        let log_path = dir.path().join("run.log");
        let mut sink = LogSink::open(log_path.to_str().unwrap()).unwrap();

        let runner = TestRunner::new(StubExecutor);
        let summary = runner.run(vec![task("broken")], &mut sink).await.unwrap();

        assert_eq!(summary.total, 1);
        assert_eq!(summary.failed, 1);

        let content = std::fs::read_to_string(&log_path).unwrap();
        let result: TaskResult = serde_json::from_str(content.trim()).unwrap();
        assert!(!result.is_passed());
        assert!(result.message.contains("broken"));
    }

    #[tokio::test]
    async fn test_empty_task_stream() {
        let dir = TempDir::new().unwrap();
        let mut sink = LogSink::open(dir.path().join("run.log").to_str().unwrap()).unwrap();

        let runner = TestRunner::new(StubExecutor);
        let summary = runner.run(Vec::new(), &mut sink).await.unwrap();

        assert_eq!(summary, RunSummary::default());
    }
}
