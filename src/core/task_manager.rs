use crate::domain::model::{EntityTestTask, TaskResult};
use crate::utils::error::{Result, RizzaError};
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Task list persistence: one JSON task object per line, so exported runs
/// can be replayed with `brute -i`.
pub struct TaskManager;

impl TaskManager {
    pub fn export_tasks<I>(path: &str, tasks: I) -> Result<usize>
    where
        I: IntoIterator<Item = EntityTestTask>,
    {
        create_parent_dirs(path)?;
        let mut writer = BufWriter::new(File::create(path)?);
        let mut count = 0;
        for task in tasks {
            serde_json::to_writer(&mut writer, &task)?;
            writer.write_all(b"\n")?;
            count += 1;
        }
        writer.flush()?;
        Ok(count)
    }

    pub fn import_tasks(path: &str) -> Result<Vec<EntityTestTask>> {
        let reader = BufReader::new(File::open(path)?);
        let mut tasks = Vec::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let task: EntityTestTask =
                serde_json::from_str(&line).map_err(|e| RizzaError::TaskImportError {
                    path: path.to_string(),
                    line: idx + 1,
                    reason: e.to_string(),
                })?;
            tasks.push(task);
        }
        Ok(tasks)
    }
}

fn create_parent_dirs(path: &str) -> Result<()> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Where run results go: the literal spec "stdout" prints human-readable
/// lines, anything else is a file of JSON results.
pub enum LogSink {
    Stdout,
    File {
        path: String,
        writer: BufWriter<File>,
    },
}

impl LogSink {
    pub fn open(spec: &str) -> Result<Self> {
        if spec.eq_ignore_ascii_case("stdout") {
            return Ok(LogSink::Stdout);
        }
        create_parent_dirs(spec)?;
        Ok(LogSink::File {
            path: spec.to_string(),
            writer: BufWriter::new(File::create(spec)?),
        })
    }

    pub fn write_result(&mut self, result: &TaskResult) -> Result<()> {
        match self {
            LogSink::Stdout => {
                println!("Running test task {}", result.task);
                println!("{}", result);
                Ok(())
            }
            LogSink::File { writer, .. } => {
                serde_json::to_writer(&mut *writer, result)?;
                writer.write_all(b"\n")?;
                Ok(())
            }
        }
    }

    pub fn finish(&mut self) -> Result<()> {
        if let LogSink::File { writer, .. } = self {
            writer.flush()?;
        }
        Ok(())
    }

    pub fn description(&self) -> String {
        match self {
            LogSink::Stdout => "stdout".to_string(),
            LogSink::File { path, .. } => path.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn sample_tasks() -> Vec<EntityTestTask> {
        vec![
            EntityTestTask {
                entity: "Product".to_string(),
                method: "create".to_string(),
                field_dict: [("name".to_string(), "alpha".to_string())].into(),
                arg_dict: BTreeMap::new(),
            },
            EntityTestTask {
                entity: "Host".to_string(),
                method: "read".to_string(),
                field_dict: BTreeMap::new(),
                arg_dict: [("entity_id".to_string(), "integer".to_string())].into(),
            },
        ]
    }

    #[test]
    fn test_export_import_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tasks.json");
        let path = path.to_str().unwrap();

        let tasks = sample_tasks();
        let count = TaskManager::export_tasks(path, tasks.clone()).unwrap();
        assert_eq!(count, 2);

        let imported = TaskManager::import_tasks(path).unwrap();
        assert_eq!(imported, tasks);
    }

    #[test]
    fn test_export_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/dir/tasks.json");
        let path = path.to_str().unwrap();

        TaskManager::export_tasks(path, sample_tasks()).unwrap();
        assert!(std::path::Path::new(path).exists());
    }

    #[test]
    fn test_import_skips_blank_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tasks.json");
        let task_json = serde_json::to_string(&sample_tasks()[0]).unwrap();
        std::fs::write(&path, format!("{}\n\n{}\n", task_json, task_json)).unwrap();

        let imported = TaskManager::import_tasks(path.to_str().unwrap()).unwrap();
        assert_eq!(imported.len(), 2);
    }

    #[test]
    fn test_import_reports_line_of_malformed_task() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tasks.json");
        let task_json = serde_json::to_string(&sample_tasks()[0]).unwrap();
        std::fs::write(&path, format!("{}\nnot json\n", task_json)).unwrap();

        let err = TaskManager::import_tasks(path.to_str().unwrap()).unwrap_err();
        match err {
            RizzaError::TaskImportError { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_log_sink_stdout_spec_is_case_insensitive() {
        assert!(matches!(LogSink::open("STDOUT").unwrap(), LogSink::Stdout));
        assert!(matches!(LogSink::open("stdout").unwrap(), LogSink::Stdout));
    }

    #[test]
    fn test_log_sink_file_writes_json_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.log");
        let path = path.to_str().unwrap();

        let mut sink = LogSink::open(path).unwrap();
        let result = TaskResult::failed(sample_tasks()[0].clone(), Some(500), "boom".to_string());
        sink.write_result(&result).unwrap();
        sink.finish().unwrap();

        let content = std::fs::read_to_string(path).unwrap();
        let parsed: TaskResult = serde_json::from_str(content.trim()).unwrap();
        assert_eq!(parsed.status, Some(500));
        assert_eq!(parsed.task, sample_tasks()[0]);
    }
}
