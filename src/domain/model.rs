use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    String,
    Integer,
    Boolean,
    Email,
    Url,
    Date,
    IpAddr,
    MacAddr,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    pub kind: FieldKind,
    #[serde(default)]
    pub required: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodDef {
    pub name: String,
    #[serde(default)]
    pub args: Vec<String>,
}

/// Declarative description of one API entity: where it lives and what it
/// accepts. Stands in for runtime introspection of a client library.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityDef {
    pub name: String,
    /// Collection endpoint, e.g. "/api/v2/products".
    pub endpoint: String,
    /// Root key create/update payloads are nested under, when the API
    /// expects one (e.g. {"product": {...}}).
    #[serde(default)]
    pub payload_root: Option<String>,
    pub fields: Vec<FieldDef>,
    pub methods: Vec<MethodDef>,
}

impl EntityDef {
    pub fn field_names(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.name.clone()).collect()
    }

    pub fn method(&self, name: &str) -> Option<&MethodDef> {
        self.methods.iter().find(|m| m.name == name)
    }
}

/// One generated test: an entity method plus the input generator assigned
/// to each field and argument. Values are generator names; unknown names
/// pass through as literals at execution time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityTestTask {
    pub entity: String,
    pub method: String,
    pub field_dict: BTreeMap<String, String>,
    pub arg_dict: BTreeMap<String, String>,
}

impl fmt::Display for EntityTestTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<String> = self
            .field_dict
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        let args: Vec<String> = self
            .arg_dict
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        write!(
            f,
            "{}.{} fields={{{}}} args={{{}}}",
            self.entity,
            self.method,
            fields.join(", "),
            args.join(", ")
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskOutcome {
    Passed,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskResult {
    pub task: EntityTestTask,
    pub outcome: TaskOutcome,
    pub status: Option<u16>,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl TaskResult {
    pub fn passed(task: EntityTestTask, status: u16, message: String) -> Self {
        Self {
            task,
            outcome: TaskOutcome::Passed,
            status: Some(status),
            message,
            timestamp: Utc::now(),
        }
    }

    pub fn failed(task: EntityTestTask, status: Option<u16>, message: String) -> Self {
        Self {
            task,
            outcome: TaskOutcome::Failed,
            status,
            message,
            timestamp: Utc::now(),
        }
    }

    pub fn is_passed(&self) -> bool {
        self.outcome == TaskOutcome::Passed
    }
}

impl fmt::Display for TaskResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let outcome = match self.outcome {
            TaskOutcome::Passed => "PASSED",
            TaskOutcome::Failed => "FAILED",
        };
        let status = self
            .status
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string());
        write!(f, "{} [{}] {}", outcome, status, self.task)
    }
}
