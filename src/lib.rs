pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{BruteArgs, Cli, Command, ConfigArgs, ListArgs, ListKind};

pub use config::project::ProjectConfig;
pub use config::server::ServerConfig;
pub use core::client::ApiClient;
pub use core::registry::EntityRegistry;
pub use core::runner::{RunSummary, TestRunner};
pub use core::task_manager::{LogSink, TaskManager};
pub use core::tester::EntityTester;
pub use domain::model::{EntityDef, EntityTestTask, TaskOutcome, TaskResult};
pub use domain::ports::{TargetProvider, TaskExecutor};
pub use utils::error::{Result, RizzaError};
