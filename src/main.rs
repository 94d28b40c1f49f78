use clap::Parser;
use rizza::config::server::DEFAULT_LABEL;
use rizza::config::{BruteArgs, Cli, Command, ConfigArgs, ListArgs, ListKind};
use rizza::core::inputs;
use rizza::utils::error::ErrorSeverity;
use rizza::utils::validation::{validate_required_field, Validate};
use rizza::utils::logger;
use rizza::{
    ApiClient, EntityRegistry, EntityTester, EntityTestTask, LogSink, ProjectConfig, RizzaError,
    ServerConfig, TaskManager, TestRunner,
};
use std::path::Path;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // 初始化日誌
    if std::env::var("RIZZA_LOG_FORMAT").as_deref() == Ok("json") {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting rizza");

    let outcome = match cli.command {
        Command::Brute(args) => run_brute(args).await,
        Command::Config(args) => run_config(args),
        Command::List(args) => run_list(args),
    };

    if let Err(e) = outcome {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        // 根據錯誤嚴重程度決定退出碼
        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };

        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

fn load_registry(entity_file: Option<&str>) -> rizza::Result<EntityRegistry> {
    match entity_file {
        Some(path) => EntityRegistry::from_file(path),
        None => Ok(EntityRegistry::builtin()),
    }
}

async fn run_brute(mut args: BruteArgs) -> rizza::Result<()> {
    // rizza.toml 提供預設值，命令列優先
    if let Some(project) = ProjectConfig::load_default()? {
        project.validate()?;
        apply_project_defaults(&mut args, &project);
        tracing::debug!("Applied defaults from rizza.toml");
    }
    args.validate()?;

    let registry = load_registry(args.entity_file.as_deref())?;

    if let Some(import_path) = &args.import_path {
        let tasks = TaskManager::import_tasks(import_path)?;
        tracing::info!("Imported {} test tasks from {}", tasks.len(), import_path);
        return execute_tasks(&args, registry, tasks).await;
    }

    let entity_names = expand_entities(&registry, args.entities.as_deref().unwrap_or(&[]));
    tracing::info!("Generating test tasks for {} entity(s)", entity_names.len());

    let mut streams = Vec::new();
    for name in &entity_names {
        let mut tester = EntityTester::new(&registry, name)?;
        tester.prep(args.field_exclude.as_deref(), args.method_exclude.as_deref());
        streams.push(tester.brute_force(args.max_fields, args.max_inputs));
    }
    let tasks = streams.into_iter().flatten();

    if let Some(output_path) = &args.output_path {
        let count = TaskManager::export_tasks(output_path, tasks)?;
        tracing::info!("Exported {} test tasks", count);
        println!("✅ Exported {} test tasks to {}", count, output_path);
        return Ok(());
    }

    execute_tasks(&args, registry, tasks).await
}

async fn execute_tasks<I>(args: &BruteArgs, registry: EntityRegistry, tasks: I) -> rizza::Result<()>
where
    I: IntoIterator<Item = EntityTestTask>,
{
    let server = ServerConfig::auto_load(
        args.label.as_deref().unwrap_or(DEFAULT_LABEL),
        args.config_path.as_deref().map(Path::new),
    )?;
    if server.url.is_empty() {
        return Err(RizzaError::MissingConfigError {
            field: "target url".to_string(),
        });
    }
    tracing::info!("Target server: {}", server.url);

    if args.monitor {
        tracing::info!("🔍 System monitoring enabled");
    }

    let log_spec = args.log_path.clone().unwrap_or_else(default_log_path);
    let mut sink = LogSink::open(&log_spec)?;

    let client = ApiClient::new(&server, registry)?;
    let runner = TestRunner::new_with_monitoring(client, args.monitor);
    let summary = runner.run(tasks, &mut sink).await?;

    println!("✅ Brute force run completed!");
    println!(
        "📁 {} tasks, {} passed, {} failed (results: {})",
        summary.total,
        summary.passed,
        summary.failed,
        sink.description()
    );
    Ok(())
}

fn default_log_path() -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    format!("session{}.log", &id[..8])
}

fn expand_entities(registry: &EntityRegistry, requested: &[String]) -> Vec<String> {
    if requested.iter().any(|e| e.eq_ignore_ascii_case("all")) {
        registry.names()
    } else {
        requested.to_vec()
    }
}

fn apply_project_defaults(args: &mut BruteArgs, project: &ProjectConfig) {
    if let Some(brute) = &project.brute {
        if args.entities.is_none() {
            args.entities = brute.entities.clone();
        }
        if args.max_fields.is_none() {
            args.max_fields = brute.max_fields;
        }
        if args.max_inputs.is_none() {
            args.max_inputs = brute.max_inputs;
        }
        if args.field_exclude.is_none() {
            args.field_exclude = brute.field_exclude.clone();
        }
        if args.method_exclude.is_none() {
            args.method_exclude = brute.method_exclude.clone();
        }
        if args.log_path.is_none() {
            args.log_path = brute.log_path.clone();
        }
    }
    if let Some(target) = &project.target {
        if args.label.is_none() {
            args.label = target.label.clone();
        }
        if args.config_path.is_none() {
            args.config_path = target.config_path.clone();
        }
    }
}

fn run_config(args: ConfigArgs) -> rizza::Result<()> {
    args.validate()?;
    let path = args.path.as_deref().map(Path::new);

    if args.show {
        match ServerConfig::get(&args.label, path) {
            Ok(config) => println!("{}", serde_json::to_string_pretty(&config)?),
            Err(e) => println!("No saved configuration: {}", e),
        }
    }

    if args.clear {
        ServerConfig::default().save(&args.label, path)?;
        tracing::info!("Cleared configuration under label '{}'", args.label);
    }

    let mut config = match ServerConfig::get(&args.label, path) {
        Ok(config) => config,
        Err(_) => {
            if args.user.is_none() || args.password.is_none() || args.target.is_none() {
                return Err(RizzaError::ConfigError {
                    message: "unable to find a saved configuration; \
                              specify a user, password, and target"
                        .to_string(),
                });
            }
            ServerConfig::default()
        }
    };

    if !config.merge_credentials(args.user.as_deref(), args.password.as_deref()) {
        println!("Couldn't set the auth. Pass a user and password.");
    }
    if let Some(target) = &args.target {
        config.url = target.clone();
    }
    config.verify = args.verify;
    config.save(&args.label, path)?;
    println!("Server config saved.");
    Ok(())
}

fn run_list(args: ListArgs) -> rizza::Result<()> {
    let registry = load_registry(args.entity_file.as_deref())?;

    match args.kind {
        ListKind::Entities => {
            for name in registry.names() {
                println!("{}", name);
            }
        }
        ListKind::Inputs => {
            for name in inputs::input_names(None) {
                println!("{}", name);
            }
        }
        ListKind::Fields | ListKind::Methods => {
            let name = validate_required_field("entity", &args.entity)?;
            let entity = registry
                .get(name)
                .ok_or_else(|| RizzaError::UnknownEntityError { name: name.clone() })?;

            if args.kind == ListKind::Fields {
                for field in &entity.fields {
                    println!("{} ({:?})", field.name, field.kind);
                }
            } else {
                for method in &entity.methods {
                    println!("{}({})", method.name, method.args.join(", "));
                }
            }
        }
    }

    Ok(())
}
