use httpmock::prelude::*;
use rizza::{
    ApiClient, EntityRegistry, EntityTester, LogSink, ServerConfig, TaskResult, TestRunner,
};
use tempfile::TempDir;

fn target(url: String) -> ServerConfig {
    ServerConfig {
        url,
        auth: Some(("admin".to_string(), "changeme".to_string())),
        verify: false,
    }
}

fn exclude(methods: &[&str]) -> Vec<String> {
    methods.iter().map(|m| m.to_string()).collect()
}

#[tokio::test]
async fn test_end_to_end_brute_run_against_mock_server() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("session.log");

    let server = MockServer::start();
    let create_mock = server.mock(|when, then| {
        when.method(POST).path("/katello/api/v2/organizations");
        then.status(201)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({"id": 1, "name": "created"}));
    });

    let registry = EntityRegistry::builtin();
    let mut tester = EntityTester::new(&registry, "Organization").unwrap();
    // keep only create so every request hits one endpoint
    tester.prep(None, Some(&exclude(&["read", "update", "delete", "search"])));

    let tasks: Vec<_> = tester.brute_force(Some(1), Some(1)).collect();
    let expected = tasks.len();
    assert!(expected > 0);

    let client = ApiClient::new(&target(server.base_url()), registry).unwrap();
    let runner = TestRunner::new(client);
    let mut sink = LogSink::open(log_path.to_str().unwrap()).unwrap();

    let summary = runner.run(tasks, &mut sink).await.unwrap();

    assert_eq!(summary.total, expected);
    assert_eq!(summary.passed, expected);
    assert_eq!(summary.failed, 0);
    create_mock.assert_hits(expected);

    // every result lands in the log as one parseable JSON line
    let content = std::fs::read_to_string(&log_path).unwrap();
    assert_eq!(content.lines().count(), expected);
    for line in content.lines() {
        let result: TaskResult = serde_json::from_str(line).unwrap();
        assert!(result.is_passed());
        assert_eq!(result.status, Some(201));
        assert_eq!(result.task.entity, "Organization");
        assert_eq!(result.task.method, "create");
    }
}

#[tokio::test]
async fn test_brute_run_records_server_rejections() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("session.log");

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/katello/api/v2/products");
        then.status(422).body("Validation failed");
    });

    let registry = EntityRegistry::builtin();
    let mut tester = EntityTester::new(&registry, "Product").unwrap();
    tester.prep(
        Some(&exclude(&["label", "description"])),
        Some(&exclude(&["read", "update", "delete", "search"])),
    );

    let tasks: Vec<_> = tester.brute_force(None, Some(1)).collect();
    let expected = tasks.len();

    let client = ApiClient::new(&target(server.base_url()), registry).unwrap();
    let runner = TestRunner::new(client);
    let mut sink = LogSink::open(log_path.to_str().unwrap()).unwrap();

    let summary = runner.run(tasks, &mut sink).await.unwrap();

    // rejections are recorded outcomes, never aborts
    assert_eq!(summary.total, expected);
    assert_eq!(summary.passed, 0);
    assert_eq!(summary.failed, expected);

    let content = std::fs::read_to_string(&log_path).unwrap();
    let first: TaskResult = serde_json::from_str(content.lines().next().unwrap()).unwrap();
    assert_eq!(first.status, Some(422));
    assert!(first.message.contains("Validation failed"));
}

#[tokio::test]
async fn test_brute_run_against_unreachable_server() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("session.log");

    let registry = EntityRegistry::builtin();
    let mut tester = EntityTester::new(&registry, "Role").unwrap();
    tester.prep(None, Some(&exclude(&["read", "update", "delete", "search"])));

    let tasks: Vec<_> = tester.brute_force(Some(1), Some(1)).take(3).collect();

    // discard port, nothing listens
    let client = ApiClient::new(&target("http://127.0.0.1:9".to_string()), registry).unwrap();
    let runner = TestRunner::new(client);
    let mut sink = LogSink::open(log_path.to_str().unwrap()).unwrap();

    let summary = runner.run(tasks, &mut sink).await.unwrap();

    assert_eq!(summary.total, 3);
    assert_eq!(summary.failed, 3);

    let content = std::fs::read_to_string(&log_path).unwrap();
    let first: TaskResult = serde_json::from_str(content.lines().next().unwrap()).unwrap();
    assert_eq!(first.status, None);
}

#[tokio::test]
async fn test_replayed_tasks_hit_the_same_endpoints() {
    let temp_dir = TempDir::new().unwrap();
    let task_path = temp_dir.path().join("tasks.json");
    let log_path = temp_dir.path().join("session.log");

    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/api/v2/domains");
        then.status(200).json_body(serde_json::json!({"id": 7}));
    });

    let registry = EntityRegistry::builtin();
    let mut tester = EntityTester::new(&registry, "Domain").unwrap();
    tester.prep(None, Some(&exclude(&["read", "update", "delete", "search"])));

    let count = rizza::TaskManager::export_tasks(
        task_path.to_str().unwrap(),
        tester.brute_force(Some(1), Some(1)),
    )
    .unwrap();

    let imported = rizza::TaskManager::import_tasks(task_path.to_str().unwrap()).unwrap();
    assert_eq!(imported.len(), count);

    let client = ApiClient::new(&target(server.base_url()), registry).unwrap();
    let runner = TestRunner::new(client);
    let mut sink = LogSink::open(log_path.to_str().unwrap()).unwrap();

    let summary = runner.run(imported, &mut sink).await.unwrap();

    assert_eq!(summary.total, count);
    assert_eq!(summary.passed, count);
    mock.assert_hits(count);
}
