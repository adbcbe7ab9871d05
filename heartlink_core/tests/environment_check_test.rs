use async_trait::async_trait;
use heartlink_core::{
    format_plain_text, run_environment_check, save_report, CommandOutcome, CommandRunner,
    DiagnosticEngine, DoctorConfig, StatusKind,
};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

struct AllPresentRunner;

#[async_trait]
impl CommandRunner for AllPresentRunner {
    async fn run(&self, argv: &[String], _timeout: Duration) -> CommandOutcome {
        match argv.first().map(String::as_str) {
            Some("node") => CommandOutcome::success("v20.11.0"),
            Some("npm") => CommandOutcome::success("10.2.4"),
            Some("python3") => CommandOutcome::success("pip 23.2.1"),
            _ => CommandOutcome::failure("not installed"),
        }
    }
}

fn setup_project() -> (TempDir, DoctorConfig) {
    let root = TempDir::new().unwrap();
    let mut config = DoctorConfig::for_project_root(root.path());
    config.gpu.driver_root = root.path().join("no-driver");
    (root, config)
}

#[tokio::test]
async fn test_check_writes_report_into_data_directory() {
    let (root, config) = setup_project();
    let engine = DiagnosticEngine::new(&config, Arc::new(AllPresentRunner));

    let report = run_environment_check(&config, &engine).await.unwrap();
    assert!(root.path().join("data").is_dir());

    let saved_to = save_report(&config, &report).await.unwrap();
    assert!(saved_to.ends_with("data/env_report.txt"));

    let written = std::fs::read_to_string(&saved_to).unwrap();
    assert!(written.starts_with("HeartLink Environment Report\n"));

    let body: Vec<&str> = written.lines().skip(3).collect();
    assert_eq!(
        body,
        [
            format!("system: [OK] {}", report.get("system").unwrap().detail()),
            format!("runtime: [OK] {}", report.get("runtime").unwrap().detail()),
            "node: [OK] v20.11.0".to_string(),
            "npm: [OK] 10.2.4".to_string(),
            "pip: [OK] pip 23.2.1".to_string(),
            format!("gpu: [WARN] {}", report.get("gpu").unwrap().detail()),
            "secrets_file: [WARN] no .env file found, copy .env.example and fill in the keys".to_string(),
            "summary: [WARN] some checks produced warnings, review recommendations".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_repeated_checks_overwrite_the_report() {
    let (root, config) = setup_project();
    let engine = DiagnosticEngine::new(&config, Arc::new(AllPresentRunner));

    let first = run_environment_check(&config, &engine).await.unwrap();
    assert_eq!(first.overall_status(), StatusKind::Warn);
    let first_path = save_report(&config, &first).await.unwrap();

    std::fs::write(root.path().join(".env"), "OPENAI_API_KEY=sk-live\n").unwrap();
    let second = run_environment_check(&config, &engine).await.unwrap();
    let second_path = save_report(&config, &second).await.unwrap();

    assert_eq!(first_path, second_path);
    assert_eq!(second.get("secrets_file").unwrap().status(), StatusKind::Ok);

    let written = std::fs::read_to_string(&second_path).unwrap();
    assert!(written.contains("secrets_file: [OK] OPENAI_API_KEY is set"));
    assert_eq!(written.matches("HeartLink Environment Report").count(), 1);
}

#[tokio::test]
async fn test_real_runner_never_aborts_the_run() {
    let (_root, mut config) = setup_project();
    config.commands.python = "heartlink-missing-python".to_string();
    config.commands.gpu_tool = "heartlink-missing-gpu-tool".to_string();

    let report = DiagnosticEngine::from_config(&config).run().await;

    assert_eq!(
        report.names(),
        ["system", "runtime", "node", "npm", "pip", "gpu", "secrets_file", "summary"]
    );
    assert_eq!(report.get("pip").unwrap().status(), StatusKind::Fail);
    assert_eq!(report.get("gpu").unwrap().status(), StatusKind::Warn);
    assert_eq!(report.overall_status(), StatusKind::Fail);
}

#[tokio::test]
async fn test_report_survives_an_unwritable_report_file() {
    let (root, config) = setup_project();
    std::fs::create_dir_all(root.path().join("data").join("env_report.txt")).unwrap();
    let engine = DiagnosticEngine::new(&config, Arc::new(AllPresentRunner));

    let report = run_environment_check(&config, &engine).await.unwrap();
    assert_eq!(report.names().len(), 8);
    assert!(format_plain_text(&report).contains("pip: [OK] pip 23.2.1"));

    assert!(save_report(&config, &report).await.is_err());
    assert!(root.path().join("data").join("env_report.txt").is_dir());
}
