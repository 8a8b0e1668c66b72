use linguist_logger::{LoggerConfig, LoggerError, prune_logs};
use std::fs::File;
use std::path::Path;
use std::time::Duration;

fn fresh_dir(dir: &str) {
    if Path::new(dir).exists() {
        std::fs::remove_dir_all(dir).unwrap();
    }
    std::fs::create_dir_all(dir).unwrap();
}

fn list(dir: &str) -> Vec<String> {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect()
}

#[test]
fn test_prune_logs_keeps_newest() {
    let dir = "./target/prune_logs_test";
    fresh_dir(dir);

    let prefix = "catalog.log";
    for date in ["2023-10-20", "2023-10-21", "2023-10-22", "2023-10-23"] {
        File::create(format!("{}/{}.{}", dir, prefix, date)).unwrap();
    }
    File::create(format!("{}/unrelated.txt", dir)).unwrap();

    let removed = prune_logs(Path::new(dir), prefix, 2);
    assert_eq!(removed, 2);

    let files = list(dir);
    assert!(files.contains(&format!("{prefix}.2023-10-23")));
    assert!(files.contains(&format!("{prefix}.2023-10-22")));
    assert!(!files.contains(&format!("{prefix}.2023-10-21")));
    assert!(files.contains(&"unrelated.txt".to_string()));

    assert_eq!(prune_logs(Path::new("./target/no_such_log_dir"), prefix, 1), 0);
}

#[test]
fn test_invalid_filter_is_reported() {
    let err = LoggerConfig::new()
        .level("linguist_core=loudest")
        .enable_file(false)
        .init()
        .unwrap_err();
    assert!(matches!(err, LoggerError::InvalidFilter { .. }));
}

#[test]
fn test_config_from_yaml() {
    let yaml = r#"
log_dir: ./target/yaml_logs
file_prefix: viewer.log
level: ${LINGUIST_LOGGER_TEST_LEVEL:warn}
max_files: 5
"#;
    let config: LoggerConfig = linguist_core::yaml::load_from_str(yaml).unwrap();
    let debug = format!("{config:?}");
    assert!(debug.contains("viewer.log"));
    assert!(debug.contains("level: \"warn\""));
    assert!(debug.contains("max_files: Some(5)"));
    // 未给出的字段取默认值
    assert!(debug.contains("console: true"));
}

#[test]
fn test_init_cleans_up_and_rejects_second_init() {
    let dir = "./target/init_cleanup_logs";
    fresh_dir(dir);

    let prefix = "init_test.log";
    for date in ["2023-10-20", "2023-10-21", "2023-10-22", "2023-10-23", "2023-10-24"] {
        File::create(format!("{}/{}.{}", dir, prefix, date)).unwrap();
    }

    let _guard = LoggerConfig::new()
        .log_dir(dir)
        .file_prefix(prefix)
        .max_files(3)
        .cleanup_interval(Duration::from_secs(0))
        .enable_console(false)
        .init()
        .unwrap();

    // 初始化时同步清理
    let files = list(dir);
    assert!(!files.contains(&format!("{prefix}.2023-10-20")));
    assert!(files.contains(&format!("{prefix}.2023-10-24")));

    tracing::info!("logger initialized");

    let second = LoggerConfig::new().enable_file(false).init();
    assert!(matches!(second, Err(LoggerError::AlreadyInitialized)));
}
