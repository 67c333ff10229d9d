use std::fs;
use std::sync::Arc;

use serde_json::json;

use super::facility_in;
use crate::logging::error::LogError;
use crate::logging::facility::{LogFacility, LogFacilityConfig, LoggerSpec};
use crate::logging::level::LogLevel;
use wd_shared::{LoggingConfig, RotationPolicy};

#[test]
fn test_same_spec_returns_cached_handle() {
    let dir = tempfile::tempdir().unwrap();
    let facility = facility_in(dir.path());

    let first = facility.get_logger(LoggerSpec::new("billing")).unwrap();
    let second = facility.get_logger(LoggerSpec::new("billing")).unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(facility.cached_loggers(), 1);
}

#[test]
fn test_differing_spec_builds_new_handle() {
    let dir = tempfile::tempdir().unwrap();
    let facility = facility_in(dir.path());

    let info = facility.get_logger(LoggerSpec::new("billing")).unwrap();
    let debug = facility
        .get_logger(LoggerSpec::new("billing").level(LogLevel::Debug))
        .unwrap();

    assert!(!Arc::ptr_eq(&info, &debug));
    assert_eq!(facility.cached_loggers(), 2);
}

#[test]
fn test_default_directory_replaces_dashes() {
    let dir = tempfile::tempdir().unwrap();
    let facility = facility_in(dir.path());

    let logger = facility.logger("sync-users").unwrap();

    assert_eq!(logger.directory(), dir.path().join("sync_users"));
    assert!(dir.path().join("sync_users").is_dir());
    assert_eq!(logger.general_path(), dir.path().join("sync_users/sync-users.log"));
    assert_eq!(logger.error_path(), dir.path().join("sync_users/sync-users-errors.log"));
}

#[test]
fn test_presets() {
    let dir = tempfile::tempdir().unwrap();
    let facility = facility_in(dir.path());

    let scheduler = facility.scheduler().unwrap();
    assert_eq!(scheduler.name(), "scheduler");
    assert_eq!(scheduler.directory(), dir.path().join("cron"));
    assert_eq!((scheduler.retention_days(), scheduler.max_files()), (10, 10));
    assert_eq!(scheduler.level(), LogLevel::Info);

    let task = facility.task("reindex").unwrap();
    assert_eq!(task.name(), "task-reindex");
    assert_eq!(task.directory(), dir.path().join("tasks"));

    let api = facility.api().unwrap();
    assert_eq!(api.name(), "api-requests");
    assert_eq!(api.directory(), dir.path().join("api"));
    assert_eq!((api.retention_days(), api.max_files()), (30, 15));
    assert_eq!(api.level(), LogLevel::Debug);

    let integration = facility.integration("stripe").unwrap();
    assert_eq!(integration.name(), "integration-stripe");
    assert_eq!(integration.directory(), dir.path().join("integrations"));
    assert_eq!((integration.retention_days(), integration.max_files()), (15, 10));

    let errors = facility.errors().unwrap();
    assert_eq!(errors.directory(), dir.path().join("errors"));
    assert_eq!((errors.retention_days(), errors.max_files()), (30, 20));
    assert_eq!(errors.level(), LogLevel::Warning);

    assert_eq!(facility.cached_loggers(), 5);
}

#[test]
fn test_clear_cache_keeps_held_handles_usable() {
    let dir = tempfile::tempdir().unwrap();
    let facility = facility_in(dir.path());

    let held = facility.logger("jobs").unwrap();
    facility.clear_cache();
    assert_eq!(facility.cached_loggers(), 0);

    held.info("still writing", json!({}));
    let rebuilt = facility.logger("jobs").unwrap();

    assert!(!Arc::ptr_eq(&held, &rebuilt));
    let content = fs::read_to_string(held.general_path()).unwrap();
    assert!(content.contains("still writing"));
}

#[test]
fn test_general_sink_respects_level() {
    let dir = tempfile::tempdir().unwrap();
    let facility = facility_in(dir.path());
    let logger = facility
        .get_logger(LoggerSpec::new("quiet").level(LogLevel::Warning))
        .unwrap();

    logger.info("dropped", json!({}));
    logger.warning("kept", json!({ "attempt": 2 }));

    let content = fs::read_to_string(logger.general_path()).unwrap();
    assert!(!content.contains("dropped"));
    assert!(content.contains("quiet.WARNING: kept {\"attempt\":2}"));
    assert!(content.contains("\"process_id\""));
    assert!(content.contains("\"memory_usage\""));
}

#[test]
fn test_error_sink_only_receives_errors() {
    let dir = tempfile::tempdir().unwrap();
    let facility = facility_in(dir.path());
    let logger = facility.logger("payments").unwrap();

    logger.info("charge created", json!({}));
    logger.warning("charge slow", json!({}));
    logger.error("charge failed", json!({ "id": "ch_1" }));
    logger.critical("gateway down", json!({}));

    let general = fs::read_to_string(logger.general_path()).unwrap();
    assert_eq!(general.lines().count(), 4);

    let errors = fs::read_to_string(logger.error_path()).unwrap();
    assert!(!errors.contains("charge created"));
    assert!(!errors.contains("charge slow"));
    assert!(errors.contains("payments.ERROR: charge failed\nContext: {\"id\":\"ch_1\"}"));
    assert!(errors.contains("payments.CRITICAL: gateway down"));
    assert_eq!(errors.matches(&"-".repeat(80)).count(), 2);
}

#[test]
fn test_directory_creation_failure_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("occupied");
    fs::write(&blocker, "not a directory").unwrap();
    let facility = facility_in(dir.path());

    let result = facility.get_logger(LoggerSpec::new("broken").in_directory(blocker.join("logs")));

    assert!(matches!(result, Err(LogError::CreateDirectory { .. })));
    assert_eq!(facility.cached_loggers(), 0);
}

#[test]
fn test_max_files_is_clamped() {
    let dir = tempfile::tempdir().unwrap();
    let facility = facility_in(dir.path());

    let logger = facility.get_logger(LoggerSpec::new("tiny").max_files(0)).unwrap();

    assert_eq!(logger.max_files(), 1);
}

#[test]
fn test_config_from_logging_settings() {
    let logging = LoggingConfig {
        rotation: RotationPolicy::Hourly,
        default_level: "notice".to_string(),
        default_max_files: 3,
        ..Default::default()
    };

    let config = LogFacilityConfig::from_logging(&logging).unwrap();
    assert_eq!(config.rotation, RotationPolicy::Hourly);
    assert_eq!(config.default_level, LogLevel::Notice);

    let facility = LogFacility::new(config);
    let spec = facility.spec("reports");
    assert_eq!(spec.max_files, 3);
    assert_eq!(spec.level, LogLevel::Notice);

    let invalid = LoggingConfig {
        default_level: "loud".to_string(),
        ..Default::default()
    };
    assert!(matches!(
        LogFacilityConfig::from_logging(&invalid),
        Err(LogError::InvalidLevel { .. })
    ));
}

#[test]
fn test_daily_rotation_uses_dated_file_names() {
    let dir = tempfile::tempdir().unwrap();
    let facility = LogFacility::new(LogFacilityConfig::new(dir.path()));
    let logger = facility.logger("rolling").unwrap();

    logger.info("dated", json!({}));

    let name = logger.general_path().file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("rolling.20"));
    assert!(name.ends_with(".log"));
}
