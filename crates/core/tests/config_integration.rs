//! evewatch.toml 통합 설정 테스트
//!
//! - evewatch.toml.example 파싱 테스트
//! - 부분 설정 (일부 섹션만) 로딩 테스트
//! - 파일 로딩 에러 테스트

use evewatch_core::config::EvewatchConfig;
use evewatch_core::error::{ConfigError, EvewatchError};

// =============================================================================
// evewatch.toml.example 파싱 테스트
// =============================================================================

#[test]
fn example_config_parses_successfully() {
    let content = include_str!("../../../evewatch.toml.example");
    let config = EvewatchConfig::parse(content).expect("example config should parse");

    assert_eq!(config.general.log_level, "info");
    assert_eq!(config.general.log_format, "json");
}

#[test]
fn example_config_passes_validation() {
    let content = include_str!("../../../evewatch.toml.example");
    let config = EvewatchConfig::parse(content).expect("should parse");
    config
        .validate()
        .expect("example config should pass validation");
}

#[test]
fn example_config_has_correct_ingest_defaults() {
    let content = include_str!("../../../evewatch.toml.example");
    let config = EvewatchConfig::parse(content).expect("should parse");

    assert!(config.ingest.enabled);
    assert_eq!(config.ingest.eve_path, "/var/log/suricata/eve.json");
    assert_eq!(config.ingest.poll_interval_ms, 100);
    assert_eq!(config.ingest.max_line_length, 65536);
}

#[test]
fn example_config_has_correct_query_defaults() {
    let content = include_str!("../../../evewatch.toml.example");
    let config = EvewatchConfig::parse(content).expect("should parse");

    assert_eq!(config.query.recent_limit, 100);
    assert_eq!(config.query.top_groups, 5);
    assert_eq!(config.query.max_recent_limit, 1000);
}

#[test]
fn example_config_matches_programmatic_defaults() {
    // 예시 파일과 Default 구현이 어긋나면 운영 문서가 거짓말을 하게 됩니다
    let content = include_str!("../../../evewatch.toml.example");
    let parsed = EvewatchConfig::parse(content).expect("should parse");
    let defaults = EvewatchConfig::default();

    assert_eq!(parsed.ingest.eve_path, defaults.ingest.eve_path);
    assert_eq!(parsed.ingest.poll_interval_ms, defaults.ingest.poll_interval_ms);
    assert_eq!(parsed.query.recent_limit, defaults.query.recent_limit);
    assert_eq!(parsed.query.top_groups, defaults.query.top_groups);
    assert_eq!(parsed.metrics.enabled, defaults.metrics.enabled);
}

// =============================================================================
// 부분 설정 로딩
// =============================================================================

#[test]
fn empty_toml_yields_defaults() {
    let config = EvewatchConfig::parse("").expect("empty config should parse");
    assert_eq!(config.general.log_level, "info");
    assert!(config.ingest.enabled);
}

#[test]
fn single_section_overrides_only_that_section() {
    let config = EvewatchConfig::parse("[query]\ntop_groups = 10\n").expect("should parse");
    assert_eq!(config.query.top_groups, 10);
    assert_eq!(config.query.recent_limit, 100);
    assert_eq!(config.ingest.poll_interval_ms, 100);
}

// =============================================================================
// 파일 로딩 에러
// =============================================================================

#[tokio::test]
async fn missing_file_is_a_config_error() {
    let err = EvewatchConfig::from_file("/nonexistent/evewatch.toml")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        EvewatchError::Config(ConfigError::FileNotFound { .. })
    ));
}

#[tokio::test]
async fn load_applies_validation() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("evewatch.toml");
    tokio::fs::write(&path, "[general]\nlog_level = \"verbose\"\n")
        .await
        .expect("write config");

    let err = EvewatchConfig::from_file(&path).await.unwrap_err();
    assert!(err.to_string().contains("log_level"));
}
