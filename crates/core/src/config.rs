//! 설정 관리 — evewatch.toml 파싱 및 런타임 설정
//!
//! [`EvewatchConfig`]는 모든 크레이트의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`EVEWATCH_INGEST_EVE_PATH=/var/log/suricata/eve.json` 형식)
//! 3. 설정 파일 (`evewatch.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), evewatch_core::error::EvewatchError> {
//! use evewatch_core::config::EvewatchConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = EvewatchConfig::load("evewatch.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = EvewatchConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::{Component, Path};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, EvewatchError};

/// Evewatch 통합 설정
///
/// `evewatch.toml` 파일의 최상위 구조를 나타냅니다.
/// 각 크레이트는 자기 섹션만 읽어 사용합니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvewatchConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 수집 파이프라인 설정
    #[serde(default)]
    pub ingest: IngestConfig,
    /// 쿼리 경계 설정
    #[serde(default)]
    pub query: QueryConfig,
    /// 메트릭 설정
    #[serde(default)]
    pub metrics: MetricsConfig,
}

impl EvewatchConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, EvewatchError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, EvewatchError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                EvewatchError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                EvewatchError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, EvewatchError> {
        toml::from_str(toml_str).map_err(|e| {
            EvewatchError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `EVEWATCH_{SECTION}_{FIELD}`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "EVEWATCH_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "EVEWATCH_GENERAL_LOG_FORMAT");

        // Ingest
        override_bool(&mut self.ingest.enabled, "EVEWATCH_INGEST_ENABLED");
        override_string(&mut self.ingest.eve_path, "EVEWATCH_INGEST_EVE_PATH");
        override_u64(
            &mut self.ingest.poll_interval_ms,
            "EVEWATCH_INGEST_POLL_INTERVAL_MS",
        );
        override_usize(
            &mut self.ingest.max_line_length,
            "EVEWATCH_INGEST_MAX_LINE_LENGTH",
        );

        // Query
        override_usize(&mut self.query.recent_limit, "EVEWATCH_QUERY_RECENT_LIMIT");
        override_usize(&mut self.query.top_groups, "EVEWATCH_QUERY_TOP_GROUPS");
        override_usize(
            &mut self.query.max_recent_limit,
            "EVEWATCH_QUERY_MAX_RECENT_LIMIT",
        );

        // Metrics
        override_bool(&mut self.metrics.enabled, "EVEWATCH_METRICS_ENABLED");
        override_string(&mut self.metrics.listen_addr, "EVEWATCH_METRICS_LISTEN_ADDR");
        override_u16(&mut self.metrics.port, "EVEWATCH_METRICS_PORT");
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), EvewatchError> {
        // log_level 검증
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        // log_format 검증
        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        if self.ingest.enabled {
            Self::validate_eve_path(&self.ingest.eve_path)?;

            if self.ingest.poll_interval_ms == 0 {
                return Err(ConfigError::InvalidValue {
                    field: "ingest.poll_interval_ms".to_owned(),
                    reason: "must be greater than zero".to_owned(),
                }
                .into());
            }

            if self.ingest.max_line_length == 0 {
                return Err(ConfigError::InvalidValue {
                    field: "ingest.max_line_length".to_owned(),
                    reason: "must be greater than zero".to_owned(),
                }
                .into());
            }
        }

        if self.query.recent_limit == 0 || self.query.top_groups == 0 {
            return Err(ConfigError::InvalidValue {
                field: "query".to_owned(),
                reason: "recent_limit and top_groups must be greater than zero".to_owned(),
            }
            .into());
        }

        if self.query.recent_limit > self.query.max_recent_limit {
            return Err(ConfigError::InvalidValue {
                field: "query.recent_limit".to_owned(),
                reason: format!("must not exceed max_recent_limit ({})", self.query.max_recent_limit),
            }
            .into());
        }

        Ok(())
    }

    /// 감시 파일 경로가 안전한지 검증합니다 (path traversal 방지).
    fn validate_eve_path(path_str: &str) -> Result<(), EvewatchError> {
        if path_str.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "ingest.eve_path".to_owned(),
                reason: "must not be empty".to_owned(),
            }
            .into());
        }

        let path = Path::new(path_str);

        if path.components().any(|c| c == Component::ParentDir) {
            return Err(ConfigError::InvalidValue {
                field: "ingest.eve_path".to_owned(),
                reason: "must not contain '..' components".to_owned(),
            }
            .into());
        }

        if !path.is_absolute() {
            return Err(ConfigError::InvalidValue {
                field: "ingest.eve_path".to_owned(),
                reason: "must be an absolute path".to_owned(),
            }
            .into());
        }

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "json".to_owned(),
        }
    }
}

/// 수집 파이프라인 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// 활성화 여부
    pub enabled: bool,
    /// 감시할 eve.json 파일 경로
    pub eve_path: String,
    /// EOF에서의 폴링 주기 (밀리초)
    pub poll_interval_ms: u64,
    /// 최대 라인 길이 (바이트). 초과 라인은 버려집니다.
    pub max_line_length: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            eve_path: "/var/log/suricata/eve.json".to_owned(),
            poll_interval_ms: 100,
            max_line_length: 64 * 1024, // 64KB
        }
    }
}

/// 쿼리 경계 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// 최근 알림 목록의 기본 상한
    pub recent_limit: usize,
    /// top-N 집계의 그룹 수
    pub top_groups: usize,
    /// 호출자가 요청할 수 있는 최대 limit
    pub max_recent_limit: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            recent_limit: 100,
            top_groups: 5,
            max_recent_limit: 1000,
        }
    }
}

/// 메트릭 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Prometheus 익스포터 활성화 여부
    pub enabled: bool,
    /// 익스포터 수신 주소
    pub listen_addr: String,
    /// 익스포터 HTTP 포트
    pub port: u16,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            listen_addr: "127.0.0.1".to_owned(),
            port: 9184,
        }
    }
}

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}

fn override_usize(target: &mut usize, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<usize>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse usize from env var, ignoring"
            ),
        }
    }
}

fn override_u64(target: &mut u64, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u64>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u64 from env var, ignoring"
            ),
        }
    }
}

fn override_u16(target: &mut u16, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u16>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u16 from env var, ignoring"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_sane_values() {
        let config = EvewatchConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.ingest.eve_path, "/var/log/suricata/eve.json");
        assert_eq!(config.ingest.poll_interval_ms, 100);
        assert_eq!(config.query.recent_limit, 100);
        assert_eq!(config.query.top_groups, 5);
        config.validate().expect("default config must be valid");
    }

    #[test]
    fn parse_partial_toml_fills_defaults() {
        let config = EvewatchConfig::parse(
            "[ingest]\neve_path = \"/var/log/suricata/eve.json\"\npoll_interval_ms = 50\n",
        )
        .unwrap();
        assert_eq!(config.ingest.poll_interval_ms, 50);
        assert_eq!(config.general.log_format, "json");
    }

    #[test]
    fn parse_rejects_invalid_toml() {
        let err = EvewatchConfig::parse("[ingest\n").unwrap_err();
        assert!(matches!(
            err,
            EvewatchError::Config(ConfigError::ParseFailed { .. })
        ));
    }

    #[test]
    fn validate_rejects_invalid_log_level() {
        let mut config = EvewatchConfig::default();
        config.general.log_level = "verbose".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("log_level"));
    }

    #[test]
    fn validate_rejects_invalid_log_format() {
        let mut config = EvewatchConfig::default();
        config.general.log_format = "xml".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("log_format"));
    }

    #[test]
    fn validate_rejects_zero_poll_interval() {
        let mut config = EvewatchConfig::default();
        config.ingest.poll_interval_ms = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("poll_interval_ms"));
    }

    #[test]
    fn validate_rejects_relative_eve_path() {
        let mut config = EvewatchConfig::default();
        config.ingest.eve_path = "logs/eve.json".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("eve_path"));
    }

    #[test]
    fn validate_rejects_parent_dir_in_eve_path() {
        let mut config = EvewatchConfig::default();
        config.ingest.eve_path = "/var/log/../etc/passwd".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("eve_path"));
    }

    #[test]
    fn validate_accepts_bad_ingest_values_when_disabled() {
        let mut config = EvewatchConfig::default();
        config.ingest.enabled = false;
        config.ingest.eve_path = String::new();
        config.validate().expect("disabled section is not validated");
    }

    #[test]
    fn validate_rejects_recent_limit_above_max() {
        let mut config = EvewatchConfig::default();
        config.query.recent_limit = 5000;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("recent_limit"));
    }
}
