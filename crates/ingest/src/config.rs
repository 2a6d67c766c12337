//! 수집 파이프라인 설정
//!
//! [`IngestPipelineConfig`]는 core의
//! [`IngestConfig`](evewatch_core::config::IngestConfig)에서 파생되며,
//! 파이프라인 내부에서 쓰기 좋은 타입(`PathBuf`, `Duration`)으로
//! 변환해 둡니다.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::IngestError;

/// 수집 파이프라인 설정
#[derive(Debug, Clone)]
pub struct IngestPipelineConfig {
    /// 감시할 eve.json 파일 경로
    pub eve_path: PathBuf,
    /// EOF에서의 폴링 주기
    pub poll_interval: Duration,
    /// 최대 라인 길이 (바이트)
    pub max_line_length: usize,
}

impl Default for IngestPipelineConfig {
    fn default() -> Self {
        Self::from_core(&evewatch_core::config::IngestConfig::default())
    }
}

impl IngestPipelineConfig {
    /// core의 `IngestConfig`에서 파이프라인 설정을 생성합니다.
    pub fn from_core(core: &evewatch_core::config::IngestConfig) -> Self {
        Self {
            eve_path: PathBuf::from(&core.eve_path),
            poll_interval: Duration::from_millis(core.poll_interval_ms),
            max_line_length: core.max_line_length,
        }
    }

    /// 설정값의 유효성을 검증합니다.
    ///
    /// core의 `validate()`를 거치지 않고 직접 조립된 설정(테스트 등)도
    /// 같은 제약을 지키도록 빌더에서 호출됩니다.
    pub fn validate(&self) -> Result<(), IngestError> {
        if self.eve_path.as_os_str().is_empty() {
            return Err(IngestError::Config {
                field: "eve_path".to_owned(),
                reason: "must not be empty".to_owned(),
            });
        }

        if self.poll_interval.is_zero() {
            return Err(IngestError::Config {
                field: "poll_interval".to_owned(),
                reason: "must be greater than zero".to_owned(),
            });
        }

        if self.max_line_length == 0 {
            return Err(IngestError::Config {
                field: "max_line_length".to_owned(),
                reason: "must be greater than zero".to_owned(),
            });
        }

        Ok(())
    }
}
