//! 수집 파이프라인 에러 타입
//!
//! [`IngestError`]는 수집 파이프라인 내부에서 발생하는 모든 에러를 표현합니다.
//! `From<IngestError> for EvewatchError` 변환이 구현되어 있어
//! 상위 레이어에서 `?` 연산자로 자연스럽게 전파할 수 있습니다.
//!
//! 라인 하나의 분류 실패는 에러가 아닙니다 — 분류 결과는
//! [`Classified`](crate::classifier::Classified)의 두 가지 outcome으로
//! 표현되며, 이 타입까지 올라오는 에러는 파이프라인 전체를 멈추는
//! 치명적 상황뿐입니다.

use evewatch_core::error::{EvewatchError, PipelineError, StorageError};

/// 수집 파이프라인 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// 소스 스트림을 열 수 없음 (시작 시 치명적)
    #[error("source error: {path}: {reason}")]
    Source {
        /// 감시 대상 파일 경로
        path: String,
        /// 실패 사유
        reason: String,
    },

    /// 실행 중 소스 스트림 유실 (파일 삭제, 로테이션, 권한 변경)
    #[error("source lost: {path}: {reason}")]
    SourceLost {
        /// 감시 대상 파일 경로
        path: String,
        /// 유실 사유
        reason: String,
    },

    /// 설정 에러
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },

    /// 스토리지 에러
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<IngestError> for EvewatchError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::SourceLost { path, reason } => {
                EvewatchError::Pipeline(PipelineError::SourceLost(format!("{path}: {reason}")))
            }
            IngestError::Storage(e) => EvewatchError::Storage(e),
            IngestError::Io(e) => EvewatchError::Io(e),
            other => EvewatchError::Pipeline(PipelineError::InitFailed(other.to_string())),
        }
    }
}
