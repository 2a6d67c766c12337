//! 에러 타입 — 도메인별 에러 정의

/// Evewatch 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum EvewatchError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 수집 파이프라인 에러
    #[error("pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// 스토리지 에러
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 수집 파이프라인 에러
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// 파이프라인 초기화 실패
    #[error("pipeline init failed: {0}")]
    InitFailed(String),

    /// 소스 스트림 유실 (파일 삭제, 권한 변경 등)
    #[error("source stream lost: {0}")]
    SourceLost(String),
}

/// 스토리지 에러
///
/// [`EventStore`](crate::store::EventStore) 구현체가 반환하는 에러입니다.
/// 쿼리 경로에서는 절대 빈 결과로 가려지지 않고 호출자까지 전파됩니다.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// 연결 실패
    #[error("connection failed: {0}")]
    Connection(String),

    /// 쓰기 실패
    #[error("insert failed: {0}")]
    Insert(String),

    /// 쿼리 실패
    #[error("query failed: {0}")]
    Query(String),
}
