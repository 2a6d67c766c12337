//! 알림 이벤트 — 수집/저장/조회의 기본 단위
//!
//! [`AlertEvent`]는 Suricata eve.json 스트림에서 분류된 알림 레코드 하나를
//! 표현합니다. 생성 이후 불변이며, 원본 JSON 문서를 필드 손실 없이 그대로
//! 보존합니다. 집계 쿼리는 보존된 문서에 대한 dot notation 필드 조회로
//! 동작합니다.

use std::fmt;

use serde::{Deserialize, Serialize};

/// 수집 대상 이벤트 타입. 이 값이 아닌 레코드는 분류 단계에서 버려집니다.
pub const EVENT_TYPE_ALERT: &str = "alert";

/// 분류가 끝난 알림 이벤트
///
/// 불변식: 모든 `AlertEvent`의 원본 문서는 `event_type == "alert"`이며,
/// `timestamp`, `src_ip`, `signature`는 문서에서 추출된 비어 있지 않은
/// 값입니다. 스토어는 이 타입 외의 레코드를 받지 않습니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertEvent {
    /// 내부 식별자 (UUID v4). 외부 응답에는 절대 노출되지 않습니다.
    pub id: String,
    /// 레코드의 타임스탬프 문자열 (ISO-8601, 원문 그대로)
    pub timestamp: String,
    /// 출발지 IP (집계 키)
    pub src_ip: String,
    /// 알림 시그니처 (집계 키)
    pub signature: String,
    /// 원본 JSON 문서 전체 (검증된 필드 포함, 원문 그대로)
    pub document: serde_json::Value,
}

impl AlertEvent {
    /// 추출된 필드와 원본 문서로 새 알림 이벤트를 생성합니다.
    pub fn new(
        timestamp: impl Into<String>,
        src_ip: impl Into<String>,
        signature: impl Into<String>,
        document: serde_json::Value,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: timestamp.into(),
            src_ip: src_ip.into(),
            signature: signature.into(),
            document,
        }
    }

    /// 보존된 문서에서 dot notation 경로의 문자열 값을 조회합니다.
    ///
    /// 예: `"src_ip"`, `"alert.signature"`
    pub fn field_str(&self, path: &str) -> Option<String> {
        field_str(&self.document, path)
    }
}

impl fmt::Display for AlertEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AlertEvent[{}] src_ip={} signature={}",
            &self.id[..8.min(self.id.len())],
            self.src_ip,
            self.signature,
        )
    }
}

/// JSON 문서에서 dot notation 경로의 문자열 값을 조회합니다.
///
/// 숫자/불리언 값은 문자열로 변환하고, 객체/배열/null은 `None`을 반환합니다.
pub fn field_str(value: &serde_json::Value, path: &str) -> Option<String> {
    let mut current = value;
    for part in path.split('.') {
        current = current.get(part)?;
    }

    match current {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
