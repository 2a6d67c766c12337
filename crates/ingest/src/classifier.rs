//! 이벤트 분류 — 라인 하나를 0개 또는 1개의 알림 이벤트로
//!
//! [`AlertClassifier`]는 무상태 라인 단위 필터입니다. 결과는 명시적
//! 두 갈래 outcome인 [`Classified`]로 표현됩니다: 알림 이벤트이거나,
//! 사유가 붙은 버림이거나. 라인 하나가 아무리 깨져 있어도 분류는
//! 에러를 반환하지 않습니다 — 깨진 라인 하나가 이후 라인의 수집을
//! 멈추는 일은 없어야 합니다.
//!
//! # 분류 규칙
//! - JSON 파싱 실패 → [`DiscardReason::Malformed`]
//! - `event_type != "alert"` → [`DiscardReason::NotAlert`] (소스 스트림은
//!   의도적으로 이질적이며 dns/flow 등 비알림 레코드는 예상된 노이즈)
//! - 필수 필드(`timestamp`, `src_ip`, `alert.signature`) 누락 →
//!   [`DiscardReason::MissingField`]
//! - 입력 크기 초과 → [`DiscardReason::Oversized`]

use evewatch_core::event::{AlertEvent, EVENT_TYPE_ALERT, field_str};

/// 분류 결과 — 라인당 정확히 하나
#[derive(Debug)]
pub enum Classified {
    /// 잘 구성된 알림 이벤트. 스토어로 전달됩니다.
    Alert(AlertEvent),
    /// 버려진 라인. 파이프라인은 사유를 집계하고 계속 진행합니다.
    Discarded(DiscardReason),
}

/// 라인을 버린 사유
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscardReason {
    /// JSON으로 파싱할 수 없음
    Malformed,
    /// 알림이 아닌 이벤트 타입 (dns, flow, stats 등)
    NotAlert(String),
    /// 필수 필드 누락
    MissingField(&'static str),
    /// 설정된 최대 입력 크기 초과
    Oversized,
}

impl DiscardReason {
    /// 메트릭 레이블로 쓰는 고정 문자열
    pub fn label(&self) -> &'static str {
        match self {
            DiscardReason::Malformed => "malformed",
            DiscardReason::NotAlert(_) => "not_alert",
            DiscardReason::MissingField(_) => "missing_field",
            DiscardReason::Oversized => "oversized",
        }
    }
}

/// 알림 분류기
///
/// 무상태이며 입력 순서를 그대로 보존합니다 (라인당 호출 한 번,
/// 배칭/재정렬 없음).
#[derive(Debug, Clone)]
pub struct AlertClassifier {
    /// 최대 허용 입력 크기 (바이트)
    max_input_size: usize,
}

impl Default for AlertClassifier {
    fn default() -> Self {
        Self {
            max_input_size: 64 * 1024, // 64KB
        }
    }
}

impl AlertClassifier {
    /// 최대 입력 크기를 지정하여 분류기를 생성합니다.
    pub fn new(max_input_size: usize) -> Self {
        Self { max_input_size }
    }

    /// 라인 하나를 분류합니다.
    pub fn classify(&self, line: &str) -> Classified {
        if line.len() > self.max_input_size {
            return Classified::Discarded(DiscardReason::Oversized);
        }

        let document: serde_json::Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(_) => return Classified::Discarded(DiscardReason::Malformed),
        };

        if !document.is_object() {
            return Classified::Discarded(DiscardReason::Malformed);
        }

        match field_str(&document, "event_type") {
            Some(event_type) if event_type == EVENT_TYPE_ALERT => {}
            Some(event_type) => {
                return Classified::Discarded(DiscardReason::NotAlert(event_type));
            }
            None => {
                return Classified::Discarded(DiscardReason::NotAlert("<missing>".to_owned()));
            }
        }

        let Some(timestamp) = field_str(&document, "timestamp") else {
            return Classified::Discarded(DiscardReason::MissingField("timestamp"));
        };
        let Some(src_ip) = field_str(&document, "src_ip") else {
            return Classified::Discarded(DiscardReason::MissingField("src_ip"));
        };
        let Some(signature) = field_str(&document, "alert.signature") else {
            return Classified::Discarded(DiscardReason::MissingField("alert.signature"));
        };

        Classified::Alert(AlertEvent::new(timestamp, src_ip, signature, document))
    }
}
