//! 메트릭 상수 및 설명 등록
//!
//! 모든 Prometheus 메트릭의 이름을 중앙에서 정의합니다.
//! 각 크레이트는 이 상수를 사용하여 `metrics::counter!()` 매크로를
//! 호출합니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `evewatch_`
//! - 모듈명: `ingest_`, `query_`
//! - 접미어: `_total` (counter)
//!
//! # 사용 예시
//!
//! ```ignore
//! use metrics::counter;
//!
//! counter!(evewatch_core::metrics::INGEST_EVENTS_INGESTED_TOTAL).increment(1);
//! ```

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 버림 사유 레이블 키 (malformed, not_alert, missing_field, oversized)
pub const LABEL_DISCARD_REASON: &str = "reason";

/// 쿼리 연산 레이블 키 (recent, count, top_ips, top_signatures)
pub const LABEL_OPERATION: &str = "operation";

// ─── Ingest 메트릭 ─────────────────────────────────────────────────

/// Ingest: 읽어들인 전체 라인 수 (counter)
pub const INGEST_LINES_READ_TOTAL: &str = "evewatch_ingest_lines_read_total";

/// Ingest: 저장에 성공한 알림 이벤트 수 (counter)
pub const INGEST_EVENTS_INGESTED_TOTAL: &str = "evewatch_ingest_events_ingested_total";

/// Ingest: 분류 단계에서 버려진 라인 수 (counter, label: reason)
pub const INGEST_LINES_DISCARDED_TOTAL: &str = "evewatch_ingest_lines_discarded_total";

/// Ingest: 스토어 쓰기 실패 수 (counter)
pub const INGEST_WRITE_FAILURES_TOTAL: &str = "evewatch_ingest_write_failures_total";

// ─── Query 메트릭 ──────────────────────────────────────────────────

/// Query: 처리한 쿼리 수 (counter, label: operation)
pub const QUERY_REQUESTS_TOTAL: &str = "evewatch_query_requests_total";

/// Query: 실패한 쿼리 수 (counter, label: operation)
pub const QUERY_FAILURES_TOTAL: &str = "evewatch_query_failures_total";

/// 모든 메트릭의 설명을 레코더에 등록합니다.
///
/// 레코더 설치 직후 한 번 호출하세요.
pub fn describe_all() {
    use metrics::describe_counter;

    describe_counter!(
        INGEST_LINES_READ_TOTAL,
        "Total lines read from the eve stream"
    );
    describe_counter!(
        INGEST_EVENTS_INGESTED_TOTAL,
        "Alert events successfully persisted"
    );
    describe_counter!(
        INGEST_LINES_DISCARDED_TOTAL,
        "Lines discarded during classification, by reason"
    );
    describe_counter!(
        INGEST_WRITE_FAILURES_TOTAL,
        "Store writes that failed and were skipped"
    );
    describe_counter!(QUERY_REQUESTS_TOTAL, "Queries served, by operation");
    describe_counter!(QUERY_FAILURES_TOTAL, "Queries failed, by operation");
}
