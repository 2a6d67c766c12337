//! 스토어 싱크 — 분류된 알림 이벤트의 적재
//!
//! [`StoreSink`]는 수락된 이벤트당 정확히 한 번 스토어 쓰기를 수행하고,
//! 쓰기가 완료(또는 실패)될 때까지 호출자를 붙잡아 둡니다. 파이프라인이
//! 다음 라인을 읽기 전에 `persist`가 끝나야 하므로, 미영속 상태의
//! 이벤트는 한 번에 최대 하나입니다.
//!
//! # 쓰기 실패 정책
//! 개별 쓰기 실패는 skip-and-continue입니다: error 레벨로 기록하고
//! 카운트한 뒤 다음 라인으로 넘어갑니다. 멈춘 파이프라인이 알림 하나를
//! 잃는 것보다 나쁘다는 트레이드오프이며, 숨기지 않고 여기 문서화해
//! 둡니다. 중복 제거는 하지 않습니다 — 단일 reader 수명 내에서
//! at-most-once입니다.

use std::sync::Arc;

use metrics::counter;
use tracing::{error, info};

use evewatch_core::event::AlertEvent;
use evewatch_core::metrics::{INGEST_EVENTS_INGESTED_TOTAL, INGEST_WRITE_FAILURES_TOTAL};
use evewatch_core::store::EventStore;

/// 이벤트 스토어 싱크
#[derive(Debug)]
pub struct StoreSink<S: EventStore> {
    /// 공유 스토어 핸들
    store: Arc<S>,
    /// 적재 성공 카운터
    ingested: u64,
    /// 쓰기 실패 카운터
    write_failures: u64,
}

impl<S: EventStore> StoreSink<S> {
    /// 공유 스토어 핸들로 싱크를 생성합니다.
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            ingested: 0,
            write_failures: 0,
        }
    }

    /// 이벤트 하나를 적재합니다. 영속에 성공하면 `true`를 반환합니다.
    ///
    /// 실패해도 에러를 반환하지 않습니다 — 실패는 로그와 메트릭으로
    /// 표면화되고 파이프라인은 계속 진행합니다.
    pub async fn persist(&mut self, event: AlertEvent) -> bool {
        let signature = event.signature.clone();

        match self.store.insert(event).await {
            Ok(()) => {
                self.ingested += 1;
                counter!(INGEST_EVENTS_INGESTED_TOTAL).increment(1);
                info!(signature = %signature, "alert logged");
                true
            }
            Err(e) => {
                self.write_failures += 1;
                counter!(INGEST_WRITE_FAILURES_TOTAL).increment(1);
                error!(
                    error = %e,
                    signature = %signature,
                    "store write failed, skipping event"
                );
                false
            }
        }
    }

    /// 적재에 성공한 이벤트 수를 반환합니다.
    pub fn ingested(&self) -> u64 {
        self.ingested
    }

    /// 쓰기 실패 수를 반환합니다.
    pub fn write_failures(&self) -> u64 {
        self.write_failures
    }
}
