//! 파이프라인 오케스트레이션 — tail/분류/적재의 전체 흐름을 관리합니다.
//!
//! # 내부 아키텍처
//! ```text
//! FileTailer -> AlertClassifier -> StoreSink -> EventStore
//! ```
//!
//! 수집 경로는 스트림당 단일 순차 루프입니다. 라인 하나의 분류와 적재가
//! 끝나기 전에는 다음 라인을 읽지 않습니다 — 순서 보존과 백프레셔가
//! 하드 요구사항이고, 데이터 속도가 병렬화를 정당화하지 않기 때문에
//! 내부 채널이나 워커 풀을 두지 않습니다.

use std::sync::Arc;

use metrics::counter;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use evewatch_core::metrics::{
    INGEST_LINES_DISCARDED_TOTAL, INGEST_LINES_READ_TOTAL, LABEL_DISCARD_REASON,
};
use evewatch_core::store::EventStore;

use crate::classifier::{AlertClassifier, Classified, DiscardReason};
use crate::config::IngestPipelineConfig;
use crate::error::IngestError;
use crate::sink::StoreSink;
use crate::tail::FileTailer;

/// 수집 루프 종료 시점의 누적 통계
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IngestStats {
    /// 읽어들인 전체 라인 수
    pub lines_read: u64,
    /// 적재에 성공한 알림 이벤트 수
    pub events_ingested: u64,
    /// 분류 단계에서 버려진 라인 수
    pub lines_discarded: u64,
    /// 스토어 쓰기 실패 수
    pub write_failures: u64,
}

/// 알림 수집 파이프라인
///
/// [`IngestPipelineBuilder`]로 조립한 뒤 [`run`](Self::run)으로 소비합니다.
/// 루프는 취소 토큰이 발동될 때까지 실행되며, 소스 스트림이 유실되면
/// 치명적 에러로 종료합니다 — 조용한 데이터 유실로 가려지지 않습니다.
#[derive(Debug)]
pub struct IngestPipeline<S: EventStore> {
    config: IngestPipelineConfig,
    classifier: AlertClassifier,
    sink: StoreSink<S>,
}

impl<S: EventStore> IngestPipeline<S> {
    /// 수집 루프를 실행합니다.
    ///
    /// 파일 열기에 실패하면 즉시 에러를 반환합니다 (시작 시 치명적).
    /// 취소 시에는 처리 중이던 라인을 마무리한 뒤 누적 통계와 함께
    /// 깨끗하게 종료합니다.
    pub async fn run(mut self, cancel: CancellationToken) -> Result<IngestStats, IngestError> {
        let mut tailer = FileTailer::open(&self.config).await?;
        let mut stats = IngestStats::default();

        info!("ingest pipeline started, waiting for new alerts");

        loop {
            let line = match tailer.next_line(&cancel).await? {
                Some(line) => line,
                None => break, // 취소됨
            };

            stats.lines_read += 1;
            counter!(INGEST_LINES_READ_TOTAL).increment(1);

            match self.classifier.classify(&line) {
                Classified::Alert(event) => {
                    // 다음 라인을 읽기 전에 쓰기 완료를 기다림 (백프레셔)
                    if self.sink.persist(event).await {
                        stats.events_ingested += 1;
                    } else {
                        stats.write_failures += 1;
                    }
                }
                Classified::Discarded(reason) => {
                    stats.lines_discarded += 1;
                    counter!(INGEST_LINES_DISCARDED_TOTAL, LABEL_DISCARD_REASON => reason.label())
                        .increment(1);
                    log_discard(&reason);
                }
            }
        }

        info!(
            lines_read = stats.lines_read,
            events_ingested = stats.events_ingested,
            lines_discarded = stats.lines_discarded,
            write_failures = stats.write_failures,
            "ingest pipeline stopped"
        );

        Ok(stats)
    }
}

/// 버림 사유를 운영자 가시성 수준에 맞게 기록합니다.
///
/// 깨진 라인과 비알림 레코드는 예상된 노이즈라 debug, 필수 필드 누락은
/// 스키마 이상 신호일 수 있어 warn입니다.
fn log_discard(reason: &DiscardReason) {
    match reason {
        DiscardReason::Malformed => debug!("discarded malformed line"),
        DiscardReason::NotAlert(event_type) => {
            debug!(event_type = %event_type, "discarded non-alert record")
        }
        DiscardReason::MissingField(field) => {
            warn!(field, "discarded alert record with missing required field")
        }
        DiscardReason::Oversized => warn!("discarded oversized line"),
    }
}

/// 수집 파이프라인 빌더
pub struct IngestPipelineBuilder<S: EventStore> {
    config: IngestPipelineConfig,
    store: Option<Arc<S>>,
}

impl<S: EventStore> IngestPipelineBuilder<S> {
    /// 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self {
            config: IngestPipelineConfig::default(),
            store: None,
        }
    }

    /// 파이프라인 설정을 지정합니다.
    pub fn config(mut self, config: IngestPipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// 공유 스토어 핸들을 지정합니다 (필수).
    pub fn store(mut self, store: Arc<S>) -> Self {
        self.store = Some(store);
        self
    }

    /// 파이프라인을 빌드합니다.
    pub fn build(self) -> Result<IngestPipeline<S>, IngestError> {
        self.config.validate()?;

        let store = self.store.ok_or_else(|| IngestError::Config {
            field: "store".to_owned(),
            reason: "store handle is required".to_owned(),
        })?;

        let classifier = AlertClassifier::new(self.config.max_line_length);
        let sink = StoreSink::new(store);

        Ok(IngestPipeline {
            config: self.config,
            classifier,
            sink,
        })
    }
}

impl<S: EventStore> Default for IngestPipelineBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evewatch_core::store::MemoryStore;

    #[test]
    fn build_requires_store() {
        let err = IngestPipelineBuilder::<MemoryStore>::new()
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("store"));
    }

    #[test]
    fn build_validates_config() {
        let config = IngestPipelineConfig {
            poll_interval: std::time::Duration::ZERO,
            ..Default::default()
        };
        let err = IngestPipelineBuilder::new()
            .config(config)
            .store(Arc::new(MemoryStore::new()))
            .build()
            .unwrap_err();
        assert!(matches!(err, IngestError::Config { .. }));
    }

    #[tokio::test]
    async fn run_fails_fast_on_missing_source() {
        let config = IngestPipelineConfig {
            eve_path: "/nonexistent/eve.json".into(),
            ..Default::default()
        };
        let pipeline = IngestPipelineBuilder::new()
            .config(config)
            .store(Arc::new(MemoryStore::new()))
            .build()
            .expect("build");

        let err = pipeline.run(CancellationToken::new()).await.unwrap_err();
        assert!(matches!(err, IngestError::Source { .. }));
    }
}
