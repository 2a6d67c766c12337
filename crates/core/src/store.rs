//! 스토어 경계 — 추상 append+query 저장소 계약
//!
//! 수집 파이프라인과 쿼리 엔진이 공유하는 유일한 가변 상태는 스토어입니다.
//! [`EventStore`] trait은 실제 저장 엔진을 추상화하며, 개별 쓰기와 개별
//! 읽기 각각의 원자성만 요구합니다. 호출 간 스냅샷 격리는 보장하지
//! 않습니다 (수집과 동시에 실행되는 쿼리는 기록 중인 이벤트를 포함할 수도,
//! 포함하지 않을 수도 있습니다).
//!
//! [`MemoryStore`]는 기준 구현이자 테스트용 구현입니다. 핸들은 시작 시
//! 한 번 열어 `Arc`로 공유합니다 — 전역 상태가 아니라 명시적으로 전달되는
//! 스레드 안전 핸들입니다.

use std::collections::HashMap;
use std::future::Future;

use serde::Serialize;
use tokio::sync::RwLock;

use crate::error::StorageError;
use crate::event::{AlertEvent, field_str};

/// 집계 결과의 한 그룹 — `(키, 카운트)` 쌍
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupBucket {
    /// 그룹 키 값 (예: 출발지 IP, 시그니처)
    pub key: String,
    /// 해당 그룹의 이벤트 수
    pub count: u64,
}

/// 이벤트 스토어 계약
///
/// 모든 메서드는 개별적으로 원자적이며 동시 호출에 안전해야 합니다.
/// 실패는 항상 [`StorageError`]로 표면화됩니다 — 빈 결과나 0으로
/// 위장해서는 안 됩니다.
pub trait EventStore: Send + Sync + 'static {
    /// 스토어 연결 상태를 확인합니다. 시작 시 실패하면 프로세스가 종료됩니다.
    fn ping(&self) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// 알림 이벤트 하나를 추가합니다. 이벤트당 정확히 한 번 호출됩니다.
    fn insert(&self, event: AlertEvent) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// 저장된 전체 이벤트 수를 반환합니다.
    fn count_all(&self) -> impl Future<Output = Result<u64, StorageError>> + Send;

    /// dot notation 키로 그룹핑한 상위 `limit`개 그룹을 반환합니다.
    ///
    /// 정렬: 카운트 내림차순, 동률은 키 오름차순 (결정적 tie-break).
    /// 해당 키가 없는 이벤트는 집계에서 제외됩니다.
    fn group_count(
        &self,
        key: &str,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<GroupBucket>, StorageError>> + Send;

    /// 타임스탬프 기준 최신순으로 최대 `limit`개 이벤트를 반환합니다.
    fn find_recent(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<AlertEvent>, StorageError>> + Send;
}

/// 인메모리 이벤트 스토어 — 기준 구현
///
/// append-only `Vec`을 `tokio::sync::RwLock`으로 감쌉니다. 쓰기는 수집
/// 파이프라인 한 곳에서만 일어나고, 읽기는 쿼리 경로에서 동시에 여러 번
/// 일어날 수 있습니다.
#[derive(Debug, Default)]
pub struct MemoryStore {
    events: RwLock<Vec<AlertEvent>>,
}

impl MemoryStore {
    /// 빈 스토어를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventStore for MemoryStore {
    async fn ping(&self) -> Result<(), StorageError> {
        Ok(())
    }

    async fn insert(&self, event: AlertEvent) -> Result<(), StorageError> {
        self.events.write().await.push(event);
        Ok(())
    }

    async fn count_all(&self) -> Result<u64, StorageError> {
        Ok(self.events.read().await.len() as u64)
    }

    async fn group_count(&self, key: &str, limit: usize) -> Result<Vec<GroupBucket>, StorageError> {
        let events = self.events.read().await;

        let mut counts: HashMap<String, u64> = HashMap::new();
        for event in events.iter() {
            if let Some(value) = field_str(&event.document, key) {
                *counts.entry(value).or_insert(0) += 1;
            }
        }

        let mut buckets: Vec<GroupBucket> = counts
            .into_iter()
            .map(|(key, count)| GroupBucket { key, count })
            .collect();

        // 카운트 내림차순, 동률은 키 오름차순
        buckets.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)));
        buckets.truncate(limit);

        Ok(buckets)
    }

    async fn find_recent(&self, limit: usize) -> Result<Vec<AlertEvent>, StorageError> {
        let events = self.events.read().await;

        let mut sorted: Vec<AlertEvent> = events.iter().cloned().collect();
        // ISO-8601 문자열은 사전순 비교가 시간순 비교와 일치합니다
        sorted.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        sorted.truncate(limit);

        Ok(sorted)
    }
}
