//! 통합 테스트 — 수집 파이프라인 전체 흐름 검증
//!
//! tail → 분류 → 적재의 전체 경로를 실제 파일과 인메모리 스토어로
//! 검증합니다.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use evewatch_core::store::{EventStore, MemoryStore};
use evewatch_ingest::{IngestPipelineBuilder, IngestPipelineConfig, IngestStats};

fn append(path: &Path, data: &str) {
    let mut file = std::fs::OpenOptions::new()
        .append(true)
        .open(path)
        .expect("open for append");
    file.write_all(data.as_bytes()).expect("append");
    file.flush().expect("flush");
}

fn alert_line(src_ip: &str, signature: &str, seq: u32) -> String {
    format!(
        r#"{{"event_type":"alert","timestamp":"2024-01-15T12:00:{:02}.000000+0000","src_ip":"{src_ip}","alert":{{"signature":"{signature}"}}}}"#,
        seq % 60,
    )
}

/// 파이프라인을 백그라운드에서 실행하고 (스토어, 취소 토큰, 태스크 핸들)을
/// 반환합니다.
fn spawn_pipeline(
    path: &Path,
) -> (
    Arc<MemoryStore>,
    CancellationToken,
    tokio::task::JoinHandle<IngestStats>,
) {
    let store = Arc::new(MemoryStore::new());
    let config = IngestPipelineConfig {
        eve_path: path.to_path_buf(),
        poll_interval: Duration::from_millis(10),
        max_line_length: 64 * 1024,
    };
    let pipeline = IngestPipelineBuilder::new()
        .config(config)
        .store(store.clone())
        .build()
        .expect("build pipeline");

    let cancel = CancellationToken::new();
    let cancel_clone = cancel.clone();
    let task = tokio::spawn(async move {
        pipeline
            .run(cancel_clone)
            .await
            .expect("pipeline run should not fail")
    });

    (store, cancel, task)
}

/// 스토어의 이벤트 수가 `expected`에 도달할 때까지 대기합니다.
async fn wait_for_count(store: &MemoryStore, expected: u64) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    loop {
        if store.count_all().await.expect("count") >= expected {
            return;
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "timed out waiting for {expected} events"
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

#[tokio::test]
async fn well_formed_alerts_are_persisted_in_order() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("eve.json");
    std::fs::write(&path, "").expect("seed");

    let (store, cancel, task) = spawn_pipeline(&path);
    tokio::time::sleep(Duration::from_millis(50)).await;

    for i in 0..5 {
        append(&path, &(alert_line(&format!("10.0.0.{i}"), "SCAN", i) + "\n"));
    }

    wait_for_count(&store, 5).await;
    cancel.cancel();
    let stats = task.await.expect("join");

    assert_eq!(stats.events_ingested, 5);
    assert_eq!(stats.lines_read, 5);

    // append 순서 == 저장 순서
    let recent = store.find_recent(5).await.expect("recent");
    let src_ips: Vec<&str> = recent.iter().map(|e| e.src_ip.as_str()).collect();
    // 최신순이므로 역순
    assert_eq!(src_ips, vec!["10.0.0.4", "10.0.0.3", "10.0.0.2", "10.0.0.1", "10.0.0.0"]);
}

#[tokio::test]
async fn lines_before_start_are_never_ingested() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("eve.json");
    std::fs::write(&path, alert_line("10.0.0.99", "OLD", 0) + "\n").expect("seed");

    let (store, cancel, task) = spawn_pipeline(&path);
    tokio::time::sleep(Duration::from_millis(50)).await;

    append(&path, &(alert_line("10.0.0.1", "NEW", 1) + "\n"));

    wait_for_count(&store, 1).await;
    cancel.cancel();
    task.await.expect("join");

    assert_eq!(store.count_all().await.unwrap(), 1);
    let recent = store.find_recent(10).await.unwrap();
    assert_eq!(recent[0].signature, "NEW");
}

#[tokio::test]
async fn malformed_and_non_alert_lines_do_not_stop_the_stream() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("eve.json");
    std::fs::write(&path, "").expect("seed");

    let (store, cancel, task) = spawn_pipeline(&path);
    tokio::time::sleep(Duration::from_millis(50)).await;

    // 이질적인 스트림: alert 하나, dns 하나, 깨진 라인 하나
    append(
        &path,
        concat!(
            r#"{"event_type":"alert","timestamp":"2024-01-15T12:00:00.000000+0000","src_ip":"10.0.0.5","alert":{"signature":"SCAN"}}"#,
            "\n",
            r#"{"event_type":"dns"}"#,
            "\n",
            "not json\n",
        ),
    );
    // 깨진 라인 이후에도 수집은 계속되어야 함
    append(&path, &(alert_line("10.0.0.6", "SCAN", 2) + "\n"));

    wait_for_count(&store, 2).await;
    cancel.cancel();
    let stats = task.await.expect("join");

    assert_eq!(stats.lines_read, 4);
    assert_eq!(stats.events_ingested, 2);
    assert_eq!(stats.lines_discarded, 2);
    assert_eq!(store.count_all().await.unwrap(), 2);

    let buckets = store.group_count("src_ip", 5).await.unwrap();
    assert_eq!(buckets.len(), 2);
    assert!(buckets.iter().any(|b| b.key == "10.0.0.5" && b.count == 1));
}

#[tokio::test]
async fn count_is_monotonic_across_idle_periods() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("eve.json");
    std::fs::write(&path, "").expect("seed");

    let (store, cancel, task) = spawn_pipeline(&path);
    tokio::time::sleep(Duration::from_millis(50)).await;

    append(&path, &(alert_line("10.0.0.1", "SCAN", 1) + "\n"));
    wait_for_count(&store, 1).await;

    // 유휴 구간: 카운트는 변하지 않아야 함
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(store.count_all().await.unwrap(), 1);

    append(&path, &(alert_line("10.0.0.2", "SCAN", 2) + "\n"));
    wait_for_count(&store, 2).await;

    cancel.cancel();
    task.await.expect("join");
    assert_eq!(store.count_all().await.unwrap(), 2);
}

#[tokio::test]
async fn cancellation_shuts_down_without_processing_further_lines() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("eve.json");
    std::fs::write(&path, "").expect("seed");

    let (store, cancel, task) = spawn_pipeline(&path);
    tokio::time::sleep(Duration::from_millis(50)).await;

    append(&path, &(alert_line("10.0.0.1", "SCAN", 1) + "\n"));
    wait_for_count(&store, 1).await;

    cancel.cancel();
    let stats = tokio::time::timeout(Duration::from_secs(2), task)
        .await
        .expect("shutdown within poll interval")
        .expect("join");
    assert_eq!(stats.events_ingested, 1);

    // 취소 이후에 추가된 라인은 수집되지 않음
    append(&path, &(alert_line("10.0.0.2", "SCAN", 2) + "\n"));
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(store.count_all().await.unwrap(), 1);
}

#[tokio::test]
async fn deleted_source_terminates_the_pipeline_with_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("eve.json");
    std::fs::write(&path, "").expect("seed");

    let store = Arc::new(MemoryStore::new());
    let config = IngestPipelineConfig {
        eve_path: path.clone(),
        poll_interval: Duration::from_millis(10),
        max_line_length: 64 * 1024,
    };
    let pipeline = IngestPipelineBuilder::new()
        .config(config)
        .store(store)
        .build()
        .expect("build pipeline");

    let cancel = CancellationToken::new();
    let task = tokio::spawn(pipeline.run(cancel));
    tokio::time::sleep(Duration::from_millis(50)).await;

    std::fs::remove_file(&path).expect("remove source");

    let result = tokio::time::timeout(Duration::from_secs(2), task)
        .await
        .expect("pipeline must terminate")
        .expect("join");
    assert!(result.is_err(), "source loss must surface as an error");
}
