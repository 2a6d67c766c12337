use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;

use evewatch_core::config::EvewatchConfig;
use evewatch_core::store::{EventStore, MemoryStore};
use evewatch_daemon::cli::DaemonCli;
use evewatch_daemon::{logging, metrics_server};
use evewatch_ingest::{IngestPipelineBuilder, IngestPipelineConfig};
use evewatch_query::{QueryFacade, StatsEngine};

/// 상태 요약 로그 주기
const STATUS_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<()> {
    let args = DaemonCli::parse();

    // --validate: 설정 파일만 검증하고 종료
    if args.validate {
        match EvewatchConfig::load(&args.config).await {
            Ok(_) => {
                println!("configuration OK: {}", args.config.display());
                return Ok(());
            }
            Err(e) => {
                eprintln!("configuration invalid: {e}");
                std::process::exit(1);
            }
        }
    }

    let mut config = EvewatchConfig::load(&args.config)
        .await
        .with_context(|| format!("failed to load config from {}", args.config.display()))?;

    // CLI 오버라이드는 설정 파일/환경변수보다 우선
    if let Some(level) = args.log_level {
        config.general.log_level = level;
    }
    if let Some(format) = args.log_format {
        config.general.log_format = format;
    }
    config.validate().context("invalid configuration")?;

    logging::init_tracing(&config.general)?;
    tracing::info!("evewatch-daemon starting");

    if config.metrics.enabled {
        metrics_server::install_metrics_recorder(&config.metrics)?;
    }

    // 스토어 연결 확인 -- 실패 시 기동 중단
    let store = Arc::new(MemoryStore::new());
    store
        .ping()
        .await
        .context("event store unreachable; fix the store before starting the daemon")?;
    tracing::info!("event store ready");

    let facade = QueryFacade::new(StatsEngine::new(store.clone()), config.query.clone());

    if !config.ingest.enabled {
        tracing::warn!("ingest pipeline disabled; serving queries over an empty store");
        tokio::signal::ctrl_c().await?;
        tracing::info!("shutdown signal received");
        tracing::info!("evewatch-daemon shut down");
        return Ok(());
    }

    let pipeline = IngestPipelineBuilder::new()
        .config(IngestPipelineConfig::from_core(&config.ingest))
        .store(store.clone())
        .build()
        .map_err(|e| anyhow::anyhow!("failed to build ingest pipeline: {}", e))?;

    tracing::info!(
        eve_path = %config.ingest.eve_path,
        "watching eve stream for new alerts"
    );

    let cancel = CancellationToken::new();
    let mut pipeline_task = tokio::spawn(pipeline.run(cancel.clone()));
    let status_task = tokio::spawn(status_loop(facade, cancel.clone()));

    let outcome = tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutdown signal received");
            cancel.cancel();
            match pipeline_task.await {
                Ok(Ok(stats)) => {
                    tracing::info!(
                        lines_read = stats.lines_read,
                        events_ingested = stats.events_ingested,
                        "ingest pipeline drained"
                    );
                    Ok(())
                }
                Ok(Err(e)) => Err(anyhow::anyhow!("ingest pipeline failed during shutdown: {}", e)),
                Err(e) => Err(anyhow::anyhow!("ingest task panicked: {}", e)),
            }
        }
        result = &mut pipeline_task => {
            // 파이프라인이 스스로 내려갔다면 치명적 (예: 소스 파일 소실)
            cancel.cancel();
            match result {
                Ok(Ok(stats)) => {
                    tracing::warn!(
                        lines_read = stats.lines_read,
                        "ingest pipeline exited unexpectedly"
                    );
                    Ok(())
                }
                Ok(Err(e)) => {
                    tracing::error!(error = %e, "ingest pipeline failed");
                    Err(e.into())
                }
                Err(e) => Err(anyhow::anyhow!("ingest task panicked: {}", e)),
            }
        }
    };

    let _ = status_task.await;
    tracing::info!("evewatch-daemon shut down");
    outcome
}

/// 주기적으로 대시보드 쿼리 경로를 통해 상태 요약을 남깁니다.
///
/// 수집 루프와 같은 스토어를 읽으므로, 이 로그가 멈추면 쿼리 경로
/// 장애를 의미합니다.
async fn status_loop<S: EventStore>(facade: QueryFacade<S>, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(STATUS_INTERVAL);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    // 첫 틱은 즉시 발화하므로 소비
    interval.tick().await;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = interval.tick() => match facade.total_alerts().await {
                Ok(resp) => tracing::info!(total_alerts = resp.total_alerts, "status summary"),
                Err(e) => tracing::warn!(error = %e, "status summary query failed"),
            },
        }
    }
}
