#![doc = include_str!("../README.md")]
//!
//! # 모듈 구성
//!
//! - [`tail`]: append-only 파일 팔로우 (폴링 기반 tail -f)
//! - [`classifier`]: 라인 단위 JSON 파싱 및 알림 분류
//! - [`sink`]: 분류된 이벤트의 스토어 적재
//! - [`pipeline`]: 전체 수집 루프 오케스트레이션
//! - [`config`]: 수집 설정 (core 설정 확장)
//! - [`error`]: 도메인 에러 타입

pub mod classifier;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod sink;
pub mod tail;

// --- 주요 타입 re-export ---

pub use classifier::{AlertClassifier, Classified, DiscardReason};
pub use config::IngestPipelineConfig;
pub use error::IngestError;
pub use pipeline::{IngestPipeline, IngestPipelineBuilder, IngestStats};
pub use sink::StoreSink;
pub use tail::FileTailer;
