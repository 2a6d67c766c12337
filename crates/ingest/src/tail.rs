//! 파일 팔로우 — append-only 스트림의 폴링 기반 tail
//!
//! [`FileTailer`]는 계속 자라나는 eve.json 파일을 `tail -f`처럼 따라
//! 읽습니다. 열 때 파일 끝으로 이동하므로 시작 이전의 내용은 절대
//! 재생되지 않습니다 ("only new data" 계약).
//!
//! # 대기 방식
//! EOF에서 이벤트 알림 대신 고정 주기 폴링으로 대기합니다. 최악 감지
//! 지연과 유휴 CPU 사용량이 폴링 주기로 유계됩니다. 파일시스템 watch는
//! 선택적 최적화일 뿐 계약 변경이 아닙니다.
//!
//! # 커서
//! 바이트 오프셋은 메모리에만 유지되며 재시작 간 보존되지 않습니다.
//! 새로 연 reader는 항상 "지금"부터 시작합니다. 재시작을 걸친
//! at-least-once가 필요하면 오프셋을 외부에 체크포인트해야 합니다.

use std::io::SeekFrom;
use std::path::PathBuf;
use std::time::Duration;

use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncSeekExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::IngestPipelineConfig;
use crate::error::IngestError;

/// 폴링 기반 파일 tail reader
///
/// 완성된 라인만 append 순서 그대로 내보냅니다. 읽다 만 라인은 내부에
/// 보관될 뿐 절대 밖으로 나가지 않으며, 취소 시에는 그대로 버려집니다.
#[derive(Debug)]
pub struct FileTailer {
    /// 감시 대상 파일 경로
    path: PathBuf,
    /// EOF에서의 폴링 주기
    poll_interval: Duration,
    /// 최대 라인 길이 (바이트)
    max_line_length: usize,
    /// 버퍼링된 reader
    reader: BufReader<File>,
    /// 아직 개행을 만나지 못한 부분 라인
    partial: Vec<u8>,
    /// 현재 바이트 오프셋 (truncation 감지용)
    offset: u64,
    /// 초과 길이 라인을 다음 개행까지 건너뛰는 중인지
    discarding: bool,
}

impl FileTailer {
    /// 파일을 열고 현재 끝 위치로 이동합니다.
    ///
    /// 파일을 열 수 없으면 치명적 에러입니다 — 수집 파이프라인은 소스
    /// 없이 시작하지 않습니다.
    pub async fn open(config: &IngestPipelineConfig) -> Result<Self, IngestError> {
        let mut file =
            File::open(&config.eve_path)
                .await
                .map_err(|e| IngestError::Source {
                    path: config.eve_path.display().to_string(),
                    reason: e.to_string(),
                })?;

        // 시작 시점 이전의 내용은 재생하지 않음
        let offset = file
            .seek(SeekFrom::End(0))
            .await
            .map_err(|e| IngestError::Source {
                path: config.eve_path.display().to_string(),
                reason: format!("seek to end failed: {e}"),
            })?;

        info!(
            path = %config.eve_path.display(),
            offset,
            poll_interval_ms = config.poll_interval.as_millis() as u64,
            "tailing eve stream from current end"
        );

        Ok(Self {
            path: config.eve_path.clone(),
            poll_interval: config.poll_interval,
            max_line_length: config.max_line_length,
            reader: BufReader::new(file),
            partial: Vec::new(),
            offset,
            discarding: false,
        })
    }

    /// 다음 완성 라인을 반환합니다.
    ///
    /// 새 데이터가 없으면 폴링 주기만큼 대기한 뒤 다시 확인합니다.
    /// 취소되면 `Ok(None)`을 반환하며, 부분 라인은 내보내지 않습니다.
    /// 파일이 사라지거나 잘리면 [`IngestError::SourceLost`]로 실패합니다.
    pub async fn next_line(
        &mut self,
        cancel: &CancellationToken,
    ) -> Result<Option<String>, IngestError> {
        loop {
            if cancel.is_cancelled() {
                debug!("tail reader cancelled");
                return Ok(None);
            }

            let n = self.reader.read_until(b'\n', &mut self.partial).await?;
            self.offset += n as u64;

            if self.partial.last() == Some(&b'\n') {
                let mut line = std::mem::take(&mut self.partial);
                line.pop();
                if line.last() == Some(&b'\r') {
                    line.pop();
                }

                if self.discarding {
                    // 초과 길이 라인의 꼬리 부분
                    self.discarding = false;
                    continue;
                }

                if line.len() > self.max_line_length {
                    warn!(
                        length = line.len(),
                        max = self.max_line_length,
                        "dropping oversized line"
                    );
                    continue;
                }

                return Ok(Some(String::from_utf8_lossy(&line).into_owned()));
            }

            // 개행 없이 읽기가 끝남 — 부분 라인 상태
            if self.partial.len() > self.max_line_length {
                if !self.discarding {
                    warn!(
                        max = self.max_line_length,
                        "line exceeds max length, skipping until next newline"
                    );
                    self.discarding = true;
                }
                self.partial.clear();
            }

            if n == 0 {
                // EOF — 소스가 아직 살아있는지 확인한 뒤 대기
                self.check_source().await?;

                tokio::select! {
                    _ = tokio::time::sleep(self.poll_interval) => {}
                    _ = cancel.cancelled() => {
                        debug!("tail reader cancelled while idle");
                        return Ok(None);
                    }
                }
            }
        }
    }

    /// 소스 파일이 여전히 존재하고 잘리지 않았는지 확인합니다.
    ///
    /// 오프셋 기반 검사라서 같은 길이 이상으로 교체된 파일은 잡지
    /// 못합니다. 삭제와 truncation은 잡습니다.
    async fn check_source(&self) -> Result<(), IngestError> {
        let metadata =
            tokio::fs::metadata(&self.path)
                .await
                .map_err(|e| IngestError::SourceLost {
                    path: self.path.display().to_string(),
                    reason: if e.kind() == std::io::ErrorKind::NotFound {
                        "file removed".to_owned()
                    } else {
                        e.to_string()
                    },
                })?;

        if metadata.len() < self.offset {
            return Err(IngestError::SourceLost {
                path: self.path.display().to_string(),
                reason: format!(
                    "file truncated: length {} below read offset {}",
                    metadata.len(),
                    self.offset
                ),
            });
        }

        Ok(())
    }
}
