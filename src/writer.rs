//! 출력 파일 모듈
//!
//! 실행 시작 시 출력 파일을 한 번 생성하고, 마지막에 유일 레코드를 기록합니다.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::cli::OutputOrder;
use crate::dedup::UniqueLineSet;
use crate::error::{ExtractError, Result};

/// 출력 대상 파일
pub struct OutputFile<W: Write = File> {
    path: PathBuf,
    writer: BufWriter<W>,
    bytes_written: u64,
}

impl OutputFile<File> {
    /// 출력 파일 생성 (기존 파일은 비워짐)
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path).map_err(|e| ExtractError::OutputCreate {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(Self::from_writer(path, file))
    }
}

impl<W: Write> OutputFile<W> {
    /// 임의의 writer를 출력 대상으로 사용
    pub fn from_writer(path: &Path, inner: W) -> Self {
        Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(inner),
            bytes_written: 0,
        }
    }

    /// 지금까지 기록한 바이트 수
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    fn write_error(&self, e: std::io::Error) -> ExtractError {
        ExtractError::Write {
            path: self.path.clone(),
            reason: e.to_string(),
        }
    }

    /// 레코드 하나를 그대로 기록
    pub fn write_record(&mut self, record: &str) -> Result<()> {
        if let Err(e) = self.writer.write_all(record.as_bytes()) {
            return Err(self.write_error(e));
        }
        self.bytes_written += record.len() as u64;
        Ok(())
    }

    /// 집합의 모든 레코드를 지정한 순서로 기록
    ///
    /// 첫 쓰기 실패에서 즉시 중단하며, 이미 기록된 내용은 그대로 남습니다.
    ///
    /// # Returns
    /// 기록한 레코드 수
    pub fn write_all(&mut self, unique: &UniqueLineSet, order: OutputOrder) -> Result<usize> {
        let records = unique.ordered(order);
        for record in &records {
            self.write_record(record)?;
        }
        Ok(records.len())
    }

    /// 버퍼를 비우고 내부 writer 반환
    pub fn finish(mut self) -> Result<W> {
        if let Err(e) = self.writer.flush() {
            return Err(self.write_error(e));
        }
        let path = self.path.clone();
        self.writer.into_inner().map_err(|e| ExtractError::Write {
            path,
            reason: e.error().to_string(),
        })
    }
}
