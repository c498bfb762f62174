//! 에러 타입 정의 모듈
//!
//! logextract에서 발생할 수 있는 모든 에러 타입을 정의합니다.
//! 치명적 에러와 건너뛰기 가능한 에러의 구분은 [`ExtractError::is_fatal`]이 담당합니다.

use std::path::PathBuf;
use thiserror::Error;

/// logextract에서 발생할 수 있는 에러 타입
#[derive(Error, Debug)]
pub enum ExtractError {
    /// 유효하지 않은 글로브 패턴 (치명적)
    #[error("유효하지 않은 패턴 ({pattern}): {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// 출력 파일 생성 실패 (치명적)
    #[error("출력 파일을 생성할 수 없습니다 ({path}): {reason}")]
    OutputCreate { path: PathBuf, reason: String },

    /// 출력 파일 쓰기 실패 (치명적)
    #[error("파일 쓰기 실패 ({path}): {reason}")]
    Write { path: PathBuf, reason: String },

    /// 입력 파일 열기 실패 (파일 건너뜀)
    #[error("파일을 열 수 없습니다 ({file}): {reason}")]
    FileOpen { file: PathBuf, reason: String },

    /// gzip 헤더 오류 (파일 건너뜀)
    #[error("gzip 헤더가 올바르지 않습니다 ({file}): {reason}")]
    GzipHeader { file: PathBuf, reason: String },

    /// JSON 라인 파싱 실패 (라인 건너뜀)
    #[error("JSON 파싱 실패 ({file}:{line}): {reason}")]
    JsonDecode {
        file: PathBuf,
        line: usize,
        reason: String,
    },

    /// 스트림 읽기 실패 (해당 파일의 나머지 건너뜀)
    #[error("파일 읽기 실패 ({file}): {reason}")]
    Read { file: PathBuf, reason: String },
}

impl ExtractError {
    /// 실행 전체를 중단해야 하는 에러인지 확인
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ExtractError::InvalidPattern { .. }
                | ExtractError::OutputCreate { .. }
                | ExtractError::Write { .. }
        )
    }
}

/// logextract 결과 타입 별칭
pub type Result<T> = std::result::Result<T, ExtractError>;
