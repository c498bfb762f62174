//! logextract - LOG USER EXTRACTOR
//!
//! 폴더 내 로그 파일(일반 텍스트 또는 gzip)의 JSON 라인에서 `remoteUser`와 `country_code`를
//! 추출하고, 중복을 제거하여 하나의 출력 파일로 저장하는 CLI 도구입니다.
//!
//! # 처리 흐름
//!
//! 1. **파일 탐색**: 입력 폴더에 glob 마스크(`*.log*`) 적용
//! 2. **디코더 선택**: `.gz` 확장자면 gzip 압축 해제
//! 3. **라인 처리**: JSON 파싱 → 필드 추출 → 포맷 → 중복 제거 집합에 삽입
//! 4. **출력**: 유일 레코드를 출력 파일에 기록
//!
//! # 출력 형식
//!
//! ```text
//! remoteUser: alice
//! country_code: US
//!
//! ```
//!
//! # 예제
//!
//! ```bash
//! # 기본 사용법 (channels/*.log* → output.txt)
//! logextract
//!
//! # 정렬된 출력
//! logextract -i ./logs -o users.txt --order sorted
//! ```

pub mod cli;
pub mod decoder;
pub mod dedup;
pub mod error;
pub mod pattern;
pub mod processor;
pub mod stats;
pub mod writer;

// Re-exports for convenient access
pub use cli::{Args, OutputOrder};
pub use decoder::{open_reader, Encoding};
pub use dedup::UniqueLineSet;
pub use error::{ExtractError, Result};
pub use pattern::{FileLocator, LocatedFiles};
pub use processor::{
    extract_line, process_file, process_stream, LogRecord, ProcessResult, StreamReport,
};
pub use stats::{format_bytes, format_duration, Statistics};
pub use writer::OutputFile;
