//! CLI 인자 파싱 모듈
//!
//! clap을 사용한 명령줄 인자 정의 및 파싱을 담당합니다.
//! 인자 없이 실행하면 `channels/*.log*` → `output.txt` 기본 동작을 수행합니다.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// 출력 레코드 순서
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputOrder {
    /// 처음 등장한 순서
    #[default]
    FirstSeen,
    /// 사전순 정렬
    Sorted,
}

impl std::fmt::Display for OutputOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputOrder::FirstSeen => write!(f, "first-seen"),
            OutputOrder::Sorted => write!(f, "sorted"),
        }
    }
}

/// logextract CLI 인자 구조체
#[derive(Parser, Debug)]
#[command(
    name = "logextract",
    author = "YourName <your@email.com>",
    version,
    about = "LOG USER EXTRACTOR - 로그 파일에서 remoteUser/country_code를 중복 없이 추출하는 CLI 도구",
    long_about = r#"
LOG USER EXTRACTOR
==================

입력 폴더에서 마스크와 일치하는 로그 파일(일반 또는 .gz)을 읽어
각 JSON 라인의 remoteUser / country_code 필드를 추출하고,
중복을 제거하여 하나의 출력 파일로 저장합니다.

출력 레코드 형식:
  remoteUser: <remoteUser>
  country_code: <country_code>
  (빈 줄)

예제:
  logextract
  logextract -i ./channels -o users.txt
  logextract --pattern "*.log.gz" --order sorted
  logextract --dry-run
  logextract --verbose --log errors.log
"#
)]
pub struct Args {
    /// 로그 파일들이 있는 입력 폴더 경로
    #[arg(short, long, default_value = crate::pattern::DEFAULT_DIRECTORY)]
    pub input: PathBuf,

    /// 생성될 출력 파일 경로 (항상 새로 생성)
    #[arg(short, long, default_value = "output.txt")]
    pub output: PathBuf,

    /// 파일 이름 마스크 (glob 형식, 예: "*.log*", "access-*.log.gz")
    #[arg(short, long, default_value = crate::pattern::DEFAULT_MASK)]
    pub pattern: String,

    /// 출력 레코드 순서
    #[arg(long, value_enum, default_value_t = OutputOrder::FirstSeen)]
    pub order: OutputOrder,

    /// 상세 출력 모드
    #[arg(short, long)]
    pub verbose: bool,

    /// 헤더, 진행률, 통계 출력 생략
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// 실제 추출 없이 처리될 파일 목록만 표시
    #[arg(long)]
    pub dry_run: bool,

    /// 에러 로그 파일 경로
    #[arg(long)]
    pub log: Option<PathBuf>,
}
