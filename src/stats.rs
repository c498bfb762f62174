//! 통계 및 유틸리티 모듈
//!
//! 처리 통계 수집 및 포맷팅을 담당합니다.

use colored::Colorize;
use std::time::{Duration, Instant};

use crate::processor::StreamReport;

/// 처리 통계 구조체
#[derive(Debug, Default)]
pub struct Statistics {
    /// 발견된 파일 수
    pub total_files: usize,
    /// 끝까지 처리된 파일 수
    pub files_processed: usize,
    /// 열기/헤더 오류로 건너뛴 파일 수
    pub files_skipped: usize,
    /// 읽은 라인 수
    pub lines_read: usize,
    /// 빈 라인 수
    pub blank_lines: usize,
    /// JSON 파싱 에러 수
    pub json_errors: usize,
    /// 스트림 읽기 에러 수
    pub read_errors: usize,
    /// 추출된 레코드 수 (중복 포함)
    pub records_extracted: usize,
    /// 중복 레코드 수
    pub duplicates: usize,
    /// 출력된 유일 레코드 수
    pub unique_records: usize,
    /// 쓴 총 바이트
    pub bytes_written: u64,
    /// 처리 시작 시간
    start_time: Option<Instant>,
}

impl Statistics {
    /// 새 통계 인스턴스 생성
    pub fn new(total_files: usize) -> Self {
        Self {
            total_files,
            start_time: Some(Instant::now()),
            ..Default::default()
        }
    }

    /// 파일 하나의 처리 결과 반영
    pub fn record_file(&mut self, report: &StreamReport) {
        self.files_processed += 1;
        self.lines_read += report.lines_read;
        self.blank_lines += report.blank_lines;
        self.json_errors += report.line_errors.len();
        self.records_extracted += report.records_extracted;
        self.duplicates += report.duplicates();
        if report.read_error.is_some() {
            self.read_errors += 1;
        }
    }

    /// 건너뛴 파일 카운트 증가
    pub fn increment_skipped(&mut self) {
        self.files_skipped += 1;
    }

    /// 출력 결과 반영
    pub fn record_output(&mut self, unique_records: usize, bytes_written: u64) {
        self.unique_records = unique_records;
        self.bytes_written = bytes_written;
    }

    /// 복구 가능한 에러 총합
    pub fn error_count(&self) -> usize {
        self.files_skipped + self.json_errors + self.read_errors
    }

    /// 경과 시간 반환
    pub fn elapsed(&self) -> Duration {
        self.start_time
            .map(|t| t.elapsed())
            .unwrap_or(Duration::ZERO)
    }

    /// 처리 통계 요약 출력
    pub fn print_summary(&self) {
        println!("\n{}", "═".repeat(50).bright_blue());
        println!("{}", " 📊 처리 통계".bright_white().bold());
        println!("{}", "═".repeat(50).bright_blue());

        println!(
            "  {} 전체 파일:    {}",
            "📁".bright_cyan(),
            self.total_files
        );
        println!(
            "  {} 처리 완료:    {}",
            "✅".bright_green(),
            self.files_processed.to_string().green()
        );

        if self.files_skipped > 0 {
            println!(
                "  {} 건너뜀:       {}",
                "❌".bright_red(),
                self.files_skipped.to_string().red()
            );
        }

        println!(
            "  {} 읽은 라인:    {} (빈 라인 {})",
            "📄".bright_white(),
            self.lines_read,
            self.blank_lines
        );

        let errors = self.error_count();
        if errors > 0 {
            println!(
                "  {} 오류 합계:    {} (JSON {} / 읽기 {})",
                "⚠️".bright_yellow(),
                errors.to_string().yellow(),
                self.json_errors,
                self.read_errors
            );
        }

        println!(
            "  {} 추출 레코드:  {} (중복 {})",
            "🎯".bright_magenta(),
            self.records_extracted,
            self.duplicates
        );
        println!(
            "  {} 유일 레코드:  {}",
            "🧮".bright_green(),
            self.unique_records.to_string().bright_green()
        );
        println!(
            "  {} 출력 용량:    {}",
            "📤".bright_magenta(),
            format_bytes(self.bytes_written)
        );
        println!(
            "  {} 처리 시간:    {}",
            "⏱️".bright_cyan(),
            format_duration(self.elapsed())
        );

        println!("{}", "═".repeat(50).bright_blue());
    }
}

/// 바이트를 읽기 쉬운 형식으로 변환
///
/// # Examples
/// ```
/// use logextract::stats::format_bytes;
///
/// assert_eq!(format_bytes(500), "500 B");
/// assert_eq!(format_bytes(1024), "1.00 KB");
/// assert_eq!(format_bytes(1048576), "1.00 MB");
/// ```
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// 경과 시간을 읽기 쉬운 형식으로 변환
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let millis = duration.subsec_millis();

    if secs >= 3600 {
        let hours = secs / 3600;
        let mins = (secs % 3600) / 60;
        format!("{}시간 {}분", hours, mins)
    } else if secs >= 60 {
        let mins = secs / 60;
        let remaining_secs = secs % 60;
        format!("{}분 {}초", mins, remaining_secs)
    } else if secs > 0 {
        format!("{}.{:03}초", secs, millis)
    } else {
        format!("{}ms", millis)
    }
}
