//! logextract - LOG USER EXTRACTOR
//!
//! 메인 엔트리포인트

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use logextract::{
    cli::Args,
    dedup::UniqueLineSet,
    error::ExtractError,
    pattern::FileLocator,
    processor::{process_file, ProcessResult, StreamReport},
    stats::Statistics,
    writer::OutputFile,
};

fn main() {
    let args = Args::parse();

    // 치명적 에러도 진단만 출력하고 정상 종료
    if let Err(error) = run(&args) {
        println!("{}", format_fatal(&error));
    }
}

/// 치명적 에러 진단 문자열 (원인 체인 포함)
fn format_fatal(error: &anyhow::Error) -> String {
    let mut message = format!("  {} {}", "•".red(), error);
    for cause in error.chain().skip(1) {
        message.push_str(&format!("\n    {}", cause));
    }
    message
}

/// 전체 추출 실행
///
/// 치명적 에러(패턴, 출력 파일 생성/쓰기)만 `Err`로 반환하고 나머지는 진단 후 계속 진행합니다.
fn run(args: &Args) -> Result<Statistics> {
    if !args.quiet {
        print_header(args);
    }

    let locator = FileLocator::new(&args.input, &args.pattern).context("파일 마스크 오류")?;

    // 드라이런은 출력 파일을 건드리지 않음
    if args.dry_run {
        let located = locator.locate().context("파일 검색 실패")?;
        print_dry_run(&located.files);
        return Ok(Statistics::new(located.files.len()));
    }

    let mut output = OutputFile::create(&args.output).context("출력 파일 생성 실패")?;
    let located = locator.locate().context("파일 검색 실패")?;

    let reporter = Reporter::new(args, located.files.len());
    let mut errors: Vec<ExtractError> = Vec::new();
    for error in located.skipped {
        reporter.diagnostic(&error);
        errors.push(error);
    }

    if located.files.is_empty() && !args.quiet {
        println!("{}", "⚠️ 처리할 로그 파일이 없습니다.".yellow());
    }

    let mut stats = Statistics::new(located.files.len());
    let mut unique = UniqueLineSet::new();
    errors.extend(extract_files(
        &located.files,
        &mut unique,
        &mut stats,
        &reporter,
    ));
    reporter.finish();

    if !args.quiet {
        println!("\n{}", "💾 출력 파일 저장 중...".bright_cyan());
    }

    let written = output
        .write_all(&unique, args.order)
        .context("출력 파일 쓰기 실패")?;
    let bytes_written = output.bytes_written();
    output.finish().context("출력 파일 쓰기 실패")?;
    stats.record_output(written, bytes_written);

    if let Some(ref log_path) = args.log {
        write_error_log(log_path, &errors)?;
    }

    if !args.quiet {
        stats.print_summary();
        println!("\n{} 저장 완료: {:?}\n", "✅".bright_green(), args.output);
    }

    Ok(stats)
}

/// 파일 목록을 순서대로 처리
///
/// # Returns
/// 발생한 모든 복구 가능 에러 (진단 출력은 이미 완료됨)
fn extract_files(
    files: &[PathBuf],
    unique: &mut UniqueLineSet,
    stats: &mut Statistics,
    reporter: &Reporter,
) -> Vec<ExtractError> {
    let mut errors = Vec::new();

    for path in files {
        match process_file(path, unique) {
            Ok(ProcessResult { path, report }) => {
                stats.record_file(&report);
                reporter.processed(&path, &report);

                for error in report.line_errors {
                    reporter.diagnostic(&error);
                    errors.push(error);
                }
                // 읽기 에러는 파일 처리가 끝난 뒤 한 번만 보고
                if let Some(error) = report.read_error {
                    reporter.diagnostic(&error);
                    errors.push(error);
                }
            }
            Err(error) => {
                stats.increment_skipped();
                reporter.diagnostic(&error);
                errors.push(error);
            }
        }
        reporter.inc();
    }

    errors
}

/// 진행률 바와 진단 출력 담당
struct Reporter {
    progress: Option<ProgressBar>,
    verbose: bool,
}

impl Reporter {
    fn new(args: &Args, total: usize) -> Self {
        let progress = if args.quiet || total == 0 {
            None
        } else {
            println!("\n{}", "⚡ 로그 처리 중...".bright_cyan());
            Some(create_progress_bar(total))
        };

        Self {
            progress,
            verbose: args.verbose,
        }
    }

    /// 진행률 바를 가린 채로 stdout 출력
    fn print(&self, line: String) {
        match &self.progress {
            Some(pb) => pb.suspend(|| println!("{}", line)),
            None => println!("{}", line),
        }
    }

    fn diagnostic(&self, error: &ExtractError) {
        self.print(format!("  {} {}", "•".red(), error));
    }

    fn processed(&self, path: &Path, report: &StreamReport) {
        if self.verbose {
            let mark = if report.is_clean() {
                "✓".green()
            } else {
                "⚠".yellow()
            };
            self.print(format!(
                "  {} {:?} (+{})",
                mark,
                path.file_name().unwrap_or_default(),
                report.records_added
            ));
        }
    }

    fn inc(&self) {
        if let Some(pb) = &self.progress {
            pb.inc(1);
        }
    }

    fn finish(&self) {
        if let Some(pb) = &self.progress {
            pb.finish_with_message("완료!");
        }
    }
}

/// 헤더 출력
fn print_header(args: &Args) {
    println!("\n{}", "═".repeat(50).bright_blue());
    println!("{}", " 🚀 LOG USER EXTRACTOR".bright_white().bold());
    println!("{}", "═".repeat(50).bright_blue());
    println!("  {} 입력 폴더: {:?}", "📂".bright_cyan(), args.input);
    println!("  {} 파일 마스크: {}", "🔍".bright_magenta(), args.pattern);

    if !args.dry_run {
        println!("  {} 출력 파일: {:?}", "📄".bright_green(), args.output);
        println!("  {} 출력 순서: {}", "⚙️".bright_yellow(), args.order);
    } else {
        println!(
            "  {} {}",
            "⚠️".bright_yellow(),
            "드라이런 모드 (실제 추출 없음)".yellow()
        );
    }

    println!("{}", "═".repeat(50).bright_blue());
    println!("\n{}", "📁 파일 검색 중...".bright_cyan());
}

/// 드라이런 출력
fn print_dry_run(files: &[PathBuf]) {
    println!("\n{}", "📋 처리 예정 파일 목록:".bright_cyan());
    for (i, path) in files.iter().enumerate() {
        println!("  {}. {:?}", i + 1, path.file_name().unwrap_or_default());
    }
    println!(
        "\n{} 총 {} 개의 파일이 처리될 예정입니다.",
        "ℹ️".bright_blue(),
        files.len().to_string().bright_green()
    );
}

/// 진행률 바 생성
fn create_progress_bar(total: usize) -> ProgressBar {
    let pb = ProgressBar::new(total as u64);
    if let Ok(style) = ProgressStyle::default_bar().template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
    ) {
        pb.set_style(style.progress_chars("█▓▒░"));
    }
    pb
}

/// 에러 로그 파일 작성
fn write_error_log(log_path: &Path, errors: &[ExtractError]) -> Result<()> {
    let mut log_file = File::create(log_path)
        .with_context(|| format!("에러 로그 파일 생성 실패: {:?}", log_path))?;

    writeln!(log_file, "logextract 에러 로그")?;
    writeln!(log_file, "생성 시간: {}", chrono_now())?;
    writeln!(log_file, "총 에러 수: {}", errors.len())?;
    writeln!(log_file, "{}", "=".repeat(50))?;

    for error in errors {
        writeln!(log_file, "{}", error)?;
    }

    println!("\n{} 에러 로그 저장: {:?}", "📝".bright_cyan(), log_path);

    Ok(())
}

/// 현재 시간 문자열 반환
fn chrono_now() -> String {
    use std::time::SystemTime;
    let now = SystemTime::now();
    let duration = now
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default();
    format!("Unix timestamp: {}", duration.as_secs())
}
