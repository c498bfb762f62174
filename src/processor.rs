//! 로그 라인 처리 모듈
//!
//! 스트림을 라인 단위로 읽어 JSON을 파싱하고, 필드를 추출·포맷하여 중복 제거 집합에 넣습니다.

use serde::de::{IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::io::BufRead;
use std::path::{Path, PathBuf};

use crate::decoder::open_reader;
use crate::dedup::UniqueLineSet;
use crate::error::{ExtractError, Result};

/// 입력 라인 하나에 대응하는 로그 레코드
///
/// 키 이름은 ASCII 대소문자를 구분하지 않으며, 같은 키가 여러 번 나오면 마지막 값이 남습니다.
#[derive(Debug, Default, PartialEq)]
pub struct LogRecord {
    /// 사용자 식별자 (없음 / null / 빈 문자열은 모두 "사용자 없음")
    pub remote_user: Option<String>,
    /// 국가 코드 (없거나 null이면 빈 문자열)
    pub country_code: String,
}

/// 인식하는 필드
enum Field {
    RemoteUser,
    CountryCode,
    Other,
}

impl Field {
    fn from_key(key: &str) -> Self {
        if key.eq_ignore_ascii_case("remoteUser") {
            Field::RemoteUser
        } else if key.eq_ignore_ascii_case("country_code") {
            Field::CountryCode
        } else {
            Field::Other
        }
    }
}

struct LogRecordVisitor;

impl<'de> Visitor<'de> for LogRecordVisitor {
    type Value = LogRecord;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a log record object")
    }

    fn visit_map<A>(self, mut map: A) -> std::result::Result<LogRecord, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut record = LogRecord::default();
        while let Some(key) = map.next_key::<String>()? {
            match Field::from_key(&key) {
                Field::RemoteUser => record.remote_user = map.next_value()?,
                // null은 기존 값을 유지
                Field::CountryCode => {
                    if let Some(code) = map.next_value::<Option<String>>()? {
                        record.country_code = code;
                    }
                }
                Field::Other => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }
        Ok(record)
    }
}

impl<'de> Deserialize<'de> for LogRecord {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(LogRecordVisitor)
    }
}

impl LogRecord {
    /// 출력 레코드 포맷
    ///
    /// # Returns
    /// `remoteUser`가 비어 있지 않으면 `"remoteUser: <u>\ncountry_code: <c>\n\n"`, 아니면 `None`
    ///
    /// # Examples
    /// ```
    /// use logextract::processor::LogRecord;
    ///
    /// let record = LogRecord {
    ///     remote_user: Some("alice".to_string()),
    ///     country_code: String::new(),
    /// };
    /// assert_eq!(
    ///     record.format_output().as_deref(),
    ///     Some("remoteUser: alice\ncountry_code: \n\n")
    /// );
    /// ```
    pub fn format_output(&self) -> Option<String> {
        match self.remote_user.as_deref() {
            Some(user) if !user.is_empty() => Some(format!(
                "remoteUser: {}\ncountry_code: {}\n\n",
                user, self.country_code
            )),
            _ => None,
        }
    }
}

/// 라인 하나를 파싱하여 출력 레코드 반환
///
/// JSON `null` 라인은 레코드 없음으로 취급합니다.
/// 잘못된 UTF-8 바이트는 U+FFFD로 바꾼 뒤 파싱합니다.
pub fn extract_line(line: &[u8]) -> std::result::Result<Option<String>, serde_json::Error> {
    let text = String::from_utf8_lossy(line);
    let record: Option<LogRecord> = serde_json::from_str(&text)?;
    Ok(record.and_then(|r| r.format_output()))
}

/// 스트림 처리 결과
#[derive(Debug, Default)]
pub struct StreamReport {
    /// 읽은 라인 수 (빈 라인 포함)
    pub lines_read: usize,
    /// 빈 라인 수
    pub blank_lines: usize,
    /// 추출된 레코드 수 (중복 포함)
    pub records_extracted: usize,
    /// 새로 추가된 유일 레코드 수
    pub records_added: usize,
    /// 라인별 JSON 파싱 에러
    pub line_errors: Vec<ExtractError>,
    /// 스트림 읽기 에러 (발생 시 해당 파일 처리 중단)
    pub read_error: Option<ExtractError>,
}

impl StreamReport {
    /// 이미 집합에 있던 레코드 수
    pub fn duplicates(&self) -> usize {
        self.records_extracted - self.records_added
    }

    /// 에러 없이 끝까지 읽었는지 확인
    pub fn is_clean(&self) -> bool {
        self.line_errors.is_empty() && self.read_error.is_none()
    }
}

/// 라인 종결자(`\n`, 앞선 `\r`) 제거
fn trim_terminator(buf: &[u8]) -> &[u8] {
    let line = buf.strip_suffix(b"\n").unwrap_or(buf);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// 스트림을 끝까지 읽으며 레코드를 집합에 추가
///
/// # Arguments
/// * `reader` - 압축 해제된 입력 스트림
/// * `source` - 진단 메시지에 표시할 파일 경로
/// * `unique` - 실행 전체에서 공유되는 중복 제거 집합
///
/// # Returns
/// 라인/레코드 카운트와 발생한 에러를 담은 `StreamReport`
pub fn process_stream<R: BufRead>(
    mut reader: R,
    source: &Path,
    unique: &mut UniqueLineSet,
) -> StreamReport {
    let mut report = StreamReport::default();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                report.read_error = Some(ExtractError::Read {
                    file: source.to_path_buf(),
                    reason: e.to_string(),
                });
                break;
            }
        }

        report.lines_read += 1;
        let line = trim_terminator(&buf);
        if line.is_empty() {
            report.blank_lines += 1;
            continue;
        }

        match extract_line(line) {
            Ok(Some(record)) => {
                report.records_extracted += 1;
                if unique.insert(record) {
                    report.records_added += 1;
                }
            }
            Ok(None) => {}
            Err(e) => report.line_errors.push(ExtractError::JsonDecode {
                file: source.to_path_buf(),
                line: report.lines_read,
                reason: e.to_string(),
            }),
        }
    }

    report
}

/// 파일 처리 결과
#[derive(Debug)]
pub struct ProcessResult {
    /// 처리된 파일 경로
    pub path: PathBuf,
    /// 스트림 처리 결과
    pub report: StreamReport,
}

/// 단일 로그 파일 처리
///
/// 파일을 열 수 없거나 gzip 헤더가 잘못되었으면 에러를 반환하며, 호출 측에서 건너뜁니다.
pub fn process_file(path: &Path, unique: &mut UniqueLineSet) -> Result<ProcessResult> {
    let reader = open_reader(path)?;
    let report = process_stream(reader, path, unique);

    Ok(ProcessResult {
        path: path.to_path_buf(),
        report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Cursor, Read};

    fn run(input: &str) -> (StreamReport, UniqueLineSet) {
        let mut unique = UniqueLineSet::new();
        let report = process_stream(Cursor::new(input), Path::new("test.log"), &mut unique);
        (report, unique)
    }

    #[test]
    fn test_extract_line_full_record() {
        let record = extract_line(br#"{"remoteUser":"bob","country_code":"US","ip":"1.2.3.4"}"#)
            .unwrap();
        assert_eq!(
            record.as_deref(),
            Some("remoteUser: bob\ncountry_code: US\n\n")
        );
    }

    #[test]
    fn test_extract_line_missing_country() {
        let record = extract_line(br#"{"remoteUser":"alice"}"#).unwrap();
        assert_eq!(
            record.as_deref(),
            Some("remoteUser: alice\ncountry_code: \n\n")
        );
    }

    #[test]
    fn test_extract_line_null_country() {
        let record = extract_line(br#"{"remoteUser":"alice","country_code":null}"#).unwrap();
        assert_eq!(
            record.as_deref(),
            Some("remoteUser: alice\ncountry_code: \n\n")
        );
    }

    #[test]
    fn test_extract_line_without_user() {
        assert_eq!(extract_line(br#"{"country_code":"US"}"#).unwrap(), None);
        assert_eq!(
            extract_line(br#"{"remoteUser":null,"country_code":"US"}"#).unwrap(),
            None
        );
        assert_eq!(
            extract_line(br#"{"remoteUser":"","country_code":"US"}"#).unwrap(),
            None
        );
        assert_eq!(extract_line(b"null").unwrap(), None);
    }

    #[test]
    fn test_extract_line_errors() {
        assert!(extract_line(br#"{"remoteUser": "bob""#).is_err());
        assert!(extract_line(br#"{"remoteUser": 42}"#).is_err());
        assert!(extract_line(br#"{"remoteUser":"bob","country_code":7}"#).is_err());
        assert!(extract_line(b"[1, 2]").is_err());
        assert!(extract_line(b"   ").is_err());
    }

    #[test]
    fn test_process_stream_dedups_and_skips_blank() {
        let input = concat!(
            "{\"remoteUser\":\"eve\",\"country_code\":\"FR\"}\n",
            "\n",
            "{\"remoteUser\":\"eve\",\"country_code\":\"FR\"}\r\n",
            "{\"remoteUser\":\"eve\",\"country_code\":\"DE\"}",
        );
        let (report, unique) = run(input);

        assert_eq!(report.lines_read, 4);
        assert_eq!(report.blank_lines, 1);
        assert_eq!(report.records_extracted, 3);
        assert_eq!(report.records_added, 2);
        assert_eq!(report.duplicates(), 1);
        assert!(report.is_clean());
        assert_eq!(unique.len(), 2);
    }

    #[test]
    fn test_malformed_line_does_not_stop_scan() {
        let input = concat!(
            "{\"remoteUser\":\"a\"}\n",
            "{broken\n",
            "{\"remoteUser\":\"b\"}\n",
        );
        let (report, unique) = run(input);

        assert_eq!(report.line_errors.len(), 1);
        assert!(matches!(
            report.line_errors[0],
            ExtractError::JsonDecode { line: 2, .. }
        ));
        assert!(report.read_error.is_none());
        assert_eq!(unique.len(), 2);
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let line = b"{\"remoteUser\":\"jos\xe9\",\"country_code\":\"FR\"}";
        let record = extract_line(line).unwrap();
        assert_eq!(
            record.as_deref(),
            Some("remoteUser: jos\u{FFFD}\ncountry_code: FR\n\n")
        );
    }

    #[test]
    fn test_invalid_utf8_line_keeps_stream_going() {
        let mut input = b"{\"remoteUser\":\"".to_vec();
        input.extend_from_slice(&[0xff, 0xfe]);
        input.extend_from_slice(b"\"}\n{\"remoteUser\":\"ok\"}\n");

        let mut unique = UniqueLineSet::new();
        let report = process_stream(Cursor::new(input), Path::new("bin.log"), &mut unique);

        assert!(report.is_clean());
        assert_eq!(unique.len(), 2);
        assert!(unique.contains("remoteUser: \u{FFFD}\u{FFFD}\ncountry_code: \n\n"));
    }

    #[test]
    fn test_duplicate_keys_last_wins() {
        let record =
            extract_line(br#"{"remoteUser":"a","remoteUser":"b","country_code":"US"}"#).unwrap();
        assert_eq!(
            record.as_deref(),
            Some("remoteUser: b\ncountry_code: US\n\n")
        );

        // 마지막 값이 null이면 사용자 없음
        assert_eq!(
            extract_line(br#"{"remoteUser":"a","remoteUser":null}"#).unwrap(),
            None
        );

        // country_code null은 앞선 값을 지우지 않음
        let record =
            extract_line(br#"{"remoteUser":"a","country_code":"KR","country_code":null}"#)
                .unwrap();
        assert_eq!(
            record.as_deref(),
            Some("remoteUser: a\ncountry_code: KR\n\n")
        );
    }

    #[test]
    fn test_keys_match_case_insensitively() {
        let record = extract_line(br#"{"RemoteUser":"amy","COUNTRY_CODE":"JP"}"#).unwrap();
        assert_eq!(
            record.as_deref(),
            Some("remoteUser: amy\ncountry_code: JP\n\n")
        );
    }

    /// 일정 바이트 이후 실패하는 리더
    struct FailingReader {
        data: Cursor<Vec<u8>>,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = self.data.read(buf)?;
            if n == 0 {
                Err(io::Error::new(io::ErrorKind::InvalidData, "corrupt deflate stream"))
            } else {
                Ok(n)
            }
        }
    }

    #[test]
    fn test_read_error_keeps_earlier_records() {
        let reader = io::BufReader::new(FailingReader {
            data: Cursor::new(b"{\"remoteUser\":\"kept\"}\n{\"remoteUser\":\"cut".to_vec()),
        });
        let mut unique = UniqueLineSet::new();
        let report = process_stream(reader, Path::new("bad.log.gz"), &mut unique);

        assert!(matches!(report.read_error, Some(ExtractError::Read { .. })));
        assert!(unique.contains("remoteUser: kept\ncountry_code: \n\n"));
        assert_eq!(unique.len(), 1);
    }
}
