//! 디코더 선택 모듈
//!
//! 확장자에 따라 일반 파일 리더 또는 gzip 압축 해제 리더를 선택합니다.

use flate2::bufread::MultiGzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{ExtractError, Result};

/// gzip 매직 바이트
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// gzip 고정 헤더 길이 (ID1 ID2 CM FLG MTIME(4) XFL OS)
const GZIP_FIXED_HEADER_LEN: usize = 10;

/// deflate 압축 방식 (CM)
const GZIP_CM_DEFLATE: u8 = 8;

/// 입력 스트림 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// 일반 텍스트
    Plain,
    /// gzip 압축
    Gzip,
}

impl Encoding {
    /// 파일 확장자로 인코딩 판별 (정확히 `gz`일 때만 gzip)
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|s| s.to_str()) {
            Some("gz") => Encoding::Gzip,
            _ => Encoding::Plain,
        }
    }
}

/// 파일을 열어 라인 단위로 읽을 수 있는 리더 반환
///
/// 반환된 리더가 drop되면 파일 핸들도 함께 닫힙니다.
///
/// # Arguments
/// * `path` - 입력 파일 경로
///
/// # Returns
/// 버퍼링된 리더 또는 `FileOpen` / `GzipHeader` 에러
pub fn open_reader(path: &Path) -> Result<Box<dyn BufRead>> {
    let file = File::open(path).map_err(|e| ExtractError::FileOpen {
        file: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let mut reader = BufReader::new(file);

    match Encoding::from_path(path) {
        Encoding::Plain => Ok(Box::new(reader)),
        Encoding::Gzip => {
            check_gzip_header(&mut reader, path)?;
            // 생성 시점에 FEXTRA/FNAME/FCOMMENT/FHCRC까지 헤더 전체를 파싱함
            let decoder = MultiGzDecoder::new(reader);
            if decoder.header().is_none() {
                return Err(ExtractError::GzipHeader {
                    file: path.to_path_buf(),
                    reason: "gzip 헤더 파싱 실패".to_string(),
                });
            }
            Ok(Box::new(BufReader::new(decoder)))
        }
    }
}

/// 스트림 앞부분의 gzip 고정 헤더 확인 (소비하지 않음)
fn check_gzip_header<R: BufRead>(reader: &mut R, path: &Path) -> Result<()> {
    let header_error = |reason: String| ExtractError::GzipHeader {
        file: path.to_path_buf(),
        reason,
    };

    let buf = reader.fill_buf().map_err(|e| header_error(e.to_string()))?;
    if buf.is_empty() {
        return Err(header_error("빈 파일".to_string()));
    }
    if buf.len() < GZIP_MAGIC.len() || buf[..GZIP_MAGIC.len()] != GZIP_MAGIC {
        return Err(header_error("gzip 매직 바이트 불일치".to_string()));
    }
    if buf.len() < GZIP_FIXED_HEADER_LEN {
        return Err(header_error("gzip 헤더가 너무 짧음".to_string()));
    }
    if buf[2] != GZIP_CM_DEFLATE {
        return Err(header_error(format!("지원하지 않는 압축 방식: {}", buf[2])));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::fs;
    use std::io::{Read, Write};
    use tempfile::TempDir;

    fn gzip_bytes(content: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(content).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_encoding_from_extension() {
        assert_eq!(Encoding::from_path(Path::new("a.log.gz")), Encoding::Gzip);
        assert_eq!(Encoding::from_path(Path::new("a.log")), Encoding::Plain);
        assert_eq!(Encoding::from_path(Path::new("a.log.GZ")), Encoding::Plain);
        assert_eq!(Encoding::from_path(Path::new("a.log.gzip")), Encoding::Plain);
        assert_eq!(Encoding::from_path(Path::new("a.log.1")), Encoding::Plain);
    }

    #[test]
    fn test_open_gzip_reader() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("a.log.gz");
        fs::write(&path, gzip_bytes(b"hello\nworld\n")).unwrap();

        let mut content = String::new();
        open_reader(&path)
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "hello\nworld\n");
    }

    #[test]
    fn test_concatenated_gzip_members() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("a.log.gz");
        let mut bytes = gzip_bytes(b"first\n");
        bytes.extend(gzip_bytes(b"second\n"));
        fs::write(&path, bytes).unwrap();

        let mut content = String::new();
        open_reader(&path)
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "first\nsecond\n");
    }

    #[test]
    fn test_invalid_gzip_header() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("fake.log.gz");
        fs::write(&path, "{\"remoteUser\":\"x\"}\n").unwrap();

        let result = open_reader(&path);
        assert!(matches!(result, Err(ExtractError::GzipHeader { .. })));
    }

    #[test]
    fn test_unknown_compression_method() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("odd.log.gz");
        let mut bytes = gzip_bytes(b"{\"remoteUser\":\"x\"}\n");
        bytes[2] = 7;
        fs::write(&path, bytes).unwrap();

        assert!(matches!(
            open_reader(&path),
            Err(ExtractError::GzipHeader { .. })
        ));
    }

    #[test]
    fn test_truncated_header() {
        let temp_dir = TempDir::new().unwrap();
        let short = temp_dir.path().join("short.log.gz");
        fs::write(&short, [0x1f, 0x8b, 0x08, 0x00]).unwrap();

        // FNAME 플래그가 있지만 이름이 NUL로 끝나지 않음
        let unterminated = temp_dir.path().join("name.log.gz");
        let mut bytes = vec![0x1f, 0x8b, 0x08, 0x08, 0, 0, 0, 0, 0, 0x03];
        bytes.extend_from_slice(b"access.log");
        fs::write(&unterminated, bytes).unwrap();

        assert!(matches!(
            open_reader(&short),
            Err(ExtractError::GzipHeader { .. })
        ));
        assert!(matches!(
            open_reader(&unterminated),
            Err(ExtractError::GzipHeader { .. })
        ));
    }

    #[test]
    fn test_empty_gzip_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("empty.log.gz");
        fs::write(&path, "").unwrap();

        assert!(matches!(
            open_reader(&path),
            Err(ExtractError::GzipHeader { .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = open_reader(&temp_dir.path().join("missing.log"));
        assert!(matches!(result, Err(ExtractError::FileOpen { .. })));
    }
}
