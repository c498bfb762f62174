//! 파일 탐색 모듈
//!
//! 입력 폴더에 glob 마스크를 적용하여 처리할 로그 파일 목록을 만듭니다.

use glob::Pattern;
use std::path::{Path, PathBuf};

use crate::error::{ExtractError, Result};

/// 기본 입력 폴더
pub const DEFAULT_DIRECTORY: &str = "channels";

/// 기본 파일 마스크
pub const DEFAULT_MASK: &str = "*.log*";

/// 탐색 결과
#[derive(Debug, Default)]
pub struct LocatedFiles {
    /// 마스크와 일치하는 파일 경로 (glob 순서 = 알파벳 순)
    pub files: Vec<PathBuf>,
    /// 탐색 중 읽을 수 없었던 항목
    pub skipped: Vec<ExtractError>,
}

/// 폴더 + 마스크로 구성된 파일 탐색기
#[derive(Debug, Clone)]
pub struct FileLocator {
    directory: PathBuf,
    pattern: Pattern,
}

impl FileLocator {
    /// 새 파일 탐색기 생성
    ///
    /// # Arguments
    /// * `directory` - 탐색할 폴더
    /// * `mask` - 파일 이름 글로브 마스크 (예: "*.log*")
    ///
    /// # Returns
    /// 마스크가 유효하면 `FileLocator`, 아니면 `InvalidPattern` 에러
    ///
    /// # Examples
    /// ```
    /// use logextract::pattern::FileLocator;
    ///
    /// let locator = FileLocator::new("channels", "*.log*").unwrap();
    /// assert!(locator.matches("access.log.gz"));
    /// assert!(!locator.matches("access.txt"));
    /// ```
    pub fn new(directory: impl Into<PathBuf>, mask: &str) -> Result<Self> {
        let pattern = Pattern::new(mask).map_err(|e| ExtractError::InvalidPattern {
            pattern: mask.to_string(),
            reason: e.msg.to_string(),
        })?;

        Ok(Self {
            directory: directory.into(),
            pattern,
        })
    }

    /// 파일 이름이 마스크와 일치하는지 확인
    pub fn matches(&self, file_name: &str) -> bool {
        self.pattern.matches(file_name)
    }

    /// 폴더를 탐색하여 마스크와 일치하는 파일 목록 반환
    ///
    /// 폴더가 없으면 빈 목록을 반환합니다. 마스크와 일치하는 하위 폴더는 제외됩니다.
    pub fn locate(&self) -> Result<LocatedFiles> {
        // 폴더 이름 안의 메타 문자는 리터럴로 취급
        let escaped_dir = Pattern::escape(&self.directory.to_string_lossy());
        let full_pattern = Path::new(&escaped_dir)
            .join(self.pattern.as_str())
            .to_string_lossy()
            .into_owned();

        let paths = glob::glob(&full_pattern).map_err(|e| ExtractError::InvalidPattern {
            pattern: full_pattern.clone(),
            reason: e.msg.to_string(),
        })?;

        let mut located = LocatedFiles::default();
        for entry in paths {
            match entry {
                Ok(path) if path.is_dir() => continue,
                Ok(path) => located.files.push(path),
                Err(e) => located.skipped.push(ExtractError::FileOpen {
                    file: e.path().to_path_buf(),
                    reason: e.error().to_string(),
                }),
            }
        }

        Ok(located)
    }
}
