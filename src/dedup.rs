//! 중복 제거 모듈
//!
//! 포맷된 출력 레코드를 문자열 완전 일치 기준으로 한 번씩만 보관합니다.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::cli::OutputOrder;

/// 유일한 출력 레코드 집합
///
/// 값은 처음 삽입된 순번을 기억하므로 삽입 순서대로 다시 꺼낼 수 있습니다.
#[derive(Debug, Default)]
pub struct UniqueLineSet {
    entries: HashMap<String, usize>,
}

impl UniqueLineSet {
    /// 빈 집합 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 레코드 삽입
    ///
    /// # Returns
    /// 새로 추가되었으면 `true`, 이미 있었으면 `false`
    pub fn insert(&mut self, record: String) -> bool {
        let next = self.entries.len();
        match self.entries.entry(record) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(next);
                true
            }
        }
    }

    /// 레코드 포함 여부
    pub fn contains(&self, record: &str) -> bool {
        self.entries.contains_key(record)
    }

    /// 유일 레코드 수
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 비어 있는지 확인
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 지정한 순서로 레코드 목록 반환
    pub fn ordered(&self, order: OutputOrder) -> Vec<&str> {
        let mut records: Vec<(&str, usize)> = self
            .entries
            .iter()
            .map(|(record, seq)| (record.as_str(), *seq))
            .collect();

        match order {
            OutputOrder::FirstSeen => records.sort_unstable_by_key(|(_, seq)| *seq),
            OutputOrder::Sorted => records.sort_unstable_by(|a, b| a.0.cmp(b.0)),
        }

        records.into_iter().map(|(record, _)| record).collect()
    }
}
