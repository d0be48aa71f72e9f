use serde::{Deserialize, Serialize};

use crate::models::report::{Bucket, FileReport};

/// 文件夹级别的汇总
///
/// 唯一的修改入口是 [`BatchSummary::record`]，保证
/// `total == clean + fix_id + fix_example + fix_structure + review == files.len()`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub total: usize,
    pub clean: usize,
    pub fix_id: usize,
    pub fix_example: usize,
    pub fix_structure: usize,
    pub review: usize,
    pub files: Vec<FileReport>,
}

impl BatchSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一个文件：`total` 和对应桶各加一
    pub fn record(&mut self, report: FileReport) {
        self.total += 1;
        match report.bucket {
            Bucket::Clean => self.clean += 1,
            Bucket::FixId => self.fix_id += 1,
            Bucket::FixExample => self.fix_example += 1,
            Bucket::FixStructure => self.fix_structure += 1,
            Bucket::Review => self.review += 1,
        }
        self.files.push(report);
    }

    /// 合并另一份汇总（保持 `other` 中文件的顺序，追加在后面）
    pub fn merge(&mut self, other: BatchSummary) {
        for report in other.files {
            self.record(report);
        }
    }

    pub fn count(&self, bucket: Bucket) -> usize {
        match bucket {
            Bucket::Clean => self.clean,
            Bucket::FixId => self.fix_id,
            Bucket::FixExample => self.fix_example,
            Bucket::FixStructure => self.fix_structure,
            Bucket::Review => self.review,
        }
    }

    /// 计数是否自洽
    pub fn is_consistent(&self) -> bool {
        let bucket_sum =
            self.clean + self.fix_id + self.fix_example + self.fix_structure + self.review;
        self.total == bucket_sum && self.total == self.files.len()
    }
}

impl FromIterator<FileReport> for BatchSummary {
    fn from_iter<I: IntoIterator<Item = FileReport>>(iter: I) -> Self {
        let mut summary = BatchSummary::new();
        for report in iter {
            summary.record(report);
        }
        summary
    }
}

impl Extend<FileReport> for BatchSummary {
    fn extend<I: IntoIterator<Item = FileReport>>(&mut self, iter: I) {
        for report in iter {
            self.record(report);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::issue::IssueKind;

    fn report_in(bucket: Bucket, name: &str) -> FileReport {
        let mut report = FileReport::failed(name, name, IssueKind::Unparsable, "x", None);
        report.bucket = bucket;
        report
    }

    #[test]
    fn test_record_keeps_counts_consistent() {
        let mut summary = BatchSummary::new();
        summary.record(report_in(Bucket::Clean, "a"));
        summary.record(report_in(Bucket::FixId, "b"));
        summary.record(report_in(Bucket::Review, "c"));
        summary.record(report_in(Bucket::Clean, "d"));

        assert_eq!(summary.total, 4);
        assert_eq!(summary.count(Bucket::Clean), 2);
        assert_eq!(summary.fix_id, 1);
        assert_eq!(summary.review, 1);
        assert!(summary.is_consistent());
    }

    #[test]
    fn test_merge_equals_sequential_record() {
        let buckets = [
            Bucket::Clean,
            Bucket::FixStructure,
            Bucket::FixExample,
            Bucket::Review,
            Bucket::FixId,
        ];
        let all: BatchSummary = buckets
            .iter()
            .enumerate()
            .map(|(i, b)| report_in(*b, &i.to_string()))
            .collect();

        let mut left: BatchSummary = buckets[..2]
            .iter()
            .enumerate()
            .map(|(i, b)| report_in(*b, &i.to_string()))
            .collect();
        let right: BatchSummary = buckets[2..]
            .iter()
            .enumerate()
            .map(|(i, b)| report_in(*b, &(i + 2).to_string()))
            .collect();
        left.merge(right);

        assert_eq!(left, all);
        assert!(left.is_consistent());
    }

    #[test]
    fn test_summary_json_uses_camel_case() {
        let summary: BatchSummary = vec![report_in(Bucket::FixExample, "a")].into_iter().collect();
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["fixExample"], 1);
        assert_eq!(json["fixStructure"], 0);
        assert_eq!(json["files"].as_array().unwrap().len(), 1);
    }
}
