//! 分类器 - 业务能力层
//!
//! 把一个文件的问题列表映射到唯一的分类桶。按优先级匹配，先中先得：
//! 无问题 → clean；id 族 → fixId；example 族 → fixExample；structure 族 → fixStructure；其余 → review。

use crate::models::issue::{Issue, IssueFamily};
use crate::models::report::Bucket;

/// 按族匹配的优先级顺序
const PRIORITY: [(IssueFamily, Bucket); 3] = [
    (IssueFamily::Id, Bucket::FixId),
    (IssueFamily::Example, Bucket::FixExample),
    (IssueFamily::Structure, Bucket::FixStructure),
];

pub fn categorize(issues: &[Issue]) -> Bucket {
    if issues.is_empty() {
        return Bucket::Clean;
    }

    PRIORITY
        .iter()
        .find(|(family, _)| issues.iter().any(|issue| issue.family() == *family))
        .map(|(_, bucket)| *bucket)
        .unwrap_or(Bucket::Review)
}
