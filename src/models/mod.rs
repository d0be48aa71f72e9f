pub mod issue;
pub mod loaders;
pub mod marker;
pub mod report;
pub mod schema;
pub mod summary;

pub use issue::{FixKind, Issue, IssueFamily, IssueKind, Severity};
pub use loaders::{expected_id, is_marker_file, load_marker, DocumentParser, YamlDocumentParser};
pub use marker::{Frame, MarkerDocument};
pub use report::{Bucket, FileReport, FileStatus, SchemaVersion, ValidationResult};
pub use schema::MarkerCategory;
pub use summary::BatchSummary;
