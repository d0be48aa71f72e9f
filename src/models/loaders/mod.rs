pub mod yaml_loader;

pub use yaml_loader::{expected_id, is_marker_file, load_marker, DocumentParser, YamlDocumentParser};
