pub mod marker_source;

pub use marker_source::{FsMarkerSource, MarkerSource, MemoryMarkerSource, SourceEntry};
