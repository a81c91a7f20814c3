pub mod format;
pub mod summary;

pub use format::FormatKind;
pub use summary::{PartialSummary, RunMetadata, Summary, assemble};
