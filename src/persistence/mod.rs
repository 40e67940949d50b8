//! Persistence layer: pipeline documents and the custom processor store

pub mod document;
pub mod store;

pub use document::{from_json, load_pipeline, save_pipeline, to_json, PipelineDocument, StepRecord};
pub use store::{slugify, CustomProcessorDefinition, CustomProcessorStore, SubscriptionId};

use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Write `contents` to `path` so that readers see either the old file or the
/// complete new one, never a partial write.
pub(crate) fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(contents)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}
