//! Files handed to the serving layer.
//!
//! # Submodules
//!
//! - [`json`]: the snapshot (corpus, report, ranked terms) as JSON
//! - [`image`]: the word-cloud SVG

pub mod image;
pub mod json;

use crate::error::OutputError;
use crate::snapshot::Snapshot;
use std::path::Path;

/// Write every artifact of `snapshot` into `output_dir`.
pub async fn write_all(snapshot: &Snapshot, output_dir: &Path) -> Result<(), OutputError> {
    json::write_snapshot(snapshot, output_dir).await?;
    image::write_artifact(&snapshot.visualization, output_dir).await?;
    Ok(())
}
