//! JSON handoff file for the serving layer.
//!
//! ```text
//! output_dir/
//! ├── snapshot.json   # corpus, build report, top terms and weights
//! └── wordcloud.svg   # see [`super::image`]
//! ```

use crate::error::OutputError;
use crate::snapshot::Snapshot;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument};

pub const SNAPSHOT_FILE: &str = "snapshot.json";

/// Serialize `snapshot` to `{output_dir}/snapshot.json`.
#[instrument(level = "info", skip_all, fields(output_dir = %output_dir.display()))]
pub async fn write_snapshot(snapshot: &Snapshot, output_dir: &Path) -> Result<PathBuf, OutputError> {
    let json = serde_json::to_string_pretty(snapshot)?;

    if let Err(e) = fs::create_dir_all(output_dir).await {
        error!(error = %e, "Failed to create output dir");
        return Err(OutputError::Io {
            path: output_dir.display().to_string(),
            source: e,
        });
    }

    let path = output_dir.join(SNAPSHOT_FILE);
    fs::write(&path, json).await.map_err(|source| OutputError::Io {
        path: path.display().to_string(),
        source,
    })?;
    info!(path = %path.display(), posts = snapshot.corpus.len(), "Wrote snapshot JSON");
    Ok(path)
}
