//! Word-cloud artifact file.

use crate::analysis::frequency::Visualization;
use crate::error::OutputError;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

pub const ARTIFACT_FILE: &str = "wordcloud.svg";

#[instrument(level = "info", skip_all, fields(output_dir = %output_dir.display()))]
pub async fn write_artifact(viz: &Visualization, output_dir: &Path) -> Result<PathBuf, OutputError> {
    let path = output_dir.join(ARTIFACT_FILE);
    fs::write(&path, viz.svg.as_bytes())
        .await
        .map_err(|source| OutputError::Io {
            path: path.display().to_string(),
            source,
        })?;
    info!(
        path = %path.display(),
        placeholder = viz.is_placeholder(),
        "Wrote word cloud"
    );
    Ok(path)
}
