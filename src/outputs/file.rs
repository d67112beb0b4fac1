//! Artifact delivery.
//!
//! The Markdown transcript is saved as `<output_dir>/<filename>`; an existing
//! file of the same name is overwritten.

use crate::models::Artifact;
use std::error::Error;
use std::path::PathBuf;
use tokio::fs;
use tracing::{error, info, instrument};

/// Write `artifact` into `output_dir` and return the written path.
#[instrument(level = "info", skip_all, fields(output_dir = %output_dir, file = %artifact.filename))]
pub async fn write_artifact(
    artifact: &Artifact,
    output_dir: &str,
) -> Result<PathBuf, Box<dyn Error>> {
    let path = PathBuf::from(output_dir).join(&artifact.filename);
    if let Err(e) = fs::write(&path, &artifact.markdown).await {
        error!(path = %path.display(), error = %e, "Failed writing Markdown");
        return Err(e.into());
    }
    info!(
        path = %path.display(),
        bytes = artifact.markdown.len(),
        "Wrote transcript Markdown"
    );
    Ok(path)
}
