//! Result download stage
//!
//! Once the production is done, fetches the full resource, walks its output
//! file descriptors sequentially and writes each artifact under the output
//! directory using the server-provided filename. Descriptors missing a URL
//! or filename are skipped; a failed download aborts the batch and leaves
//! earlier files in place.

use crate::client::ApiClient;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Download every complete output file of a finished production.
///
/// Returns the paths written, in download order.
pub async fn download_outputs(
    client: &ApiClient,
    uuid: &str,
    output_dir: &Path,
) -> Result<Vec<PathBuf>> {
    let details = client.get_production(uuid).await?;
    let mut written = Vec::new();

    for output in &details.output_files {
        let (url, filename) = match (&output.download_url, &output.filename) {
            (Some(url), Some(filename)) => (url, filename),
            _ => {
                warn!(
                    filename = output.filename.as_deref().unwrap_or("<missing>"),
                    "skipping output file with incomplete metadata"
                );
                continue;
            }
        };

        info!(%filename, "downloading");
        let bytes = client
            .download(url)
            .await
            .map_err(|e| Error::DownloadFailed {
                filename: filename.clone(),
                reason: e.to_string(),
            })?;

        let target = output_dir.join(filename);
        tokio::fs::write(&target, &bytes)
            .await
            .map_err(|e| Error::DownloadFailed {
                filename: filename.clone(),
                reason: e.to_string(),
            })?;
        info!(path = %target.display(), "saved");
        written.push(target);
    }

    Ok(written)
}
