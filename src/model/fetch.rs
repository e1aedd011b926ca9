use crate::{Error, Result};
use std::path::Path;
use tracing::{debug, info};

/// Makes sure `path` exists locally, downloading it from `url` when it is missing.
pub async fn ensure_artifact(path: &Path, url: Option<&str>) -> Result<()> {
    if tokio::fs::try_exists(path).await? {
        debug!("Using local artifact: {}", path.display());
        return Ok(());
    }

    let Some(url) = url else {
        return Err(Error::model(format!(
            "{} not found and no download URL configured",
            path.display()
        )));
    };

    info!("Downloading {} to {}", url, path.display());

    let response = reqwest::get(url).await?;
    let status = response.status();
    if !status.is_success() {
        return Err(Error::DownloadStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    let bytes = response.bytes().await?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    // Write beside the target first so an interrupted download never looks complete.
    let partial = path.with_extension("part");
    tokio::fs::write(&partial, &bytes).await?;
    tokio::fs::rename(&partial, path).await?;

    info!("Downloaded {} bytes to {}", bytes.len(), path.display());
    Ok(())
}
