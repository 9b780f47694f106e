use std::path::{Path, PathBuf};

use super::resource_path::ResourcePath;
use anyhow::Context;
use reqwest::StatusCode;
use tracing::debug;

// Fetch a resource and report its size. One attempt only, failures go back to the
// caller as they are.
pub async fn load_any(source: PathBuf, url: String) -> anyhow::Result<usize> {
    let resource_path = ResourcePath::from(url).under(&source);
    debug!("Fetching {}", resource_path);

    use ResourcePath::*;
    match resource_path {
        Local(path) => load_local(&path).await,
        URL(url) => load_url(&url).await,
    }
}

async fn load_local(path: &Path) -> anyhow::Result<usize> {
    let bytes = tokio::fs::read(path)
        .await
        .context(format!("Failed to load file {}", path.display()))?;
    Ok(bytes.len())
}

async fn load_url(url: &str) -> anyhow::Result<usize> {
    let response = reqwest::get(url).await.context("Failed to get resource!")?;

    if response.status() != StatusCode::OK {
        anyhow::bail!("Status code is {}, not OK.", response.status())
    }

    let bytes = response
        .bytes()
        .await
        .context("Failed to read body from response")?;
    Ok(bytes.len())
}
