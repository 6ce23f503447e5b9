use std::path::PathBuf;

use anyhow::Result;
use async_trait::async_trait;
use tokio::{fs::File, io::AsyncWriteExt};
use tracing::debug;

use crate::storage::record_store::DATA_FILE_NAME;

use super::{ExportOutcome, ExportTarget};

/// Delivery for environments with a direct "download": the payload is written
/// as `dados.json` into a directory of the user's choosing.
pub struct DownloadExport {
    out_dir: PathBuf,
}

impl DownloadExport {
    pub fn new(out_dir: PathBuf) -> Self {
        Self { out_dir }
    }
}

#[async_trait]
impl ExportTarget for DownloadExport {
    async fn deliver(&self, payload: &str) -> Result<ExportOutcome> {
        let path = self.out_dir.join(DATA_FILE_NAME);
        debug!("Writing export to {path:?}");

        let mut file = File::create(&path).await?;
        file.write_all(payload.as_bytes()).await?;
        file.flush().await?;

        Ok(ExportOutcome::Delivered(path))
    }
}
