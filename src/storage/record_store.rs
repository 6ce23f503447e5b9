use std::{
    future::Future,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::Result;
use fs4::tokio::AsyncFileExt;
use tokio::{
    fs::File,
    io::{AsyncReadExt, AsyncWriteExt},
};
use tracing::{debug, warn};

use super::entities::RecordEntity;

/// Name of the persisted collection file. The export paths reuse it so the
/// downloaded artifact and the shared file carry the same name.
pub const DATA_FILE_NAME: &str = "dados.json";

/// Interface for abstracting persistence of the record collection.
pub trait RecordStore {
    /// Retrieves the previously persisted collection. First run, an unreadable
    /// file, and corrupt contents all collapse to an empty collection; the
    /// caller never sees an error.
    fn load(&self) -> impl Future<Output = Vec<RecordEntity>> + Send;

    /// Durably overwrites the persisted location with the full collection.
    /// Every mutation rewrites the whole snapshot, there are no delta writes.
    fn save(&self, records: &[RecordEntity]) -> impl Future<Output = Result<()>> + Send;

    /// Stable handle to the persisted location. The share export path checks
    /// existence through it and hands it to the platform share mechanism.
    fn location(&self) -> &Path;
}

/// The main realization of [RecordStore]. Keeps the whole collection as a JSON
/// array in a single file inside the application directory.
pub struct JsonRecordStore {
    path: PathBuf,
}

impl JsonRecordStore {
    pub fn new(app_dir: PathBuf) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(&app_dir)?;

        Ok(Self {
            path: app_dir.join(DATA_FILE_NAME),
        })
    }

    async fn read_all(path: &Path) -> std::result::Result<Vec<u8>, std::io::Error> {
        debug!("Extracting {path:?}");
        let mut file = File::open(path).await?;
        file.lock_shared()?;
        let mut raw = Vec::new();
        let result = file.read_to_end(&mut raw).await;
        file.unlock_async().await?;
        result?;
        Ok(raw)
    }

    async fn write_all(file: &mut File, serialized: &[u8]) -> Result<()> {
        file.write_all(serialized).await?;
        file.flush().await?;
        Ok(())
    }
}

impl RecordStore for JsonRecordStore {
    async fn load(&self) -> Vec<RecordEntity> {
        let raw = match Self::read_all(&self.path).await {
            Ok(raw) => raw,
            Err(e) => {
                if e.kind() != ErrorKind::NotFound {
                    warn!("Failed to read {:?}: {e}", self.path);
                }
                return vec![];
            }
        };

        match serde_json::from_slice::<Vec<RecordEntity>>(&raw) {
            Ok(records) => records,
            Err(e) => {
                // ignore illegal contents. Might happen after shutdowns
                warn!("During parsing in path {:?} found illegal json: {e}", self.path);
                vec![]
            }
        }
    }

    async fn save(&self, records: &[RecordEntity]) -> Result<()> {
        let serialized = serde_json::to_vec(records)?;

        let mut file = File::options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)
            .await?;

        // Semi-safe acquire-release for a file
        file.lock_exclusive()?;
        let result = Self::write_all(&mut file, &serialized).await;
        file.unlock_async().await?;
        result
    }

    fn location(&self) -> &Path {
        &self.path
    }
}
