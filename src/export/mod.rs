//! Export delivery. [ExportTarget] is the single "hand this serialized payload
//! to the user" capability; the download and share mechanisms implement it and
//! [GenericExportTarget] picks one at startup, so call sites never branch on
//! platform.

pub mod download;
pub mod share;

use std::path::{Path, PathBuf};

use anyhow::Result;
use async_trait::async_trait;

use download::DownloadExport;
use share::{ShareExport, SystemLauncher};

/// What an export attempt came to.
#[derive(Debug, PartialEq, Eq)]
pub enum ExportOutcome {
    /// The payload reached the user; the path that was written or handed over.
    Delivered(PathBuf),
    /// Nothing to hand over: the collection is empty or the data file is missing.
    NothingToExport,
    /// The platform has no share mechanism to hand the file to.
    ShareUnavailable,
}

/// Contract every delivery mechanism implements.
#[async_trait]
pub trait ExportTarget: Send + Sync {
    async fn deliver(&self, payload: &str) -> Result<ExportOutcome>;
}

/// Serves as the startup-selected delivery mechanism.
pub struct GenericExportTarget {
    inner: Box<dyn ExportTarget>,
}

impl GenericExportTarget {
    /// Picks the mechanism once: the share handoff when asked for, the plain
    /// file download otherwise.
    pub fn detect(share: bool, data_file: &Path, out_dir: PathBuf) -> Self {
        let inner: Box<dyn ExportTarget> = if share {
            Box::new(ShareExport::new(data_file.to_owned(), SystemLauncher))
        } else {
            Box::new(DownloadExport::new(out_dir))
        };
        Self { inner }
    }
}

#[async_trait]
impl ExportTarget for GenericExportTarget {
    async fn deliver(&self, payload: &str) -> Result<ExportOutcome> {
        self.inner.deliver(payload).await
    }
}
