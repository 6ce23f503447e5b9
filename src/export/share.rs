use std::{
    env,
    path::{Path, PathBuf},
    process::Stdio,
};

use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

use super::{ExportOutcome, ExportTarget};

/// Launches whatever the platform offers for taking over a file. Split off from
/// [ShareExport] so tests can substitute it.
#[cfg_attr(test, mockall::automock)]
pub trait Launcher: Send + Sync {
    /// Whether the platform offers a share mechanism at all.
    fn is_available(&self) -> bool;

    /// Hands the file over to the platform.
    fn open(&self, path: &Path) -> Result<()>;
}

/// The default launcher: resolves the platform opener on PATH and spawns it
/// detached, leaving the hand-off dialog to the OS.
pub struct SystemLauncher;

impl SystemLauncher {
    fn command() -> &'static str {
        cfg_if::cfg_if! {
            if #[cfg(target_os = "linux")] {
                "xdg-open"
            } else if #[cfg(windows)] {
                "explorer.exe"
            } else {
                "open"
            }
        }
    }
}

impl Launcher for SystemLauncher {
    fn is_available(&self) -> bool {
        find_in_path(Self::command()).is_some()
    }

    fn open(&self, path: &Path) -> Result<()> {
        let mut command = std::process::Command::new(Self::command());
        command.arg(path);
        command.stdin(Stdio::null());
        command.stdout(Stdio::null());
        command.stderr(Stdio::null());
        #[allow(clippy::zombie_processes)]
        command.spawn()?;
        Ok(())
    }
}

fn find_in_path(binary: &str) -> Option<PathBuf> {
    let paths = env::var_os("PATH")?;
    env::split_paths(&paths)
        .map(|dir| dir.join(binary))
        .find(|candidate| candidate.exists())
}

/// Delivery for environments without a direct download: the persisted data file
/// itself is handed to the platform share mechanism.
pub struct ShareExport<L> {
    data_file: PathBuf,
    launcher: L,
}

impl<L: Launcher> ShareExport<L> {
    pub fn new(data_file: PathBuf, launcher: L) -> Self {
        Self {
            data_file,
            launcher,
        }
    }
}

#[async_trait]
impl<L: Launcher> ExportTarget for ShareExport<L> {
    /// The serialized payload is ignored here: what reaches the user is the
    /// persisted file, whose existence is re-checked at this point. A collection
    /// that never reached the disk therefore reports as nothing to export.
    async fn deliver(&self, _payload: &str) -> Result<ExportOutcome> {
        if !tokio::fs::try_exists(&self.data_file).await.unwrap_or(false) {
            return Ok(ExportOutcome::NothingToExport);
        }
        if !self.launcher.is_available() {
            return Ok(ExportOutcome::ShareUnavailable);
        }

        debug!("Handing {:?} to the platform share mechanism", self.data_file);
        self.launcher.open(&self.data_file)?;
        Ok(ExportOutcome::Delivered(self.data_file.clone()))
    }
}
