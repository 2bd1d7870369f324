//! Append-only per-epoch loss history.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use vae_core::EpochSummary;

use crate::error::Result;

/// Text file receiving one [`EpochSummary`] line per epoch.
///
/// Existing content is never truncated, so resumed runs keep appending.
#[derive(Debug, Clone)]
pub struct TrainingHistory {
    path: PathBuf,
}

impl TrainingHistory {
    /// History stored at `path`. Nothing is touched until the first append.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// History file location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one line and flush it to disk.
    pub fn append(&self, summary: &EpochSummary) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{summary}")?;
        file.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use vae_core::EpochAccumulator;

    #[test]
    fn test_append_preserves_existing_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("logs").join("history.txt");
        let history = TrainingHistory::new(&path);

        let mut acc = EpochAccumulator::new();
        acc.add(3.0, 1.0, 2.0);
        history.append(&acc.finish(0, 0.5)).unwrap();
        history.append(&acc.finish(1, 0.25)).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Epoch: 0, Avg_Total_Loss: 3.000000"));
        assert!(lines[1].ends_with("Test_MSE_Loss: 0.250000"));
    }
}
