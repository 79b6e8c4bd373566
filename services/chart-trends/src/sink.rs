use std::{fs, path::{Path, PathBuf}};
use serde::Serialize;

use crate::errors::TrendsError;

/// Writes whole csv tables. The table is serialized into a temp file next
/// to the destination and then persisted over it, so a crashed run never
/// leaves half a file behind
pub struct CsvSink {
    path: PathBuf
}

impl CsvSink {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }

    pub fn write_rows<T: Serialize>(&self, rows: &[T]) -> Result<PathBuf, TrendsError> {
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };

        fs::create_dir_all(&parent).map_err(|e|
            TrendsError::Csv(format!("create dir {}: {e}", parent.display()))
        )?;

        let temp = tempfile::NamedTempFile::new_in(&parent)
            .map_err(|e| TrendsError::Csv(
                format!("tempfile in {}: {e}", parent.display())
            ))?;

        {
            let mut writer = csv::Writer::from_writer(temp.as_file());
            for row in rows {
                writer.serialize(row)?;
            }
            writer.flush()?;
        }

        temp.persist(&self.path).map_err(|e|
            TrendsError::Csv(format!("persist {}: {e}", self.path.display())))?;

        Ok(self.path.clone())
    }
}
