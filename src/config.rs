//! Host-side configuration shared by every node invocation.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::image::SequenceFormat;

/// Configuration supplied by the host to every node.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base output directory. Relative folder arguments are resolved against it.
    pub output_dir: PathBuf,

    /// Encoding for saved sequences; its extension also filters loaded files.
    pub format: SequenceFormat,
}

impl Default for Config {
    /// Uses the platform-appropriate local data directory:
    /// - Windows: `%LOCALAPPDATA%\framegrid\output`
    /// - Linux: `~/.local/share/framegrid/output`
    /// - macOS: `~/Library/Application Support/framegrid/output`
    ///
    /// Falls back to `./output` when no such directory is known.
    fn default() -> Self {
        let output_dir = dirs::data_local_dir().map_or_else(
            || PathBuf::from("output"),
            |base| base.join("framegrid").join("output"),
        );

        Self {
            output_dir,
            format: SequenceFormat::default(),
        }
    }
}

impl Config {
    /// Create a configuration rooted at `output_dir` with the default format.
    pub fn with_output_dir<P: Into<PathBuf>>(output_dir: P) -> Self {
        Self {
            output_dir: output_dir.into(),
            format: SequenceFormat::default(),
        }
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any parameter is out of valid range.
    pub fn validate(&self) -> Result<()> {
        if self.output_dir.as_os_str().is_empty() {
            return Err(Error::InvalidParameter {
                name: "output_dir".to_string(),
                reason: "must not be empty".to_string(),
            });
        }

        if let SequenceFormat::Jpeg { quality } = self.format {
            if !(1..=100).contains(&quality) {
                return Err(Error::InvalidParameter {
                    name: "quality".to_string(),
                    reason: "must be between 1 and 100".to_string(),
                });
            }
        }

        Ok(())
    }

    /// Resolve a folder argument: absolute paths are kept, relative ones join `output_dir`.
    #[must_use]
    pub fn resolve<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.output_dir.join(path)
        }
    }
}
