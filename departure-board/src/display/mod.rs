//! Display output.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::render::Frame;

/// Errors from showing a frame.
#[derive(Debug, thiserror::Error)]
pub enum DisplayError {
    /// Writing frame output failed
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Something that can show a rendered frame.
pub trait DisplayDriver: Send {
    fn show(&mut self, frame: &Frame) -> Result<(), DisplayError>;
}

/// File names written by [`PreviewDisplay`].
pub const BLACK_LAYER_FILE: &str = "board-black.pbm";
pub const HIGHLIGHT_LAYER_FILE: &str = "board-highlight.pbm";

/// Writes each frame's layers as PBM images into a directory.
#[derive(Debug, Clone)]
pub struct PreviewDisplay {
    dir: PathBuf,
    frames_shown: u64,
}

impl PreviewDisplay {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            frames_shown: 0,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn write(&self, name: &str, contents: &[u8]) -> Result<(), DisplayError> {
        let path = self.dir.join(name);
        fs::write(&path, contents).map_err(|source| DisplayError::Io { path, source })
    }
}

impl DisplayDriver for PreviewDisplay {
    fn show(&mut self, frame: &Frame) -> Result<(), DisplayError> {
        fs::create_dir_all(&self.dir).map_err(|source| DisplayError::Io {
            path: self.dir.clone(),
            source,
        })?;

        self.write(BLACK_LAYER_FILE, &frame.black.to_pbm())?;
        self.write(HIGHLIGHT_LAYER_FILE, &frame.highlight.to_pbm())?;

        self.frames_shown += 1;
        if self.frames_shown == 1 {
            info!(dir = %self.dir.display(), "Writing preview frames");
        }
        debug!(frame = self.frames_shown, "Preview frame written");
        Ok(())
    }
}
