//! Destinations for export payloads.

use super::export::Payload;
use crate::error::{ReportError, Result};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// Something that can store an export payload
pub trait ExportSink {
    /// Save `payload`, returning where it went
    fn save(&mut self, payload: &Payload) -> Result<PathBuf>;
}

/// Writes payloads as files into one directory, named by their suggested filename
#[derive(Debug, Clone)]
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    pub fn new(dir: &Path) -> Self {
        Self { dir: dir.to_path_buf() }
    }
}

impl ExportSink for FileSink {
    fn save(&mut self, payload: &Payload) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir).map_err(|source| ReportError::Write { path: self.dir.clone(), source })?;

        // The filename embeds the domain; keep it inside the target directory
        let filename = payload.filename.replace(['/', '\\'], "_");
        let path = self.dir.join(filename);

        debug!("writing {} ({}, {} bytes)", path.display(), payload.mime_type, payload.body.len());
        fs::write(&path, &payload.body).map_err(|source| ReportError::Write { path: path.clone(), source })?;

        Ok(path)
    }
}
