use chrono::NaiveDate;
use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder, ImageError};
use log::{debug, info};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::bitmap::Bitmap;
use crate::clipboard::ImageSource;
use crate::selector::{format_date, DateHourSelector};

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("failed to encode {file_name}: {source}")]
    Encode {
        file_name: String,
        #[source]
        source: ImageError,
    },
    #[error("failed to write {}: {source}", path.display())]
    Io {
        file_name: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl SaveError {
    pub fn file_name(&self) -> &str {
        match self {
            SaveError::Encode { file_name, .. } | SaveError::Io { file_name, .. } => file_name,
        }
    }

    /// The underlying failure message, without the file name.
    pub fn reason(&self) -> String {
        match self {
            SaveError::Encode { source, .. } => source.to_string(),
            SaveError::Io { source, .. } => source.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFile {
    pub file_name: String,
    pub path: PathBuf,
}

/// Writes clipboard images as `<type>-<yyyy-MM-dd>-<hour>.png` into one directory.
#[derive(Debug, Clone)]
pub struct SaveController {
    directory: PathBuf,
    kind: String,
}

impl SaveController {
    pub fn new(directory: impl Into<PathBuf>, kind: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            kind: kind.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn file_name(&self, date: NaiveDate, hour: u32) -> String {
        format!("{}-{}-{}.png", self.kind, format_date(date), hour)
    }

    /// Reads the clipboard afresh and writes it out. `Ok(None)` when there is
    /// no image. Advances the selector's hour only after a successful write.
    pub fn save(
        &self,
        source: &dyn ImageSource,
        selector: &mut DateHourSelector,
    ) -> Result<Option<SavedFile>, SaveError> {
        let Some(bitmap) = source.sample() else {
            debug!("no clipboard image to save");
            return Ok(None);
        };
        let file_name = self.file_name(selector.date(), selector.hour());
        let path = self.directory.join(&file_name);
        info!("saving as: {}", path.display());

        let png = encode_png(&bitmap).map_err(|source| SaveError::Encode {
            file_name: file_name.clone(),
            source,
        })?;
        std::fs::write(&path, png).map_err(|source| SaveError::Io {
            file_name: file_name.clone(),
            path: path.clone(),
            source,
        })?;

        selector.increment_hour();
        Ok(Some(SavedFile { file_name, path }))
    }
}

pub fn encode_png(bitmap: &Bitmap) -> Result<Vec<u8>, ImageError> {
    let mut buf = Vec::new();
    let encoder = PngEncoder::new(&mut buf);
    encoder.write_image(
        bitmap.as_image().as_raw(),
        bitmap.width(),
        bitmap.height(),
        ColorType::Rgba8,
    )?;
    Ok(buf)
}
