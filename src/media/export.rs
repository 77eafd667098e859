// SPDX-License-Identifier: MPL-2.0
//! Export of the displayed image.
//!
//! Export writes the bytes the image was retrieved as. The chosen format
//! only names the file; nothing is re-encoded, so a DICOM or JPEG source
//! lands on disk bit for bit.

use crate::error::{Error, Result};
use crate::media::ImageData;
use crate::study::StudyInfo;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File extension offered for exported images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Png,
    Jpg,
}

impl ExportFormat {
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpg => "jpg",
        }
    }

    /// Filter label shown in the save dialog.
    #[must_use]
    pub fn filter_name(self) -> &'static str {
        match self {
            ExportFormat::Png => "PNG",
            ExportFormat::Jpg => "JPEG",
        }
    }

    #[must_use]
    pub fn all() -> &'static [ExportFormat] {
        &[ExportFormat::Png, ExportFormat::Jpg]
    }

    /// Parses an extension, case-insensitively (`jpeg` is accepted).
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<ExportFormat> {
        match ext.to_lowercase().as_str() {
            "png" => Some(ExportFormat::Png),
            "jpg" | "jpeg" => Some(ExportFormat::Jpg),
            _ => None,
        }
    }
}

/// Default export file name: `<study>-<index+1>.<ext>`.
#[must_use]
pub fn default_file_name(info: &StudyInfo, index: usize, format: ExportFormat) -> String {
    format!(
        "{}-{}.{}",
        info.file_stem(),
        index.saturating_add(1),
        format.extension()
    )
}

/// Forces `path` to end with the format's extension.
///
/// Dialogs on some platforms drop the extension typed by the user.
#[must_use]
pub fn with_format_extension(path: PathBuf, format: ExportFormat) -> PathBuf {
    let matches = path
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(ExportFormat::from_extension)
        == Some(format);
    if matches {
        path
    } else {
        let mut path = path.into_os_string();
        path.push(".");
        path.push(format.extension());
        PathBuf::from(path)
    }
}

/// Writes the original bytes of `image` to `path`.
///
/// Returns the number of bytes written.
///
/// # Errors
///
/// [`Error::ExportUnavailable`] when no image is displayed, [`Error::Io`]
/// when the file cannot be written.
pub fn export_image(image: Option<&ImageData>, path: &Path) -> Result<usize> {
    let image = image.ok_or(Error::ExportUnavailable)?;
    let bytes = image.encoded_bytes();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, bytes)?;
    Ok(bytes.len())
}

/// Asks the user where to save an export. `None` when cancelled.
pub async fn pick_destination(file_name: String, format: ExportFormat) -> Option<PathBuf> {
    rfd::AsyncFileDialog::new()
        .set_file_name(&file_name)
        .add_filter(format.filter_name(), &[format.extension()])
        .save_file()
        .await
        .map(|handle| with_format_extension(handle.path().to_path_buf(), format))
}
