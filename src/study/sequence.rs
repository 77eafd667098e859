// SPDX-License-Identifier: MPL-2.0
//! Ordered image references of one study and the manifest that lists them.
//!
//! A sequence is built once per load. Its order never changes afterwards, so
//! an index identifies the same image for the whole lifetime of the viewer.

use crate::error::{Error, Result};
use crate::media::extensions::is_supported_image;
use reqwest::Url;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Where the image list of a study comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StudySource {
    /// `http(s)://` URL answering with a JSON manifest.
    Remote(Url),
    /// JSON manifest on disk.
    ManifestFile(PathBuf),
    /// Directory whose image files form the sequence, sorted by name.
    Directory(PathBuf),
}

impl StudySource {
    /// Classifies an endpoint string.
    ///
    /// Anything that parses as an `http`/`https` URL is remote. An existing
    /// directory is listed; every other value is read as a manifest path.
    pub fn parse(endpoint: &str) -> Result<Self> {
        let endpoint = endpoint.trim();
        if endpoint.is_empty() {
            return Err(Error::Config("empty study endpoint".into()));
        }
        if let Some(url) = parse_http_url(endpoint) {
            return Ok(Self::Remote(url));
        }
        let path = PathBuf::from(endpoint);
        if path.is_dir() {
            Ok(Self::Directory(path))
        } else {
            Ok(Self::ManifestFile(path))
        }
    }

    /// Turns a manifest entry into an image reference.
    ///
    /// Absolute URLs are used as-is. Relative entries are joined onto the
    /// manifest URL for remote sources and onto the manifest's directory
    /// for local ones.
    pub fn resolve(&self, reference: &str) -> Result<ImageRef> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(Error::Fetch("manifest entry without imageUrl".into()));
        }
        if let Some(url) = parse_http_url(reference) {
            return Ok(ImageRef::Remote(url));
        }
        match self {
            Self::Remote(base) => base
                .join(reference)
                .map(ImageRef::Remote)
                .map_err(|err| Error::Fetch(format!("invalid image url {reference}: {err}"))),
            Self::ManifestFile(manifest) => {
                let path = Path::new(reference);
                if path.is_absolute() {
                    return Ok(ImageRef::Local(path.to_path_buf()));
                }
                let base = manifest.parent().unwrap_or_else(|| Path::new(""));
                Ok(ImageRef::Local(base.join(path)))
            }
            Self::Directory(dir) => Ok(ImageRef::Local(dir.join(reference))),
        }
    }
}

impl fmt::Display for StudySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote(url) => write!(f, "{url}"),
            Self::ManifestFile(path) | Self::Directory(path) => write!(f, "{}", path.display()),
        }
    }
}

fn parse_http_url(value: &str) -> Option<Url> {
    Url::parse(value)
        .ok()
        .filter(|url| matches!(url.scheme(), "http" | "https"))
}

/// Location of a single image of the sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ImageRef {
    Remote(Url),
    Local(PathBuf),
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote(url) => write!(f, "{url}"),
            Self::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Ordered, immutable list of image references.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageSequence {
    images: Vec<ImageRef>,
}

impl ImageSequence {
    #[must_use]
    pub fn new(images: Vec<ImageRef>) -> Self {
        Self { images }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.images.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ImageRef> {
        self.images.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ImageRef> {
        self.images.iter()
    }

    /// Highest valid index, `None` for an empty sequence.
    #[must_use]
    pub fn last_index(&self) -> Option<usize> {
        self.images.len().checked_sub(1)
    }

    /// Parses a manifest body and resolves every entry against `source`.
    ///
    /// Accepts `{ "images": [ { "imageUrl": ".." } ] }` or a bare array of
    /// entries. Extra fields are ignored.
    pub fn from_manifest(body: &[u8], source: &StudySource) -> Result<Self> {
        let manifest: Manifest = serde_json::from_slice(body)?;
        let entries = match manifest {
            Manifest::Wrapped { images } => images,
            Manifest::Bare(images) => images,
        };
        let images = entries
            .iter()
            .map(|entry| source.resolve(&entry.image_url))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { images })
    }

    /// Lists the supported image files of `dir`, sorted by file name.
    pub fn from_directory(dir: &Path) -> Result<Self> {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() && is_supported_image(&path) {
                files.push(path);
            }
        }
        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(Self {
            images: files.into_iter().map(ImageRef::Local).collect(),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Manifest {
    Wrapped { images: Vec<ManifestEntry> },
    Bare(Vec<ManifestEntry>),
}

#[derive(Debug, Deserialize)]
struct ManifestEntry {
    #[serde(rename = "imageUrl")]
    image_url: String,
}

/// Header text of the study being viewed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudyInfo {
    pub title: Option<String>,
    pub date: Option<String>,
    pub description: Option<String>,
}

impl StudyInfo {
    /// Base name for exported files: the title with unsafe characters replaced.
    #[must_use]
    pub fn file_stem(&self) -> String {
        let stem: String = self
            .title
            .as_deref()
            .unwrap_or("study")
            .trim()
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        if stem.is_empty() {
            "study".to_string()
        } else {
            stem
        }
    }
}
