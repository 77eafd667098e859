// SPDX-License-Identifier: MPL-2.0
//! Retrieval of the sequence manifest and of individual image bytes.
//!
//! Remote references go through a shared `reqwest` client. Local references
//! are read on tokio's blocking pool so the UI executor never waits on disk.

use super::sequence::{ImageRef, ImageSequence, StudySource};
use crate::error::{Error, Result};
use reqwest::Url;
use std::path::PathBuf;
use std::time::Duration;

const USER_AGENT: &str = concat!("StudyLens/", env!("CARGO_PKG_VERSION"));

/// Upper bound for one manifest or image request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches study manifests and image bytes.
///
/// Cloning is cheap; clones share the HTTP connection pool.
#[derive(Debug, Clone)]
pub struct StudyClient {
    http: reqwest::Client,
}

impl Default for StudyClient {
    fn default() -> Self {
        Self::new()
    }
}

impl StudyClient {
    #[must_use]
    pub fn new() -> Self {
        let http = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(10))
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|err| {
                eprintln!("Falling back to default HTTP client: {err}");
                reqwest::Client::new()
            });
        Self { http }
    }

    /// Retrieves the ordered image list of a study.
    pub async fn fetch_sequence(&self, source: &StudySource) -> Result<ImageSequence> {
        match source {
            StudySource::Remote(url) => {
                let body = self.get(url.clone()).await?;
                ImageSequence::from_manifest(&body, source)
            }
            StudySource::ManifestFile(path) => {
                let body = read_local(path.clone()).await?;
                ImageSequence::from_manifest(&body, source)
            }
            StudySource::Directory(dir) => {
                let dir = dir.clone();
                tokio::task::spawn_blocking(move || ImageSequence::from_directory(&dir))
                    .await
                    .map_err(|err| Error::Io(err.to_string()))?
            }
        }
        .map_err(into_fetch_error)
    }

    /// Retrieves the encoded bytes of one image.
    pub async fn fetch_bytes(&self, image: &ImageRef) -> Result<Vec<u8>> {
        match image {
            ImageRef::Remote(url) => self.get(url.clone()).await,
            ImageRef::Local(path) => read_local(path.clone()).await,
        }
    }

    async fn get(&self, url: Url) -> Result<Vec<u8>> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Fetch(format!("HTTP status: {status}")));
        }
        Ok(response.bytes().await?.to_vec())
    }
}

async fn read_local(path: PathBuf) -> Result<Vec<u8>> {
    tokio::task::spawn_blocking(move || std::fs::read(&path).map_err(Error::from))
        .await
        .map_err(|err| Error::Io(err.to_string()))?
}

/// A study that cannot be listed is a fetch failure whatever the cause.
fn into_fetch_error(err: Error) -> Error {
    match err {
        Error::Fetch(_) => err,
        other => Error::Fetch(other.to_string()),
    }
}
