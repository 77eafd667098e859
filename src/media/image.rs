// SPDX-License-Identifier: MPL-2.0
//! Decoded study image.

use crate::media::filter::PresentationFilter;
use iced::widget::image;
use std::sync::Arc;

/// A decoded image ready for display, plus the bytes it was decoded from.
///
/// Pixel and encoded buffers are reference-counted, so clones are cheap and
/// the cache, the view and export can all hold the same image.
#[derive(Debug, Clone)]
pub struct ImageData {
    pub handle: image::Handle,
    pub width: u32,
    pub height: u32,
    rgba_bytes: Arc<Vec<u8>>,
    encoded_bytes: Arc<Vec<u8>>,
}

impl ImageData {
    /// Creates an image from RGBA pixels and the encoded bytes they came from.
    #[must_use]
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>, encoded: Vec<u8>) -> Self {
        let rgba_bytes = Arc::new(pixels);
        let handle = image::Handle::from_rgba(width, height, rgba_bytes.to_vec());
        Self {
            handle,
            width,
            height,
            rgba_bytes,
            encoded_bytes: Arc::new(encoded),
        }
    }

    /// Decoded RGBA pixels, row-major.
    pub fn rgba_bytes(&self) -> &[u8] {
        &self.rgba_bytes
    }

    /// Bytes exactly as retrieved from the study source.
    pub fn encoded_bytes(&self) -> &[u8] {
        &self.encoded_bytes
    }

    /// Memory held by this image (decoded plus encoded).
    #[must_use]
    pub fn size_bytes(&self) -> usize {
        self.rgba_bytes.len() + self.encoded_bytes.len()
    }

    /// Returns a display handle with `filter` applied.
    ///
    /// The stored pixels are left untouched; an identity filter reuses the
    /// existing handle.
    #[must_use]
    pub fn presented(&self, filter: &PresentationFilter) -> image::Handle {
        if filter.is_identity() {
            return self.handle.clone();
        }
        image::Handle::from_rgba(self.width, self.height, filter.apply(&self.rgba_bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_counts_both_buffers() {
        let image = ImageData::from_rgba(2, 2, vec![0; 16], vec![1, 2, 3]);
        assert_eq!(image.size_bytes(), 19);
        assert_eq!(image.encoded_bytes(), &[1, 2, 3]);
    }

    #[test]
    fn clones_share_pixel_storage() {
        let image = ImageData::from_rgba(1, 1, vec![10, 20, 30, 255], Vec::new());
        let clone = image.clone();
        assert!(std::ptr::eq(
            image.rgba_bytes().as_ptr(),
            clone.rgba_bytes().as_ptr()
        ));
    }

    #[test]
    fn filtering_leaves_source_pixels_unchanged() {
        let image = ImageData::from_rgba(1, 1, vec![10, 20, 30, 255], Vec::new());
        let filter = PresentationFilter {
            invert: true,
            ..PresentationFilter::default()
        };
        let _ = image.presented(&filter);
        assert_eq!(image.rgba_bytes(), &[10, 20, 30, 255]);
    }
}
