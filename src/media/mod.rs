// SPDX-License-Identifier: MPL-2.0
//! Image handling for study sequences.
//!
//! Decoding, caching, presentation filters and export of the images the
//! viewer displays.

pub mod decoder;
pub mod export;
pub mod filter;
pub mod image;
pub mod prefetch;

pub use decoder::{DecoderChain, FrameDecoder, RasterDecoder};
#[cfg(feature = "dicom")]
pub use decoder::DicomDecoder;
pub use export::ExportFormat;
pub use filter::PresentationFilter;
pub use image::ImageData;
pub use prefetch::{PrefetchStats, PreloadCache};

/// File extensions picked up when a study is a local directory.
pub mod extensions {
    use std::path::Path;

    /// Raster formats decoded by the `image` crate.
    pub const RASTER_EXTENSIONS: &[&str] =
        &["jpg", "jpeg", "png", "gif", "tiff", "tif", "webp", "bmp"];

    /// DICOM part 10 files.
    pub const DICOM_EXTENSIONS: &[&str] = &["dcm", "dicom"];

    /// Returns true if the file extension belongs to a decodable format.
    ///
    /// DICOM files are only listed when DICOM support is compiled in.
    #[must_use]
    pub fn is_supported_image(path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
            return false;
        };
        let ext = ext.to_lowercase();
        RASTER_EXTENSIONS.contains(&ext.as_str())
            || (cfg!(feature = "dicom") && DICOM_EXTENSIONS.contains(&ext.as_str()))
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn raster_extensions_are_case_insensitive() {
            assert!(is_supported_image(Path::new("a/B.PNG")));
            assert!(is_supported_image(Path::new("slice.jpeg")));
            assert!(!is_supported_image(Path::new("notes.txt")));
            assert!(!is_supported_image(Path::new("no_extension")));
        }

        #[cfg(feature = "dicom")]
        #[test]
        fn dicom_files_are_listed_with_dicom_support() {
            assert!(is_supported_image(Path::new("IM0001.dcm")));
        }
    }
}
