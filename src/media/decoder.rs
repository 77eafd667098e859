// SPDX-License-Identifier: MPL-2.0
//! Frame decoders.
//!
//! The viewer never parses image formats itself. Each [`FrameDecoder`]
//! recognises its input by content and renders it to RGBA; a
//! [`DecoderChain`] picks the first decoder that accepts the bytes.

use crate::error::{Error, Result};
use crate::media::ImageData;

/// Turns encoded bytes into a displayable image.
pub trait FrameDecoder: Send + Sync {
    /// Short name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Returns true if `bytes` look like something this decoder handles.
    fn accepts(&self, bytes: &[u8]) -> bool;

    fn decode(&self, bytes: &[u8]) -> Result<ImageData>;
}

// =============================================================================
// Raster formats
// =============================================================================

/// PNG, JPEG, GIF, BMP, TIFF and WebP through the `image` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct RasterDecoder;

impl FrameDecoder for RasterDecoder {
    fn name(&self) -> &'static str {
        "raster"
    }

    fn accepts(&self, bytes: &[u8]) -> bool {
        image_rs::guess_format(bytes).is_ok()
    }

    fn decode(&self, bytes: &[u8]) -> Result<ImageData> {
        let rgba = image_rs::load_from_memory(bytes)?.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(ImageData::from_rgba(
            width,
            height,
            rgba.into_raw(),
            bytes.to_vec(),
        ))
    }
}

// =============================================================================
// DICOM
// =============================================================================

/// Length of the DICOM part 10 preamble.
const DICOM_PREAMBLE_LEN: usize = 128;
const DICOM_MAGIC: &[u8; 4] = b"DICM";

/// Returns the DICOM stream without its preamble, if `bytes` is DICOM.
///
/// Files normally carry a 128 byte preamble before the magic; streams
/// without one start with the magic directly.
fn dicom_stream(bytes: &[u8]) -> Option<&[u8]> {
    if bytes.get(DICOM_PREAMBLE_LEN..DICOM_PREAMBLE_LEN + 4) == Some(DICOM_MAGIC.as_slice()) {
        return Some(&bytes[DICOM_PREAMBLE_LEN..]);
    }
    bytes.starts_with(DICOM_MAGIC).then_some(bytes)
}

/// DICOM part 10 files; renders the first frame with its VOI window applied.
#[cfg(feature = "dicom")]
#[derive(Debug, Clone, Copy, Default)]
pub struct DicomDecoder;

#[cfg(feature = "dicom")]
impl FrameDecoder for DicomDecoder {
    fn name(&self) -> &'static str {
        "dicom"
    }

    fn accepts(&self, bytes: &[u8]) -> bool {
        dicom_stream(bytes).is_some()
    }

    fn decode(&self, bytes: &[u8]) -> Result<ImageData> {
        use dicom_object::{FileDicomObject, InMemDicomObject};
        use dicom_pixeldata::PixelDecoder;

        let stream =
            dicom_stream(bytes).ok_or_else(|| Error::Decode("missing DICM magic".into()))?;
        let object = FileDicomObject::<InMemDicomObject>::from_reader(stream)
            .map_err(|err| Error::Decode(format!("invalid DICOM object: {err}")))?;
        let pixels = object
            .decode_pixel_data()
            .map_err(|err| Error::Decode(format!("unsupported pixel data: {err}")))?;
        let rgba = pixels
            .to_dynamic_image(0)
            .map_err(|err| Error::Decode(format!("cannot render frame: {err}")))?
            .to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(ImageData::from_rgba(
            width,
            height,
            rgba.into_raw(),
            bytes.to_vec(),
        ))
    }
}

// =============================================================================
// Chain
// =============================================================================

/// Ordered list of decoders; the first one accepting the input wins.
pub struct DecoderChain {
    decoders: Vec<Box<dyn FrameDecoder>>,
}

impl DecoderChain {
    #[must_use]
    pub fn new(decoders: Vec<Box<dyn FrameDecoder>>) -> Self {
        Self { decoders }
    }

    /// Decoders compiled into this build: DICOM first when enabled, then raster.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut decoders: Vec<Box<dyn FrameDecoder>> = Vec::new();
        #[cfg(feature = "dicom")]
        decoders.push(Box::new(DicomDecoder));
        decoders.push(Box::new(RasterDecoder));
        Self::new(decoders)
    }

    /// Names of the registered decoders, in order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.decoders.iter().map(|decoder| decoder.name())
    }

    pub fn decode(&self, bytes: &[u8]) -> Result<ImageData> {
        let decoder = self
            .decoders
            .iter()
            .find(|decoder| decoder.accepts(bytes))
            .ok_or_else(|| {
                if dicom_stream(bytes).is_some() {
                    Error::Decode("DICOM support is not enabled in this build".into())
                } else {
                    Error::Decode("unrecognised image format".into())
                }
            })?;
        decoder.decode(bytes)
    }
}

impl Default for DecoderChain {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl std::fmt::Debug for DecoderChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
