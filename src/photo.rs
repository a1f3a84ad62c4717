//! Dive-site photo blobs and their decode outcome.

use std::fmt;

use image::ImageFormat;

/// Opaque image bytes attached to a record.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Photo {
    bytes: Vec<u8>,
}

impl fmt::Debug for Photo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Photo").field("len", &self.bytes.len()).finish()
    }
}

/// Image container recognised by [`Photo::decode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoFormat {
    /// Portable Network Graphics.
    Png,
    /// JPEG.
    Jpeg,
}

/// Result of decoding a photo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoStatus {
    /// The bytes are a readable image.
    Decoded {
        /// Container format.
        format: PhotoFormat,
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
    },
    /// The bytes could not be decoded.
    Corrupt {
        /// Decoder message.
        reason: String,
    },
}

impl PhotoStatus {
    /// True for [`PhotoStatus::Decoded`].
    pub fn is_decoded(&self) -> bool {
        matches!(self, PhotoStatus::Decoded { .. })
    }
}

impl Photo {
    /// Wraps raw bytes without inspecting them.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Byte length.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True when no bytes are held.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Decodes the image to check that it is a readable PNG or JPEG.
    pub fn decode(&self) -> PhotoStatus {
        let format = match image::guess_format(&self.bytes) {
            Ok(ImageFormat::Png) => PhotoFormat::Png,
            Ok(ImageFormat::Jpeg) => PhotoFormat::Jpeg,
            Ok(other) => {
                return PhotoStatus::Corrupt {
                    reason: format!("unsupported image format {other:?}"),
                };
            }
            Err(err) => {
                return PhotoStatus::Corrupt {
                    reason: err.to_string(),
                };
            }
        };

        match image::load_from_memory(&self.bytes) {
            Ok(img) => PhotoStatus::Decoded {
                format,
                width: img.width(),
                height: img.height(),
            },
            Err(err) => PhotoStatus::Corrupt {
                reason: err.to_string(),
            },
        }
    }
}

impl From<Vec<u8>> for Photo {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}
