use arboard::Clipboard;
use log::warn;
use thiserror::Error;

use crate::bitmap::Bitmap;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard access failed: {0}")]
    Access(#[from] arboard::Error),
    #[error("clipboard image of {width}x{height} has {len} bytes, expected {expected}")]
    Decode {
        width: usize,
        height: usize,
        len: usize,
        expected: usize,
    },
}

/// Anything that can hand out the current clipboard image.
pub trait ImageSource: Send + Sync {
    /// `None` when the clipboard holds no image or it could not be decoded.
    fn sample(&self) -> Option<Bitmap>;
}

/// Whether the preview currently has an image to save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Available,
    Unavailable,
}

impl Availability {
    pub fn of(bitmap: Option<&Bitmap>) -> Self {
        match bitmap {
            Some(_) => Availability::Available,
            None => Availability::Unavailable,
        }
    }
}

struct ClipboardImage<'a>(arboard::ImageData<'a>);
impl ClipboardImage<'_> {
    fn to_bitmap(self) -> Result<Bitmap, ClipboardError> {
        let cimg = self.0;
        let (width, height) = (cimg.width, cimg.height);
        let expected = width * height * 4;
        let len = cimg.bytes.len();
        if len != expected {
            return Err(ClipboardError::Decode {
                width,
                height,
                len,
                expected,
            });
        }
        Bitmap::from_rgba(width as u32, height as u32, cimg.bytes.into_owned()).ok_or(
            ClipboardError::Decode {
                width,
                height,
                len,
                expected,
            },
        )
    }
}

/// The platform clipboard, opened afresh for every sample.
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl SystemClipboard {
    pub fn new() -> Self {
        Self
    }

    pub fn read_image(&self) -> Result<Option<Bitmap>, ClipboardError> {
        let mut clip = Clipboard::new()?;
        match clip.get_image() {
            Ok(img) => ClipboardImage(img).to_bitmap().map(Some),
            Err(arboard::Error::ContentNotAvailable) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl ImageSource for SystemClipboard {
    fn sample(&self) -> Option<Bitmap> {
        match self.read_image() {
            Ok(bitmap) => bitmap,
            Err(e) => {
                warn!("ignoring clipboard contents: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;

    #[test]
    fn decodes_rgba_image_data() {
        let data = arboard::ImageData {
            width: 2,
            height: 1,
            bytes: Cow::Owned(vec![1, 2, 3, 4, 5, 6, 7, 8]),
        };
        let bitmap = ClipboardImage(data).to_bitmap().unwrap();
        assert_eq!(bitmap.dimensions(), (2, 1));
        assert_eq!(bitmap.pixel(1, 0).0, [5, 6, 7, 8]);
    }

    #[test]
    fn truncated_image_data_is_a_decode_error() {
        let data = arboard::ImageData {
            width: 2,
            height: 2,
            bytes: Cow::Owned(vec![0; 12]),
        };
        let err = ClipboardImage(data).to_bitmap().unwrap_err();
        assert!(matches!(err, ClipboardError::Decode { expected: 16, .. }));
    }

    #[test]
    fn availability_follows_bitmap_presence() {
        let bitmap = Bitmap::filled(1, 1, [0, 0, 0, 255]);
        assert_eq!(Availability::of(Some(&bitmap)), Availability::Available);
        assert_eq!(Availability::of(None), Availability::Unavailable);
    }
}
