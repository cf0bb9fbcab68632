//! Video frame types and decoding

use crate::FrameError;
use image::{imageops, imageops::FilterType, RgbImage};
use tracing::debug;

/// Decoded RGB video frame
#[derive(Debug, Clone)]
pub struct VideoFrame {
    /// RGB pixel data (width * height * 3)
    pub data: Vec<u8>,
    /// Frame width
    pub width: u32,
    /// Frame height
    pub height: u32,
}

impl VideoFrame {
    /// Create a new video frame from raw RGB data
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Result<Self, FrameError> {
        let expected = width as usize * height as usize * 3;
        if data.len() != expected {
            return Err(FrameError::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { data, width, height })
    }

    /// Decode an encoded image payload into an RGB frame.
    ///
    /// The container format is sniffed from the payload, so anything the
    /// `image` crate recognises (JPEG, PNG, WebP, BMP, ...) is accepted.
    pub fn decode(bytes: &[u8]) -> Result<Self, FrameError> {
        if bytes.is_empty() {
            return Err(FrameError::Empty);
        }

        let img = image::load_from_memory(bytes).map_err(|e| FrameError::Decode(e.to_string()))?;
        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();
        if width == 0 || height == 0 {
            return Err(FrameError::Decode("image has zero area".into()));
        }
        debug!("Decoded {}x{} frame from {} bytes", width, height, bytes.len());

        Ok(Self {
            data: rgb.into_raw(),
            width,
            height,
        })
    }

    /// Get pixel at (x, y)
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y * self.width + x) * 3) as usize;
        Some([self.data[idx], self.data[idx + 1], self.data[idx + 2]])
    }

    /// Copy the frame into an `image` buffer
    pub fn to_rgb_image(&self) -> Result<RgbImage, FrameError> {
        RgbImage::from_raw(self.width, self.height, self.data.clone()).ok_or(
            FrameError::BufferSize {
                expected: self.width as usize * self.height as usize * 3,
                actual: self.data.len(),
            },
        )
    }

    /// Resize to a model input size (bilinear)
    pub fn resize(&self, new_width: u32, new_height: u32) -> Result<RgbImage, FrameError> {
        let img = self.to_rgb_image()?;
        Ok(imageops::resize(&img, new_width, new_height, FilterType::Triangle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb};
    use proptest::prelude::*;
    use std::io::Cursor;

    fn encode_png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, y| Rgb([x as u8, y as u8, 200]));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_decode_png() {
        let frame = VideoFrame::decode(&encode_png(8, 4)).unwrap();
        assert_eq!(frame.width, 8);
        assert_eq!(frame.height, 4);
        assert_eq!(frame.data.len(), 8 * 4 * 3);
        assert_eq!(frame.get_pixel(3, 2), Some([3, 2, 200]));
        assert_eq!(frame.get_pixel(8, 0), None);
    }

    #[test]
    fn test_empty_payload() {
        assert!(matches!(VideoFrame::decode(&[]), Err(FrameError::Empty)));
    }

    #[test]
    fn test_garbage_payload() {
        let result = VideoFrame::decode(b"definitely not an image");
        assert!(matches!(result, Err(FrameError::Decode(_))));
    }

    #[test]
    fn test_truncated_png() {
        let bytes = encode_png(16, 16);
        let result = VideoFrame::decode(&bytes[..bytes.len() / 2]);
        assert!(matches!(result, Err(FrameError::Decode(_))));
    }

    #[test]
    fn test_new_rejects_short_buffer() {
        let result = VideoFrame::new(vec![0; 10], 2, 2);
        assert!(matches!(
            result,
            Err(FrameError::BufferSize { expected: 12, actual: 10 })
        ));
    }

    #[test]
    fn test_resize() {
        let frame = VideoFrame::new(vec![128; 4 * 4 * 3], 4, 4).unwrap();
        let resized = frame.resize(2, 3).unwrap();
        assert_eq!(resized.dimensions(), (2, 3));
        assert_eq!(resized.get_pixel(1, 1), &Rgb([128, 128, 128]));
    }

    proptest! {
        #[test]
        fn decode_never_panics_on_arbitrary_bytes(bytes in proptest::collection::vec(any::<u8>(), 1..256)) {
            let _ = VideoFrame::decode(&bytes);
        }
    }
}
