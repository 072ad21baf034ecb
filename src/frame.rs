//! Frame carrier and face patch preparation
//!
//! This module owns the raster plumbing between the boundary models:
//! grayscale conversion, bounding-box cropping, bilinear resize, and
//! intensity normalization into the classifier's fixed 48x48 input.

use crate::error::SessionError;
use crate::types::BoundingBox;

/// Classifier input edge length in pixels
pub const PATCH_SIZE: usize = 48;

/// Interleaved 8-bit raster frame, 1 (grayscale) or 3 (RGB) channels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub channels: u8,
    pub data: Vec<u8>,
}

impl Frame {
    /// Create a frame, validating the buffer length against the dimensions
    pub fn new(width: u32, height: u32, channels: u8, data: Vec<u8>) -> Result<Self, SessionError> {
        if channels != 1 && channels != 3 {
            return Err(SessionError::InvalidFrame(format!(
                "unsupported channel count: {channels}"
            )));
        }
        let expected = width as usize * height as usize * channels as usize;
        if data.len() != expected {
            return Err(SessionError::InvalidFrame(format!(
                "buffer length {} does not match {}x{}x{}",
                data.len(),
                width,
                height,
                channels
            )));
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// Uniform white frame used as the baseline/settle screen
    pub fn blank(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            channels: 1,
            data: vec![255; width as usize * height as usize],
        }
    }

    /// Convert to single-channel using BT.601 luma weights.
    ///
    /// Already-grayscale frames are returned as a copy.
    pub fn to_grayscale(&self) -> Frame {
        if self.channels == 1 {
            return self.clone();
        }
        let pixels = self.width as usize * self.height as usize;
        let mut gray = Vec::with_capacity(pixels);
        for i in 0..pixels {
            let r = self.data[i * 3] as f32;
            let g = self.data[i * 3 + 1] as f32;
            let b = self.data[i * 3 + 2] as f32;
            gray.push((0.299 * r + 0.587 * g + 0.114 * b).round() as u8);
        }
        Frame {
            width: self.width,
            height: self.height,
            channels: 1,
            data: gray,
        }
    }

    fn gray_at(&self, x: u32, y: u32) -> u8 {
        self.data[(y as usize * self.width as usize) + x as usize]
    }
}

/// Fixed-size single-channel classifier input, intensities in [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct FacePatch {
    pixels: Vec<f32>,
}

impl FacePatch {
    /// Normalized pixel data, row-major, `PATCH_SIZE * PATCH_SIZE` long
    pub fn pixels(&self) -> &[f32] {
        &self.pixels
    }
}

/// Crop a detected face out of a frame and prepare it for classification:
/// grayscale, bilinear resize to `PATCH_SIZE` square, normalize to [0, 1].
///
/// The box is clipped to the frame bounds first; a box that degenerates to
/// zero area after clipping is an error the sequencer absorbs as a skipped
/// face.
pub fn extract_patch(frame: &Frame, bbox: BoundingBox) -> Result<FacePatch, SessionError> {
    if bbox.x >= frame.width || bbox.y >= frame.height {
        return Err(SessionError::InvalidFrame(format!(
            "bounding box origin ({}, {}) outside {}x{} frame",
            bbox.x, bbox.y, frame.width, frame.height
        )));
    }
    let w = bbox.width.min(frame.width - bbox.x);
    let h = bbox.height.min(frame.height - bbox.y);
    if w == 0 || h == 0 {
        return Err(SessionError::InvalidFrame(
            "bounding box has zero area".to_string(),
        ));
    }

    let gray = frame.to_grayscale();
    let mut pixels = Vec::with_capacity(PATCH_SIZE * PATCH_SIZE);

    // Bilinear sample from the cropped region into the fixed patch grid
    let x_scale = w as f32 / PATCH_SIZE as f32;
    let y_scale = h as f32 / PATCH_SIZE as f32;
    for py in 0..PATCH_SIZE {
        for px in 0..PATCH_SIZE {
            let sx = (px as f32 + 0.5) * x_scale - 0.5;
            let sy = (py as f32 + 0.5) * y_scale - 0.5;
            let sx = sx.clamp(0.0, (w - 1) as f32);
            let sy = sy.clamp(0.0, (h - 1) as f32);

            let x0 = sx.floor() as u32;
            let y0 = sy.floor() as u32;
            let x1 = (x0 + 1).min(w - 1);
            let y1 = (y0 + 1).min(h - 1);
            let fx = sx - x0 as f32;
            let fy = sy - y0 as f32;

            let p00 = gray.gray_at(bbox.x + x0, bbox.y + y0) as f32;
            let p10 = gray.gray_at(bbox.x + x1, bbox.y + y0) as f32;
            let p01 = gray.gray_at(bbox.x + x0, bbox.y + y1) as f32;
            let p11 = gray.gray_at(bbox.x + x1, bbox.y + y1) as f32;

            let top = p00 + (p10 - p00) * fx;
            let bottom = p01 + (p11 - p01) * fx;
            let value = top + (bottom - top) * fy;

            pixels.push(value / 255.0);
        }
    }

    Ok(FacePatch { pixels })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform_rgb(width: u32, height: u32, rgb: [u8; 3]) -> Frame {
        let mut data = Vec::with_capacity(width as usize * height as usize * 3);
        for _ in 0..(width * height) {
            data.extend_from_slice(&rgb);
        }
        Frame::new(width, height, 3, data).unwrap()
    }

    #[test]
    fn test_frame_length_validation() {
        assert!(Frame::new(4, 4, 3, vec![0; 48]).is_ok());
        assert!(Frame::new(4, 4, 3, vec![0; 47]).is_err());
        assert!(Frame::new(4, 4, 4, vec![0; 64]).is_err());
    }

    #[test]
    fn test_grayscale_luma() {
        let frame = uniform_rgb(2, 2, [255, 0, 0]);
        let gray = frame.to_grayscale();
        assert_eq!(gray.channels, 1);
        // 0.299 * 255 = 76.245 -> 76
        assert_eq!(gray.data, vec![76; 4]);
    }

    #[test]
    fn test_extract_patch_uniform_intensity() {
        let frame = uniform_rgb(100, 100, [128, 128, 128]);
        let bbox = BoundingBox {
            x: 10,
            y: 10,
            width: 60,
            height: 60,
        };
        let patch = extract_patch(&frame, bbox).unwrap();
        assert_eq!(patch.pixels().len(), PATCH_SIZE * PATCH_SIZE);
        for &p in patch.pixels() {
            assert!((p - 128.0 / 255.0).abs() < 1e-6);
            assert!((0.0..=1.0).contains(&p));
        }
    }

    #[test]
    fn test_extract_patch_clips_to_frame() {
        let frame = uniform_rgb(50, 50, [200, 200, 200]);
        // Box extends past the right and bottom edges; clipped, not rejected
        let bbox = BoundingBox {
            x: 30,
            y: 30,
            width: 40,
            height: 40,
        };
        assert!(extract_patch(&frame, bbox).is_ok());
    }

    #[test]
    fn test_extract_patch_rejects_out_of_frame() {
        let frame = uniform_rgb(50, 50, [0, 0, 0]);
        let bbox = BoundingBox {
            x: 50,
            y: 0,
            width: 10,
            height: 10,
        };
        assert!(extract_patch(&frame, bbox).is_err());
    }

    #[test]
    fn test_blank_frame_is_white() {
        let blank = Frame::blank(8, 8);
        assert!(blank.data.iter().all(|&p| p == 255));
    }
}
