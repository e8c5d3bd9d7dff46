//! Owned grayscale pixel buffer produced by screen captures

use super::WindowRect;

/// 8-bit luma image, row-major, one byte per pixel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: usize,
    height: usize,
    luma: Vec<u8>,
}

impl Frame {
    /// Wrap raw luma bytes; `luma.len()` must equal `width * height`
    pub fn new(width: usize, height: usize, luma: Vec<u8>) -> Self {
        assert_eq!(luma.len(), width * height, "luma buffer does not match frame size");
        Self { width, height, luma }
    }

    /// Convert 32-bit BGRA/BGRX rows (Win32 DIBs, X11 ZPixmaps on
    /// little-endian servers) into luma using the Rec. 601 weights.
    pub fn from_bgra(width: usize, height: usize, stride: usize, data: &[u8]) -> Option<Self> {
        if stride < width * 4 || data.len() < stride * height.saturating_sub(1) + width * 4 {
            return None;
        }

        let mut luma = Vec::with_capacity(width * height);
        for row in data.chunks(stride).take(height) {
            for px in row[..width * 4].chunks_exact(4) {
                let (b, g, r) = (px[0] as u32, px[1] as u32, px[2] as u32);
                luma.push(((299 * r + 587 * g + 114 * b) / 1000) as u8);
            }
        }

        Some(Self { width, height, luma })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn luma_at(&self, x: usize, y: usize) -> u8 {
        self.luma[y * self.width + x]
    }

    /// Copy out the part of the frame inside `rect` (frame coordinates)
    pub fn crop(&self, rect: WindowRect) -> Frame {
        let bounds = WindowRect {
            left: 0,
            top: 0,
            right: self.width as i32,
            bottom: self.height as i32,
        };
        let Some(rect) = rect.intersect(&bounds) else {
            return Frame::new(0, 0, Vec::new());
        };

        let (left, width) = (rect.left as usize, rect.width() as usize);
        let mut luma = Vec::with_capacity(width * rect.height() as usize);
        for y in rect.top as usize..rect.bottom as usize {
            let start = y * self.width + left;
            luma.extend_from_slice(&self.luma[start..start + width]);
        }

        Frame::new(width, rect.height() as usize, luma)
    }
}
