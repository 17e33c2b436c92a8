//! Screenshot pixel formatting.
//!
//! Backends read frames back in whatever byte order the device uses. This
//! converts such a buffer into `0x00RRGGBB` words, optionally flipping it
//! from bottom-up to top-down row order.

use thiserror::Error;

/// Errors from [`format_screenshot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ScreenshotError {
    #[error("Screenshot has no pixels: {width}x{height}")]
    Empty { width: u32, height: u32 },

    #[error("Buffer of {len} bytes does not hold {pixels} pixels of 1 to 4 bytes")]
    InvalidLength { len: usize, pixels: usize },

    #[error("Channel offset {offset} is outside a {stride}-byte pixel")]
    ChannelOutOfRange { offset: usize, stride: usize },
}

/// Byte offsets of the color channels within one source pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelLayout {
    pub red: usize,
    pub green: usize,
    pub blue: usize,
}

impl ChannelLayout {
    pub const RGBA: Self = Self::new(0, 1, 2);
    pub const BGRA: Self = Self::new(2, 1, 0);

    pub const fn new(red: usize, green: usize, blue: usize) -> Self {
        Self { red, green, blue }
    }

    fn max_offset(&self) -> usize {
        self.red.max(self.green).max(self.blue)
    }
}

/// Converts a packed `width` x `height` pixel buffer to `0x00RRGGBB` words.
///
/// The bytes per pixel are `data.len() / (width * height)` and must be 1 to
/// 4. With `flip_y` the first output row is the last source row.
pub fn format_screenshot(
    width: u32,
    height: u32,
    data: &[u8],
    layout: ChannelLayout,
    flip_y: bool,
) -> Result<Vec<u32>, ScreenshotError> {
    if width == 0 || height == 0 {
        return Err(ScreenshotError::Empty { width, height });
    }

    let (width, height) = (width as usize, height as usize);
    let pixels = width * height;
    let stride = data.len() / pixels;
    if data.len() % pixels != 0 || !(1..=4).contains(&stride) {
        return Err(ScreenshotError::InvalidLength {
            len: data.len(),
            pixels,
        });
    }
    if layout.max_offset() >= stride {
        return Err(ScreenshotError::ChannelOutOfRange {
            offset: layout.max_offset(),
            stride,
        });
    }

    let row_bytes = width * stride;
    let mut out = Vec::with_capacity(pixels);
    for row in 0..height {
        let src_row = if flip_y { height - 1 - row } else { row };
        let bytes = &data[src_row * row_bytes..(src_row + 1) * row_bytes];
        out.extend(bytes.chunks_exact(stride).map(|px| {
            (u32::from(px[layout.red]) << 16)
                | (u32::from(px[layout.green]) << 8)
                | u32::from(px[layout.blue])
        }));
    }

    tracing::trace!(width, height, stride, flip_y, "Formatted screenshot");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bgra_swizzle() {
        let data = [0x30, 0x20, 0x10, 0xff, 0x03, 0x02, 0x01, 0x00];
        let pixels = format_screenshot(2, 1, &data, ChannelLayout::BGRA, false).unwrap();
        assert_eq!(pixels, vec![0x0010_2030, 0x0001_0203]);
    }

    #[test]
    fn test_flip_rows() {
        // 1x3 RGB image, one pixel per row
        let data = [1, 0, 0, 2, 0, 0, 3, 0, 0];
        let upright = format_screenshot(1, 3, &data, ChannelLayout::RGBA, false).unwrap();
        let flipped = format_screenshot(1, 3, &data, ChannelLayout::RGBA, true).unwrap();
        assert_eq!(upright, vec![0x01_0000, 0x02_0000, 0x03_0000]);
        assert_eq!(flipped, vec![0x03_0000, 0x02_0000, 0x01_0000]);
    }

    #[test]
    fn test_single_channel_is_grey() {
        let data = [0x7f, 0x01];
        let pixels = format_screenshot(2, 1, &data, ChannelLayout::new(0, 0, 0), true).unwrap();
        assert_eq!(pixels, vec![0x7f_7f7f, 0x01_0101]);
    }

    #[test]
    fn test_rejects_bad_buffers() {
        assert_eq!(
            format_screenshot(0, 4, &[], ChannelLayout::RGBA, false),
            Err(ScreenshotError::Empty {
                width: 0,
                height: 4
            })
        );
        assert!(matches!(
            format_screenshot(2, 2, &[0; 7], ChannelLayout::RGBA, false),
            Err(ScreenshotError::InvalidLength { len: 7, pixels: 4 })
        ));
        assert!(matches!(
            format_screenshot(1, 1, &[0; 8], ChannelLayout::RGBA, false),
            Err(ScreenshotError::InvalidLength { .. })
        ));
        assert_eq!(
            format_screenshot(2, 1, &[0; 4], ChannelLayout::RGBA, false),
            Err(ScreenshotError::ChannelOutOfRange {
                offset: 2,
                stride: 2
            })
        );
    }
}
