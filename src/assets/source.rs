use std::sync::Arc;

use crate::foundation::core::{Rgba8, Rgba8Premul};
use crate::foundation::error::{CardError, CardResult};

/// Immutable decoded image in premultiplied RGBA8 form.
///
/// Transforms (scale, crop) never mutate a `SourceImage`; they return a new one. Pixel storage
/// is shared, so clones are cheap.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceImage {
    width: u32,
    height: u32,
    rgba8_premul: Arc<Vec<u8>>,
}

impl SourceImage {
    /// Wrap row-major, tightly packed premultiplied RGBA8 bytes.
    pub fn from_premul_rgba8(width: u32, height: u32, rgba8_premul: Vec<u8>) -> CardResult<Self> {
        check_dims(width, height)?;
        let expected = (width as usize) * (height as usize) * 4;
        if rgba8_premul.len() != expected {
            return Err(CardError::validation(format!(
                "source image byte len mismatch: expected {expected}, got {}",
                rgba8_premul.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
        })
    }

    /// Premultiply straight-alpha RGBA8 bytes and wrap them.
    pub fn from_straight_rgba8(width: u32, height: u32, mut rgba8: Vec<u8>) -> CardResult<Self> {
        premultiply_rgba8_in_place(&mut rgba8);
        Self::from_premul_rgba8(width, height, rgba8)
    }

    /// Image of a single color.
    pub fn solid(width: u32, height: u32, color: Rgba8) -> CardResult<Self> {
        check_dims(width, height)?;
        let px = color.to_premul().to_array();
        let data = px.repeat((width as usize) * (height as usize));
        Self::from_premul_rgba8(width, height, data)
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Premultiplied pixel at `(x, y)`, or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8Premul> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = &self.rgba8_premul[i..i + 4];
        Some(Rgba8Premul {
            r: px[0],
            g: px[1],
            b: px[2],
            a: px[3],
        })
    }

    /// Row-major premultiplied RGBA8 bytes.
    pub fn as_premul_bytes(&self) -> &[u8] {
        &self.rgba8_premul
    }

    pub(crate) fn to_rgba_image(&self) -> CardResult<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.rgba8_premul.to_vec())
            .ok_or_else(|| CardError::validation("source image buffer does not match its size"))
    }

    pub(crate) fn from_rgba_image(img: image::RgbaImage) -> CardResult<Self> {
        let (width, height) = img.dimensions();
        Self::from_premul_rgba8(width, height, img.into_raw())
    }
}

fn check_dims(width: u32, height: u32) -> CardResult<()> {
    if width == 0 || height == 0 {
        return Err(CardError::InvalidSourceDimensions { width, height });
    }
    Ok(())
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;
