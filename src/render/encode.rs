use std::io::Cursor;
use std::path::Path;

use anyhow::Context;
use image::ImageEncoder;

use crate::foundation::core::Rgba8Premul;
use crate::foundation::error::{CardError, CardResult};

/// JPEG quality used for every lossy encode.
pub const JPEG_QUALITY: u8 = 100;

/// Encodable output formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Lossless, alpha preserved.
    Png,
    /// Lossy at [`JPEG_QUALITY`], no alpha.
    Jpeg,
}

impl OutputFormat {
    /// Map a file extension (without the dot, case-insensitive) to a format.
    pub fn from_extension(ext: &str) -> CardResult<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            _ => Err(CardError::unsupported_format(format!(".{ext}"))),
        }
    }

    /// Pick the format from `path`'s extension.
    pub fn from_path(path: &Path) -> CardResult<Self> {
        let ext = path.extension().and_then(|s| s.to_str()).ok_or_else(|| {
            CardError::unsupported_format(format!("'{}' has no extension", path.display()))
        })?;
        Self::from_extension(ext)
    }

    /// Canonical file extension.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }
}

/// Encode premultiplied RGBA8 pixels.
///
/// PNG stores straight alpha. JPEG drops alpha after compositing over black, which is what the
/// premultiplied color channels already hold.
pub fn encode_premul_rgba8(
    premul: &[u8],
    width: u32,
    height: u32,
    format: OutputFormat,
) -> CardResult<Vec<u8>> {
    let mut buf = Vec::new();
    match format {
        OutputFormat::Png => {
            let straight = premul_to_straight_rgba8(premul);
            image::codecs::png::PngEncoder::new(Cursor::new(&mut buf))
                .write_image(&straight, width, height, image::ExtendedColorType::Rgba8)
                .context("encode png")?;
        }
        OutputFormat::Jpeg => {
            let rgb: Vec<u8> = premul
                .chunks_exact(4)
                .flat_map(|px| [px[0], px[1], px[2]])
                .collect();
            image::codecs::jpeg::JpegEncoder::new_with_quality(Cursor::new(&mut buf), JPEG_QUALITY)
                .write_image(&rgb, width, height, image::ExtendedColorType::Rgb8)
                .context("encode jpeg")?;
        }
    }
    Ok(buf)
}

/// Convert premultiplied RGBA8 bytes to straight alpha.
pub fn premul_to_straight_rgba8(premul: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(premul.len());
    for px in premul.chunks_exact(4) {
        let c = Rgba8Premul {
            r: px[0],
            g: px[1],
            b: px[2],
            a: px[3],
        }
        .to_straight();
        out.extend_from_slice(&[c.r, c.g, c.b, c.a]);
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/encode.rs"]
mod tests;
